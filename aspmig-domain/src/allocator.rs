use crate::naming::PlanNamer;
use crate::paths::PackagePaths;
use aspmig_types::plan::{PlanAllocation, SiteAssignment};
use aspmig_types::site::PackagedSite;
use aspmig_types::tier::Tier;
use std::collections::HashSet;
use thiserror::Error;
use tracing::debug;

/// Fields shared by every plan of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanTemplate {
    pub subscription_id: String,
    pub region: String,
    pub resource_group: String,
    pub tier: Tier,
    pub worker_count: u32,
    pub worker_size: String,
    pub app_service_environment: Option<String>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AllocationError {
    #[error("no sites to allocate")]
    NoSites,

    #[error("plan capacity must be at least 1")]
    ZeroCapacity,

    #[error("plan name generator kept producing names already used in this run (last: {last})")]
    DuplicatePlanName { last: String },
}

const NAME_ATTEMPTS: usize = 16;

/// Splits `sites` into consecutive groups of `capacity`, one plan per group.
///
/// Order is preserved; only the last plan may hold fewer than `capacity` sites.
pub fn allocate(
    sites: &[PackagedSite],
    capacity: usize,
    template: &PlanTemplate,
    paths: &PackagePaths,
    namer: &dyn PlanNamer,
) -> Result<Vec<PlanAllocation>, AllocationError> {
    if sites.is_empty() {
        return Err(AllocationError::NoSites);
    }
    if capacity == 0 {
        return Err(AllocationError::ZeroCapacity);
    }

    let mut used = HashSet::new();
    let mut plans = Vec::with_capacity(sites.len().div_ceil(capacity));

    for chunk in sites.chunks(capacity) {
        let plan_name = unique_name(namer, &mut used)?;
        let assignments = chunk
            .iter()
            .map(|site| {
                let resolved = paths.resolve(&site.package_path);
                debug!(site = %site.site_name, package = %resolved, plan = %plan_name, "assigned");
                SiteAssignment::same_name(site.site_name.clone(), resolved)
            })
            .collect();

        plans.push(PlanAllocation {
            plan_name,
            region: template.region.clone(),
            subscription_id: template.subscription_id.clone(),
            resource_group: template.resource_group.clone(),
            tier: template.tier,
            worker_count: template.worker_count,
            worker_size: template.worker_size.clone(),
            app_service_environment: template.app_service_environment.clone(),
            sites: assignments,
        });
    }

    Ok(plans)
}

fn unique_name(namer: &dyn PlanNamer, used: &mut HashSet<String>) -> Result<String, AllocationError> {
    let mut last = String::new();
    for _ in 0..NAME_ATTEMPTS {
        let name = namer.next_name();
        if used.insert(name.clone()) {
            return Ok(name);
        }
        debug!(name = %name, "plan name already used in this run; drawing another");
        last = name;
    }
    Err(AllocationError::DuplicatePlanName { last })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::SequentialPlanNamer;
    use camino::{Utf8Path, Utf8PathBuf};
    use pretty_assertions::assert_eq;

    struct ConstantNamer;

    impl PlanNamer for ConstantNamer {
        fn next_name(&self) -> String {
            "same".to_string()
        }
    }

    fn template() -> PlanTemplate {
        PlanTemplate {
            subscription_id: "sub".to_string(),
            region: "eastus".to_string(),
            resource_group: "rg".to_string(),
            tier: Tier::PremiumV2,
            worker_count: 1,
            worker_size: "Small".to_string(),
            app_service_environment: None,
        }
    }

    fn sites(n: usize) -> Vec<PackagedSite> {
        (0..n)
            .map(|i| PackagedSite::new(format!("site{i}"), format!("pkg/site{i}.zip")))
            .collect()
    }

    fn paths() -> PackagePaths {
        PackagePaths::for_input(Utf8Path::new("/data/results.json"), Utf8Path::new("/"))
    }

    fn sizes(plans: &[PlanAllocation]) -> Vec<usize> {
        plans.iter().map(|p| p.sites.len()).collect()
    }

    #[test]
    fn twenty_sites_by_eight() {
        let plans = allocate(&sites(20), 8, &template(), &paths(), &SequentialPlanNamer::new("asp")).unwrap();
        assert_eq!(sizes(&plans), vec![8, 8, 4]);
    }

    #[test]
    fn exact_multiple_fills_every_plan() {
        let plans = allocate(&sites(16), 16, &template(), &paths(), &SequentialPlanNamer::new("asp")).unwrap();
        assert_eq!(sizes(&plans), vec![16]);
    }

    #[test]
    fn plans_copy_template_and_resolve_packages() {
        let mut tpl = template();
        tpl.app_service_environment = Some("prod-ase".to_string());
        let plans = allocate(&sites(3), 2, &tpl, &paths(), &SequentialPlanNamer::new("asp")).unwrap();

        assert_eq!(plans[0].plan_name, "asp-1");
        assert_eq!(plans[1].plan_name, "asp-2");
        for plan in &plans {
            assert_eq!(plan.app_service_environment.as_deref(), Some("prod-ase"));
            assert_eq!(plan.tier, Tier::PremiumV2);
            assert_eq!(plan.worker_size, "Small");
        }
        assert_eq!(
            plans[1].sites[0].resolved_package_path,
            Utf8PathBuf::from("/data/pkg/site2.zip")
        );
        assert_eq!(plans[1].sites[0].target_site_name, "site2");
    }

    #[test]
    fn empty_input_is_rejected() {
        let err = allocate(&[], 8, &template(), &paths(), &SequentialPlanNamer::new("asp")).unwrap_err();
        assert_eq!(err, AllocationError::NoSites);
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let err = allocate(&sites(1), 0, &template(), &paths(), &SequentialPlanNamer::new("asp")).unwrap_err();
        assert_eq!(err, AllocationError::ZeroCapacity);
    }

    #[test]
    fn single_plan_tolerates_a_constant_namer() {
        let plans = allocate(&sites(3), 8, &template(), &paths(), &ConstantNamer).unwrap();
        assert_eq!(plans.len(), 1);
    }

    #[test]
    fn repeated_names_are_an_error() {
        let err = allocate(&sites(9), 8, &template(), &paths(), &ConstantNamer).unwrap_err();
        assert_eq!(
            err,
            AllocationError::DuplicatePlanName {
                last: "same".to_string()
            }
        );
    }
}
