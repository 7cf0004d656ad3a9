use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use crate::plan::{MigrationSettings, PlanAllocation, SiteAssignment};
use crate::tier::Tier;
use crate::wire::{TierV1, WireError};

/// Schema-exact wire representation of a migration settings file.
///
/// The document is a bare JSON array of plans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingsV1(pub Vec<AppServicePlanV1>);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AppServicePlanV1 {
    pub app_service_plan: String,
    pub subscription_id: String,
    pub region: String,
    pub resource_group: String,
    pub tier: TierV1,
    pub number_of_workers: u32,
    pub worker_size: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_service_environment: Option<String>,

    #[serde(default)]
    pub sites: Vec<SiteV1>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteV1 {
    #[serde(rename = "IISSiteName")]
    pub iis_site_name: String,

    #[serde(rename = "SitePackagePath")]
    pub site_package_path: String,

    #[serde(rename = "AzureSiteName")]
    pub azure_site_name: String,
}

impl From<&SiteAssignment> for SiteV1 {
    fn from(site: &SiteAssignment) -> Self {
        Self {
            iis_site_name: site.source_site_name.clone(),
            site_package_path: site.resolved_package_path.to_string(),
            azure_site_name: site.target_site_name.clone(),
        }
    }
}

impl From<SiteV1> for SiteAssignment {
    fn from(site: SiteV1) -> Self {
        Self {
            source_site_name: site.iis_site_name,
            resolved_package_path: Utf8PathBuf::from(site.site_package_path),
            target_site_name: site.azure_site_name,
        }
    }
}

impl From<&PlanAllocation> for AppServicePlanV1 {
    fn from(plan: &PlanAllocation) -> Self {
        Self {
            app_service_plan: plan.plan_name.clone(),
            subscription_id: plan.subscription_id.clone(),
            region: plan.region.clone(),
            resource_group: plan.resource_group.clone(),
            tier: TierV1(plan.tier.as_str().to_string()),
            number_of_workers: plan.worker_count,
            worker_size: plan.worker_size.clone(),
            app_service_environment: plan.app_service_environment.clone(),
            sites: plan.sites.iter().map(SiteV1::from).collect(),
        }
    }
}

impl TryFrom<AppServicePlanV1> for PlanAllocation {
    type Error = WireError;

    fn try_from(plan: AppServicePlanV1) -> Result<Self, Self::Error> {
        let tier = Tier::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(&plan.tier.0))
            .ok_or_else(|| WireError::UnknownTier {
                plan: plan.app_service_plan.clone(),
                tier: plan.tier.0.clone(),
            })?;

        Ok(Self {
            plan_name: plan.app_service_plan,
            region: plan.region,
            subscription_id: plan.subscription_id,
            resource_group: plan.resource_group,
            tier,
            worker_count: plan.number_of_workers,
            worker_size: plan.worker_size,
            app_service_environment: plan.app_service_environment,
            sites: plan.sites.into_iter().map(SiteAssignment::from).collect(),
        })
    }
}

impl From<&MigrationSettings> for SettingsV1 {
    fn from(settings: &MigrationSettings) -> Self {
        Self(settings.plans.iter().map(AppServicePlanV1::from).collect())
    }
}

impl TryFrom<SettingsV1> for MigrationSettings {
    type Error = WireError;

    fn try_from(settings: SettingsV1) -> Result<Self, Self::Error> {
        let plans = settings
            .0
            .into_iter()
            .map(PlanAllocation::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(MigrationSettings::new(plans))
    }
}
