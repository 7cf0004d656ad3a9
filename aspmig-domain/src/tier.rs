//! Hosting tier selection.
//!
//! The decision depends on two facts gathered from Azure: whether the sites go into an App
//! Service Environment (and which generation it is), and otherwise whether the target
//! region sells the PremiumV3 SKU. The first lookup is mandatory once an environment is
//! named; the SKU probe is advisory and falls back to PremiumV2 when it cannot answer.

use crate::ports::{AzureResources, EnvironmentDetails, ResourceQuery};
use aspmig_types::tier::{Tier, TierDecision};
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, warn};

pub const ASE_RESOURCE_TYPE: &str = "Microsoft.Web/hostingEnvironments";
pub const ASE_V2_KIND: &str = "ASEV2";
pub const PREMIUM_V3_SKU: &str = "PremiumV3";

const ISOLATED: TierDecision = TierDecision::new(Tier::Isolated, 8);
const ISOLATED_V2: TierDecision = TierDecision::new(Tier::IsolatedV2, 16);
const PREMIUM_V3: TierDecision = TierDecision::new(Tier::PremiumV3, 16);
const PREMIUM_V2: TierDecision = TierDecision::new(Tier::PremiumV2, 8);

/// The decision table.
///
/// A blank `ase_kind` counts as absent. Any kind other than `ASEV2` (compared without
/// regard to ASCII case) is treated as a newer environment.
pub fn resolve_tier(has_ase: bool, ase_kind: Option<&str>, can_use_p1v3: bool) -> TierDecision {
    if has_ase {
        match ase_kind.map(str::trim).filter(|k| !k.is_empty()) {
            Some(kind) if kind.eq_ignore_ascii_case(ASE_V2_KIND) => ISOLATED,
            _ => ISOLATED_V2,
        }
    } else if can_use_p1v3 {
        PREMIUM_V3
    } else {
        PREMIUM_V2
    }
}

/// Region names as Azure compares them: `East US` and `eastus` are the same region.
pub fn normalize_region(region: &str) -> String {
    region
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

#[derive(Debug, Clone)]
pub struct TierRequest {
    pub subscription_id: String,
    pub region: String,
    pub app_service_environment: Option<String>,
}

/// Something the resolver substituted or corrected on the caller's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionWarning {
    EnvironmentVersionUnknown {
        environment: String,
        assumed: TierDecision,
    },
    RegionOverridden {
        environment: String,
        requested: String,
        effective: String,
    },
    SkuProbeFailed {
        region: String,
        sku: String,
        fallback: TierDecision,
        reason: String,
    },
}

impl ResolutionWarning {
    /// True when the tier itself is a fallback rather than a confirmed choice.
    pub fn is_tier_fallback(&self) -> bool {
        !matches!(self, ResolutionWarning::RegionOverridden { .. })
    }
}

impl fmt::Display for ResolutionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionWarning::EnvironmentVersionUnknown {
                environment,
                assumed,
            } => write!(
                f,
                "could not confirm the version of App Service Environment {}; assuming {}",
                environment, assumed
            ),
            ResolutionWarning::RegionOverridden {
                environment,
                requested,
                effective,
            } => write!(
                f,
                "App Service Environment {} is in region {}, not {}; using {}",
                environment, effective, requested, effective
            ),
            ResolutionWarning::SkuProbeFailed {
                region,
                sku,
                fallback,
                reason,
            } => write!(
                f,
                "could not check {} availability in {} ({}); using {}",
                sku, region, reason, fallback
            ),
        }
    }
}

#[derive(Debug, Error)]
pub enum TierError {
    #[error("App Service Environment {name} was not found in subscription {subscription_id}")]
    EnvironmentNotFound {
        name: String,
        subscription_id: String,
    },

    #[error("failed to look up App Service Environment {name}: {message}")]
    Lookup { name: String, message: String },
}

#[derive(Debug, Clone)]
pub struct TierResolution {
    pub decision: TierDecision,
    /// The region plans are created in. Differs from the request when an environment forces it.
    pub effective_region: String,
    pub environment: Option<EnvironmentDetails>,
    pub warnings: Vec<ResolutionWarning>,
}

#[derive(Debug, Clone, Default)]
pub struct TierResolver;

impl TierResolver {
    pub fn new() -> Self {
        Self
    }

    pub fn resolve(
        &self,
        request: &TierRequest,
        azure: &dyn AzureResources,
    ) -> Result<TierResolution, TierError> {
        match request.app_service_environment.as_deref() {
            Some(name) => self.resolve_isolated(request, name, azure),
            None => Ok(self.resolve_premium(request, azure)),
        }
    }

    fn resolve_isolated(
        &self,
        request: &TierRequest,
        name: &str,
        azure: &dyn AzureResources,
    ) -> Result<TierResolution, TierError> {
        let lookup_failed = |e: anyhow::Error| TierError::Lookup {
            name: name.to_string(),
            message: format!("{e:#}"),
        };

        let query = ResourceQuery {
            subscription_id: &request.subscription_id,
            resource_group: None,
            resource_type: ASE_RESOURCE_TYPE,
            name,
        };
        let resource = azure
            .find_resource(&query)
            .map_err(lookup_failed)?
            .ok_or_else(|| TierError::EnvironmentNotFound {
                name: name.to_string(),
                subscription_id: request.subscription_id.clone(),
            })?;
        debug!(id = %resource.id, "found App Service Environment");

        let details = azure
            .environment_details(&resource)
            .map_err(lookup_failed)?;

        let mut warnings = Vec::new();

        let decision = resolve_tier(true, details.kind.as_deref(), false);
        if details.kind.as_deref().is_none_or(|k| k.trim().is_empty()) {
            let w = ResolutionWarning::EnvironmentVersionUnknown {
                environment: name.to_string(),
                assumed: decision,
            };
            warn!("{}", w);
            warnings.push(w);
        }

        let mut effective_region = request.region.clone();
        if normalize_region(&details.location) != normalize_region(&request.region) {
            let w = ResolutionWarning::RegionOverridden {
                environment: name.to_string(),
                requested: request.region.clone(),
                effective: details.location.clone(),
            };
            warn!("{}", w);
            warnings.push(w);
            effective_region = details.location.clone();
        }

        info!(
            environment = name,
            kind = details.kind.as_deref().unwrap_or("<none>"),
            "selected {}",
            decision
        );

        Ok(TierResolution {
            decision,
            effective_region,
            environment: Some(details),
            warnings,
        })
    }

    fn resolve_premium(&self, request: &TierRequest, azure: &dyn AzureResources) -> TierResolution {
        let wanted = normalize_region(&request.region);

        let mut warnings = Vec::new();
        let can_use_p1v3 = match azure.regions_for_sku(&request.subscription_id, PREMIUM_V3_SKU) {
            Ok(regions) => {
                let supported = regions.iter().any(|r| normalize_region(r) == wanted);
                debug!(
                    region = %request.region,
                    offered_in = regions.len(),
                    supported,
                    "{} availability",
                    PREMIUM_V3_SKU
                );
                supported
            }
            Err(e) => {
                let w = ResolutionWarning::SkuProbeFailed {
                    region: request.region.clone(),
                    sku: PREMIUM_V3_SKU.to_string(),
                    fallback: PREMIUM_V2,
                    reason: format!("{e:#}"),
                };
                warn!("{}", w);
                warnings.push(w);
                false
            }
        };

        let decision = resolve_tier(false, None, can_use_p1v3);
        info!(region = %request.region, "selected {}", decision);

        TierResolution {
            decision,
            effective_region: request.region.clone(),
            environment: None,
            warnings,
        }
    }
}
