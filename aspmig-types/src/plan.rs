use crate::tier::Tier;
use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// One App Service Plan and the sites packed into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanAllocation {
    pub plan_name: String,
    pub region: String,
    pub subscription_id: String,
    pub resource_group: String,
    pub tier: Tier,
    pub worker_count: u32,
    pub worker_size: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_service_environment: Option<String>,

    #[serde(default)]
    pub sites: Vec<SiteAssignment>,
}

/// A source IIS site mapped onto a target web app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteAssignment {
    pub source_site_name: String,
    pub resolved_package_path: Utf8PathBuf,
    pub target_site_name: String,
}

impl SiteAssignment {
    /// Maps a site onto a web app of the same name.
    pub fn same_name(source_site_name: impl Into<String>, resolved_package_path: Utf8PathBuf) -> Self {
        let source_site_name = source_site_name.into();
        Self {
            target_site_name: source_site_name.clone(),
            source_site_name,
            resolved_package_path,
        }
    }
}

/// The complete output of a run, in plan order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationSettings {
    pub plans: Vec<PlanAllocation>,
}

impl MigrationSettings {
    pub fn new(plans: Vec<PlanAllocation>) -> Self {
        Self { plans }
    }

    pub fn site_count(&self) -> usize {
        self.plans.iter().map(|p| p.sites.len()).sum()
    }
}
