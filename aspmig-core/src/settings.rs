//! Clap-free settings for the generate pipeline.

use aspmig_domain::absolutize;
use aspmig_types::files::DEFAULT_SETTINGS_FILE;
use camino::{Utf8Path, Utf8PathBuf};

/// Values every run falls back to. Loaded once at startup and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanDefaults {
    pub output_path: Utf8PathBuf,
    pub number_of_workers: u32,
    pub worker_size: String,
}

impl Default for PlanDefaults {
    fn default() -> Self {
        Self {
            output_path: Utf8PathBuf::from(DEFAULT_SETTINGS_FILE),
            number_of_workers: 1,
            worker_size: "Small".to_string(),
        }
    }
}

/// Settings for the generate pipeline.
#[derive(Debug, Clone)]
pub struct GenerateSettings {
    pub input_path: Utf8PathBuf,
    /// Anchor for relative input and output paths.
    pub working_dir: Utf8PathBuf,

    // Target
    pub region: String,
    pub subscription_id: String,
    pub resource_group: String,
    pub app_service_environment: Option<String>,

    // Output
    pub output_path: Option<Utf8PathBuf>,
    pub force: bool,

    pub defaults: PlanDefaults,
}

impl GenerateSettings {
    pub fn new(
        input_path: impl Into<Utf8PathBuf>,
        working_dir: impl Into<Utf8PathBuf>,
        region: impl Into<String>,
        subscription_id: impl Into<String>,
        resource_group: impl Into<String>,
    ) -> Self {
        Self {
            input_path: input_path.into(),
            working_dir: working_dir.into(),
            region: region.into(),
            subscription_id: subscription_id.into(),
            resource_group: resource_group.into(),
            app_service_environment: None,
            output_path: None,
            force: false,
            defaults: PlanDefaults::default(),
        }
    }

    /// The environment name, if one was given and is not blank.
    pub fn environment(&self) -> Option<&str> {
        self.app_service_environment
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn resolved_input_path(&self) -> Utf8PathBuf {
        absolutize(&self.input_path, &self.working_dir)
    }

    pub fn resolved_output_path(&self) -> Utf8PathBuf {
        let path: &Utf8Path = self
            .output_path
            .as_deref()
            .unwrap_or(self.defaults.output_path.as_path());
        absolutize(path, &self.working_dir)
    }
}
