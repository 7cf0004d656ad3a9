//! Configuration file loading for aspmig.
//!
//! Discovers and loads `aspmig.toml` from the working directory, or from an explicit
//! `--config` path. Merges file settings with CLI arguments (CLI takes precedence).

use anyhow::{Context, bail};
use aspmig_azure::{ArmConfig, DEFAULT_MANAGEMENT_ENDPOINT, DEFAULT_TIMEOUT};
use aspmig_core::settings::PlanDefaults;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "aspmig.toml";

/// Top-level configuration from aspmig.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AspmigConfig {
    /// Fallback values for every generated plan.
    pub defaults: DefaultsConfig,

    /// Azure Resource Manager connection.
    pub azure: AzureConfig,

    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DefaultsConfig {
    /// Settings file written when `--output` is absent. Relative to the working directory.
    pub output_path: Option<Utf8PathBuf>,

    pub number_of_workers: Option<u32>,

    pub worker_size: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AzureConfig {
    pub management_endpoint: Option<String>,

    /// Per-request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TelemetryConfig {
    /// Log run checkpoints under the `aspmig::telemetry` target.
    pub enabled: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Discover the aspmig.toml config file.
///
/// Returns `None` if the working directory has no config file.
pub fn discover_config(working_dir: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = working_dir.join(CONFIG_FILE_NAME);
    if config_path.is_file() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Load and parse an aspmig.toml config file.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<AspmigConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

/// Parse a config file from a string.
pub fn parse_config(contents: &str) -> anyhow::Result<AspmigConfig> {
    let config: AspmigConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Load the explicit config if given, else the discovered one, else defaults.
///
/// An explicit path that does not exist is an error.
pub fn load_or_default(
    working_dir: &Utf8Path,
    explicit: Option<&Utf8Path>,
) -> anyhow::Result<AspmigConfig> {
    if let Some(path) = explicit {
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            working_dir.join(path)
        };
        if !path.is_file() {
            bail!("config file {} does not exist", path);
        }
        return load_config(&path);
    }

    match discover_config(working_dir) {
        Some(path) => load_config(&path),
        None => Ok(AspmigConfig::default()),
    }
}

/// Configuration after file values and CLI arguments are combined.
#[derive(Debug, Clone)]
pub struct MergedConfig {
    pub defaults: PlanDefaults,
    pub arm: ArmConfig,
    pub telemetry_enabled: bool,
}

/// Builder for merging config file with CLI arguments.
pub struct ConfigMerger {
    config: AspmigConfig,
}

impl ConfigMerger {
    pub fn new(config: AspmigConfig) -> Self {
        Self { config }
    }

    /// Merge with generate command CLI arguments.
    ///
    /// CLI values win over file values; file values win over built-in defaults.
    pub fn merge_generate_args(
        self,
        cli_number_of_workers: Option<u32>,
        cli_worker_size: Option<&str>,
    ) -> MergedConfig {
        let builtin = PlanDefaults::default();
        let file = self.config.defaults;

        let defaults = PlanDefaults {
            output_path: file.output_path.unwrap_or(builtin.output_path),
            number_of_workers: cli_number_of_workers
                .or(file.number_of_workers)
                .unwrap_or(builtin.number_of_workers),
            worker_size: cli_worker_size
                .map(str::to_string)
                .or(file.worker_size)
                .unwrap_or(builtin.worker_size),
        };

        let arm = ArmConfig {
            endpoint: self
                .config
                .azure
                .management_endpoint
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_MANAGEMENT_ENDPOINT.to_string()),
            timeout: self
                .config
                .azure
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_TIMEOUT),
        };

        MergedConfig {
            defaults,
            arm,
            telemetry_enabled: self.config.telemetry.enabled,
        }
    }
}
