//! Port traits abstracting all I/O away from the pipeline.

use crate::telemetry::TelemetryEvent;
use aspmig_packages::PackageLoadError;
use aspmig_types::site::PackagedSite;
use camino::Utf8Path;

pub use aspmig_domain::{AzureResources, PlanNamer};

/// Source of packaged sites.
pub trait PackageSource {
    fn load_sites(&self, input: &Utf8Path) -> Result<Vec<PackagedSite>, PackageLoadError>;
}

/// Persistence for the settings document.
pub trait SettingsWriter {
    fn exists(&self, path: &Utf8Path) -> bool;

    /// Replaces `path` with `contents` so that readers see either the old file or the
    /// complete new one. Without `overwrite`, a file that appeared at `path` in the meantime
    /// is kept and the write fails with an `io::ErrorKind::AlreadyExists` in its chain.
    fn write_atomic(&self, path: &Utf8Path, contents: &[u8], overwrite: bool) -> anyhow::Result<()>;
}

/// Best-effort event reporting. Errors are logged and dropped by the caller.
pub trait TelemetrySink {
    fn record(&self, event: &TelemetryEvent) -> anyhow::Result<()>;
}
