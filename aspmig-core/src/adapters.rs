//! Default port implementations.

use crate::ports::{PackageSource, SettingsWriter, TelemetrySink};
use crate::telemetry::{TelemetryEvent, TelemetryEventKind};
use anyhow::Context;
use aspmig_packages::PackageLoadError;
use aspmig_types::site::PackagedSite;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use std::io::Write;
use tracing::debug;

/// Loads package results from the filesystem via `aspmig_packages::load_sites`.
#[derive(Debug, Clone, Default)]
pub struct FsPackageSource;

impl PackageSource for FsPackageSource {
    fn load_sites(&self, input: &Utf8Path) -> Result<Vec<PackagedSite>, PackageLoadError> {
        aspmig_packages::load_sites(input)
    }
}

/// In-memory package results for embedding and testing.
///
/// Holds the raw document so the same parsing and filtering rules apply as for files.
#[derive(Debug, Clone)]
pub struct InMemoryPackageSource {
    contents: String,
}

impl InMemoryPackageSource {
    pub fn new(contents: impl Into<String>) -> Self {
        Self {
            contents: contents.into(),
        }
    }
}

impl PackageSource for InMemoryPackageSource {
    fn load_sites(&self, input: &Utf8Path) -> Result<Vec<PackagedSite>, PackageLoadError> {
        aspmig_packages::parse_sites(input, &self.contents)
    }
}

/// Filesystem writer: temp file in the destination directory, then rename.
#[derive(Debug, Clone, Default)]
pub struct FsSettingsWriter;

impl SettingsWriter for FsSettingsWriter {
    fn exists(&self, path: &Utf8Path) -> bool {
        path.exists()
    }

    fn write_atomic(&self, path: &Utf8Path, contents: &[u8], overwrite: bool) -> anyhow::Result<()> {
        let parent = match path.parent() {
            Some(p) if !p.as_str().is_empty() => p.to_path_buf(),
            _ => Utf8PathBuf::from("."),
        };
        fs::create_dir_all(&parent).with_context(|| format!("create parent dir for {}", path))?;

        let mut tmp = tempfile::Builder::new()
            .prefix(".aspmig-")
            .suffix(".tmp")
            .tempfile_in(&parent)
            .with_context(|| format!("create temp file in {}", parent))?;
        tmp.write_all(contents)
            .with_context(|| format!("write temp file for {}", path))?;
        tmp.as_file()
            .sync_all()
            .with_context(|| format!("flush temp file for {}", path))?;

        // On failure the temp file is dropped and removed; the destination is untouched.
        let persisted = if overwrite {
            tmp.persist(path)
        } else {
            tmp.persist_noclobber(path)
        };
        persisted
            .map_err(|e| e.error)
            .with_context(|| format!("rename temp file onto {}", path))?;
        Ok(())
    }
}

/// Logs events under the `aspmig::telemetry` target.
#[derive(Debug, Clone, Default)]
pub struct TracingTelemetrySink;

impl TelemetrySink for TracingTelemetrySink {
    fn record(&self, event: &TelemetryEvent) -> anyhow::Result<()> {
        let run_id = event.run_id.to_string();
        match &event.kind {
            TelemetryEventKind::Started { has_environment } => debug!(
                target: "aspmig::telemetry",
                run_id = %run_id,
                has_environment,
                "start"
            ),
            TelemetryEventKind::TierFallback { tier, reason } => debug!(
                target: "aspmig::telemetry",
                run_id = %run_id,
                tier = %tier,
                reason = %reason,
                "tier-fallback"
            ),
            TelemetryEventKind::Succeeded { tier, plans, sites } => debug!(
                target: "aspmig::telemetry",
                run_id = %run_id,
                tier = %tier,
                plans,
                sites,
                "success"
            ),
            TelemetryEventKind::Failed {
                error_kind,
                exit_code,
            } => debug!(
                target: "aspmig::telemetry",
                run_id = %run_id,
                error_kind,
                exit_code,
                "failure"
            ),
        }
        Ok(())
    }
}

/// Discards every event.
#[derive(Debug, Clone, Default)]
pub struct NullTelemetrySink;

impl TelemetrySink for NullTelemetrySink {
    fn record(&self, _event: &TelemetryEvent) -> anyhow::Result<()> {
        Ok(())
    }
}
