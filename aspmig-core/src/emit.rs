//! Settings Emitter: serialize the allocation and persist it.

use crate::ports::SettingsWriter;
use aspmig_types::plan::MigrationSettings;
use aspmig_types::wire::SettingsV1;
use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EmitError {
    #[error("{path} already exists")]
    AlreadyExists { path: Utf8PathBuf },

    #[error("failed to serialize settings for {path}: {message}")]
    Serialize { path: Utf8PathBuf, message: String },

    #[error("failed to write {path}: {message}")]
    Write { path: Utf8PathBuf, message: String },
}

/// Serializes the document in wire form.
pub fn render_settings(settings: &MigrationSettings) -> serde_json::Result<String> {
    let wire = SettingsV1::from(settings);
    serde_json::to_string_pretty(&wire)
}

/// Writes `settings` to `output_path`, refusing to replace an existing file unless
/// `overwrite` is set. Returns the path written.
pub fn emit_settings(
    settings: &MigrationSettings,
    output_path: &Utf8Path,
    overwrite: bool,
    writer: &dyn SettingsWriter,
) -> Result<Utf8PathBuf, EmitError> {
    if writer.exists(output_path) {
        if !overwrite {
            return Err(EmitError::AlreadyExists {
                path: output_path.to_path_buf(),
            });
        }
        debug!(path = %output_path, "overwriting existing settings");
    }

    let json = render_settings(settings).map_err(|e| EmitError::Serialize {
        path: output_path.to_path_buf(),
        message: e.to_string(),
    })?;

    writer
        .write_atomic(output_path, json.as_bytes(), overwrite)
        .map_err(|e| {
            if is_already_exists(&e) {
                EmitError::AlreadyExists {
                    path: output_path.to_path_buf(),
                }
            } else {
                EmitError::Write {
                    path: output_path.to_path_buf(),
                    message: format!("{e:#}"),
                }
            }
        })?;

    info!(
        path = %output_path,
        plans = settings.plans.len(),
        sites = settings.site_count(),
        "wrote migration settings"
    );
    Ok(output_path.to_path_buf())
}

fn is_already_exists(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<std::io::Error>()
            .is_some_and(|io| io.kind() == std::io::ErrorKind::AlreadyExists)
    })
}
