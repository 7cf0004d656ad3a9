//! Error taxonomy for the generate pipeline.
//!
//! Each class maps to its own process exit code:
//! - 2: invalid arguments, or an existing output file without overwrite
//! - 3: package results missing, unreadable or malformed
//! - 4: package results without any packaged site
//! - 5: App Service Environment missing or its lookup failed
//! - 6: allocation precondition violated
//! - 7: settings file could not be written
//! - 1: anything else

use crate::emit::EmitError;
use aspmig_domain::{AllocationError, TierError};
use aspmig_packages::PackageLoadError;
use camino::Utf8PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("invalid arguments: {0}")]
    Validation(String),

    #[error("{path} already exists and overwrite was not requested")]
    OutputExists { path: Utf8PathBuf },

    #[error(transparent)]
    Input(#[from] PackageLoadError),

    #[error(transparent)]
    ResourceLookup(#[from] TierError),

    #[error(transparent)]
    Allocation(#[from] AllocationError),

    #[error("failed to write {path}: {message}")]
    Output { path: Utf8PathBuf, message: String },

    #[error("{0:#}")]
    Internal(#[from] anyhow::Error),
}

impl From<EmitError> for ToolError {
    fn from(err: EmitError) -> Self {
        match err {
            EmitError::AlreadyExists { path } => ToolError::OutputExists { path },
            EmitError::Serialize { path, message } | EmitError::Write { path, message } => {
                ToolError::Output { path, message }
            }
        }
    }
}

impl ToolError {
    /// Returns the recommended exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            ToolError::Validation(_) | ToolError::OutputExists { .. } => 2,
            ToolError::Input(PackageLoadError::Parse { .. }) => 3,
            ToolError::Input(PackageLoadError::Empty { .. }) => 4,
            ToolError::ResourceLookup(_) => 5,
            ToolError::Allocation(_) => 6,
            ToolError::Output { .. } => 7,
            ToolError::Internal(_) => 1,
        }
    }

    /// Stable short name used in telemetry.
    pub fn kind(&self) -> &'static str {
        match self {
            ToolError::Validation(_) => "validation",
            ToolError::OutputExists { .. } => "output_exists",
            ToolError::Input(PackageLoadError::Parse { .. }) => "parse",
            ToolError::Input(PackageLoadError::Empty { .. }) => "empty_input",
            ToolError::ResourceLookup(_) => "resource_lookup",
            ToolError::Allocation(_) => "allocation",
            ToolError::Output { .. } => "output",
            ToolError::Internal(_) => "internal",
        }
    }
}
