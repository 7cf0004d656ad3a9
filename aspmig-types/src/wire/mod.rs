//! Schema-exact representations of the files aspmig reads and writes.
//!
//! Field names here are consumed by the downstream migration tool and must not change.

use serde::{Deserialize, Serialize};

pub mod settings_v1;

pub use settings_v1::{AppServicePlanV1, SettingsV1, SiteV1};

/// Errors emitted while converting wire models back into internal models.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    UnknownTier { plan: String, tier: String },
}

impl std::fmt::Display for WireError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WireError::UnknownTier { plan, tier } => {
                write!(f, "plan {} has unknown tier '{}'", plan, tier)
            }
        }
    }
}

impl std::error::Error for WireError {}

/// Tier string as written on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TierV1(pub String);
