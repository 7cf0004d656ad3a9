//! Shared DTOs (schemas-as-code) for the aspmig workspace.
//!
//! # Design constraints
//! - The wire types are consumed by a downstream migration tool; field names are fixed.
//! - Internal types use Rust naming; [`wire`] owns the exact on-disk shape.
//! - Prefer adding optional fields over changing semantics.

pub mod plan;
pub mod site;
pub mod tier;
pub mod wire;

/// Well-known file names.
pub mod files {
    /// Default name of the emitted settings document.
    pub const DEFAULT_SETTINGS_FILE: &str = "MigrationSettings.json";
    /// Name the packaging step gives its results file.
    pub const DEFAULT_PACKAGE_RESULTS_FILE: &str = "PackageResults.json";
}
