//! Embeddable core library for aspmig.
//!
//! Provides a clap-free, I/O-abstracted entry point that turns a package-results file into
//! a migration settings document.
//!
//! # Port traits
//!
//! All I/O is abstracted behind port traits in [`ports`]:
//! - [`PackageSource`](ports::PackageSource): load packaged sites
//! - [`AzureResources`](ports::AzureResources): look up environments and SKU availability
//! - [`SettingsWriter`](ports::SettingsWriter): persist the settings document
//! - [`TelemetrySink`](ports::TelemetrySink): best-effort event reporting
//! - [`PlanNamer`](ports::PlanNamer): generate plan names
//!
//! The [`adapters`] module provides default filesystem-backed implementations.
//!
//! # Entry point
//!
//! - [`run_generate`](pipeline::run_generate): resolve tier, allocate plans, write settings

pub mod adapters;
pub mod emit;
pub mod error;
pub mod pipeline;
pub mod ports;
pub mod settings;
pub mod telemetry;

// Re-export domain pieces so embedders don't need aspmig-domain directly.
pub use aspmig_domain::{
    DatedPlanNamer, EnvironmentDetails, ResolutionWarning, ResourceQuery, ResourceRef,
    SequentialPlanNamer, TierResolution,
};

// Re-export loader errors so embedders don't need aspmig-packages directly.
pub use aspmig_packages::PackageLoadError;
