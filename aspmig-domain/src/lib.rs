//! Domain logic: pick a hosting tier and pack sites into App Service Plans.
//!
//! This crate owns *what* the settings document contains. It does not read input files or
//! write output; that's the `aspmig-core` pipeline.

mod allocator;
mod naming;
mod paths;
mod ports;
mod tier;

pub use allocator::{AllocationError, PlanTemplate, allocate};
pub use naming::{DatedPlanNamer, PlanNamer, SequentialPlanNamer};
pub use paths::{PackagePaths, absolutize, is_absolute_package_path, normalize_lexically};
pub use ports::{AzureResources, EnvironmentDetails, ResourceQuery, ResourceRef};
pub use tier::{
    ASE_RESOURCE_TYPE, ASE_V2_KIND, PREMIUM_V3_SKU, ResolutionWarning, TierError, TierRequest,
    TierResolution, TierResolver, normalize_region, resolve_tier,
};
