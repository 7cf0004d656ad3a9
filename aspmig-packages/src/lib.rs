//! Package-results ingestion.
//!
//! The packaging step writes one record per IIS site. Records whose package path is null
//! belong to sites that failed to package and are skipped here; an input with no packaged
//! site at all is reported separately from an unreadable one.

mod load;

pub use load::{PackageLoadError, load_sites, parse_sites};
