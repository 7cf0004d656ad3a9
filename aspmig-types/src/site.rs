use serde::{Deserialize, Serialize};

/// One raw record from a package-results file.
///
/// `SitePackagePath` is `null` for sites whose packaging failed; those records are
/// dropped by the loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRecord {
    #[serde(rename = "SiteName")]
    pub site_name: String,

    #[serde(rename = "SitePackagePath", default)]
    pub site_package_path: Option<String>,
}

impl PackageRecord {
    /// Returns the packaged form of this record, if it has a usable package path.
    pub fn into_packaged(self) -> Option<PackagedSite> {
        let path = self.site_package_path?;
        if path.trim().is_empty() {
            return None;
        }
        Some(PackagedSite {
            site_name: self.site_name,
            package_path: path,
        })
    }
}

/// A site that has a package on disk.
///
/// `package_path` is kept exactly as it appeared in the input; it is resolved to an
/// absolute path only when the site is assigned to a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackagedSite {
    pub site_name: String,
    pub package_path: String,
}

impl PackagedSite {
    pub fn new(site_name: impl Into<String>, package_path: impl Into<String>) -> Self {
        Self {
            site_name: site_name.into(),
            package_path: package_path.into(),
        }
    }
}
