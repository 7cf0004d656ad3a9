use aspmig_types::site::{PackageRecord, PackagedSite};
use camino::Utf8Path;
use fs_err as fs;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PackageLoadError {
    #[error("cannot read package results {path}: {message}")]
    Parse { path: String, message: String },

    #[error("package results {path} contain no site with a package ({skipped} skipped)")]
    Empty { path: String, skipped: usize },
}

/// Reads a package-results file and keeps the sites that have a package.
pub fn load_sites(path: &Utf8Path) -> Result<Vec<PackagedSite>, PackageLoadError> {
    debug!(path = %path, "loading package results");

    let contents = fs::read_to_string(path).map_err(|e| PackageLoadError::Parse {
        path: path.to_string(),
        message: e.to_string(),
    })?;

    parse_sites(path, &contents)
}

/// Parses package results already in memory. `path` is used for messages only.
pub fn parse_sites(path: &Utf8Path, contents: &str) -> Result<Vec<PackagedSite>, PackageLoadError> {
    // Files written by Windows tooling often start with a byte order mark.
    let contents = contents.trim_start_matches('\u{feff}');

    // A list of records, or a lone record when the packaging step handled one site.
    let parsed = if contents.trim_start().starts_with('[') {
        serde_json::from_str::<Vec<PackageRecord>>(contents)
    } else {
        serde_json::from_str::<PackageRecord>(contents).map(|record| vec![record])
    };
    let records = parsed.map_err(|e| PackageLoadError::Parse {
        path: path.to_string(),
        message: e.to_string(),
    })?;

    let total = records.len();
    let mut sites = Vec::with_capacity(total);
    for record in records {
        let name = record.site_name.clone();
        match record.into_packaged() {
            Some(site) => sites.push(site),
            None => debug!(site = %name, "skipping site without a package"),
        }
    }

    if sites.is_empty() {
        return Err(PackageLoadError::Empty {
            path: path.to_string(),
            skipped: total,
        });
    }

    debug!(kept = sites.len(), skipped = total - sites.len(), "package results loaded");
    Ok(sites)
}
