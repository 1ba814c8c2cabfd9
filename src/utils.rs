//! Artifact naming and line-delimited input helpers

use crate::error::{Error, Result};
use std::path::Path;

/// Prefix of the empty marker written for pages that returned 404
pub const NOT_FOUND_PREFIX: &str = "NOT_FOUND_";

/// Extension appended to every artifact name
pub const ARTIFACT_EXTENSION: &str = "html";

/// Suffix of an artifact that is still being written
pub const PARTIAL_SUFFIX: &str = ".part";

/// Strip surrounding whitespace and leading/trailing path separators
///
/// ```
/// use page_harvester::utils::normalize_url;
///
/// assert_eq!(normalize_url(" https://s.example/2019/08/24/x/ "), "https://s.example/2019/08/24/x");
/// ```
pub fn normalize_url(url: &str) -> &str {
    url.trim().trim_matches('/')
}

/// Artifact name taken from the last path segment of a normalized URL
///
/// ```
/// use page_harvester::utils::short_name;
///
/// assert_eq!(short_name("https://s.example/2019/08/24/x").unwrap(), "x.html");
/// ```
pub fn short_name(url: &str) -> Result<String> {
    let segment = url.rsplit('/').next().unwrap_or_default();
    if segment.is_empty() {
        return Err(Error::InvalidUrl {
            url: url.to_string(),
            reason: "no path segment to name the artifact after".to_string(),
        });
    }
    Ok(format!("{segment}.{ARTIFACT_EXTENSION}"))
}

/// Collision-proof artifact name built from the URL's full path
///
/// Slashes become `-`, so two URLs sharing a last segment but differing anywhere
/// else in the path get different names.
///
/// ```
/// use page_harvester::utils::path_derived_name;
///
/// assert_eq!(
///     path_derived_name("https://s.example/2019/08/23/x").unwrap(),
///     "2019-08-23-x.html"
/// );
/// ```
pub fn path_derived_name(url: &str) -> Result<String> {
    let path = match url::Url::parse(url) {
        Ok(parsed) => parsed.path().trim_matches('/').to_string(),
        // Scheme-less input: everything after the host-ish first segment is the path
        Err(_) => url.split_once('/').map(|(_, p)| p).unwrap_or(url).to_string(),
    };
    let path = path.trim_matches('/');
    if path.is_empty() {
        return Err(Error::InvalidUrl {
            url: url.to_string(),
            reason: "no path to derive a collision-free name from".to_string(),
        });
    }
    Ok(format!("{}.{ARTIFACT_EXTENSION}", path.replace('/', "-")))
}

/// [`path_derived_name`] prefixed with the URL's host
///
/// Used when the path alone is already taken, e.g. the same path on two sites.
///
/// ```
/// use page_harvester::utils::host_qualified_name;
///
/// assert_eq!(
///     host_qualified_name("https://b.example/2019/x").unwrap(),
///     "b.example-2019-x.html"
/// );
/// ```
pub fn host_qualified_name(url: &str) -> Result<String> {
    let derived = path_derived_name(url)?;
    let host = match url::Url::parse(url) {
        Ok(parsed) => parsed.host_str().unwrap_or_default().to_string(),
        Err(_) => url
            .split_once('/')
            .map(|(host, _)| host)
            .unwrap_or_default()
            .to_string(),
    };
    if host.is_empty() {
        return Ok(derived);
    }
    Ok(format!("{host}-{derived}"))
}

/// Name of the not-found marker that pairs with an artifact name
pub fn not_found_name(file_name: &str) -> String {
    format!("{NOT_FOUND_PREFIX}{file_name}")
}

/// Whether a directory entry is a not-found marker
pub fn is_not_found_marker(file_name: &str) -> bool {
    file_name.starts_with(NOT_FOUND_PREFIX)
}

/// Whether a directory entry is an interrupted, not yet renamed write
pub fn is_partial_artifact(file_name: &str) -> bool {
    file_name.ends_with(PARTIAL_SUFFIX)
}

/// Read a line-delimited file, trimming each line and dropping blank ones
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    let raw = std::fs::read_to_string(path).map_err(|e| Error::storage(path, e))?;
    Ok(raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
