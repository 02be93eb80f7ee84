use std::cmp::Ordering;

use semver::Version;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareResult {
    /// Installed version equals the suggested one
    Latest,
    /// Suggested version is newer
    Outdated,
    /// Installed version is newer than the suggestion
    Newer,
    /// Either side is not a valid version
    Invalid,
}

/// Parse a version string into a semver::Version, normalizing partial versions.
///
/// Strips a leading 'v' and pads partial versions with zeros.
///
/// Examples:
/// - "1" -> Version(1, 0, 0)
/// - "v1.2" -> Version(1, 2, 0)
/// - "1.2.3-rc.1" -> Version(1, 2, 3-rc.1)
pub fn parse_version(version: &str) -> Option<Version> {
    let version = version.trim();
    let version = version.strip_prefix('v').unwrap_or(version);
    let parts: Vec<&str> = version.split('.').collect();
    let normalized = match parts.len() {
        1 => format!("{}.0.0", parts[0]),
        2 => format!("{}.{}.0", parts[0], parts[1]),
        _ => version.to_string(),
    };
    Version::parse(&normalized).ok()
}

/// Parse a version that will be pinned on install
///
/// No normalization: `1.2` or `v1.2.3` would be read as a range by the package manager.
pub fn parse_exact_version(version: &str) -> Option<Version> {
    Version::parse(version).ok()
}

/// Compare an installed version against a suggested one
///
/// The installed side is normalized, the suggested side must be an exact version.
pub fn compare_versions(installed: &str, suggested: &str) -> CompareResult {
    let (Some(installed), Some(suggested)) =
        (parse_version(installed), parse_exact_version(suggested))
    else {
        return CompareResult::Invalid;
    };

    // build metadata does not participate in precedence
    match installed.cmp_precedence(&suggested) {
        Ordering::Less => CompareResult::Outdated,
        Ordering::Equal => CompareResult::Latest,
        Ordering::Greater => CompareResult::Newer,
    }
}
