//! Resolution of extraneous plugin packages

use std::path::Path;

use regex::Regex;
use tracing::{debug, warn};

use crate::error::{ConfigError, InventoryError};
use crate::inventory::manifest::{HostLayout, Manifest, list_installed, read_manifest};

/// Marker whose presence means a package was checked out from version control
pub const VCS_MARKER: &str = ".git";

/// Naming convention identifying plugin and theme packages
#[derive(Debug, Clone)]
pub struct PluginPattern(Regex);

impl PluginPattern {
    pub fn new(pattern: &str) -> Result<Self, ConfigError> {
        Ok(Self(Regex::new(pattern)?))
    }

    pub fn matches(&self, name: &str) -> bool {
        self.0.is_match(name)
    }
}

/// Plugins declared in the live manifest that the host does not ship itself
///
/// Keeps live-manifest order. Does not look at the filesystem.
pub fn extraneous_plugins(
    live: &Manifest,
    bundled: &Manifest,
    pattern: &PluginPattern,
) -> Vec<String> {
    live.dependency_names()
        .filter(|name| pattern.matches(name))
        .filter(|name| !bundled.contains(name))
        .map(str::to_string)
        .collect()
}

/// Whether the package directory carries a version-control marker
///
/// Any failure to inspect the marker counts as absent.
pub async fn has_vcs_marker(package_dir: &Path) -> bool {
    tokio::fs::try_exists(package_dir.join(VCS_MARKER))
        .await
        .inspect_err(|e| debug!("Could not check {}: {}", package_dir.display(), e))
        .unwrap_or(false)
}

/// Candidate plugins plus the version the bundled manifest declares
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedInventory {
    pub candidates: Vec<String>,
    pub bundled_version: Option<String>,
}

/// Resolve the candidate set for an upgrade check
///
/// Fails if either manifest cannot be read or parsed.
pub async fn resolve_candidates(
    layout: &HostLayout,
    pattern: &PluginPattern,
) -> Result<ResolvedInventory, InventoryError> {
    let live_path = layout.live_manifest();
    let (live, bundled) = tokio::try_join!(
        read_manifest(&live_path),
        read_manifest(&layout.bundled_manifest)
    )?;

    let mut candidates = Vec::new();
    for name in extraneous_plugins(&live, &bundled, pattern) {
        if has_vcs_marker(&layout.package_dir(&name)).await {
            debug!("Skipping {}: installed from a version-control checkout", name);
            continue;
        }
        candidates.push(name);
    }

    report_undeclared(layout, &live, &bundled, pattern).await;

    debug!("Resolved {} candidate plugins", candidates.len());
    Ok(ResolvedInventory {
        candidates,
        bundled_version: bundled.version,
    })
}

/// Warn about plugin directories that neither manifest declares
async fn report_undeclared(
    layout: &HostLayout,
    live: &Manifest,
    bundled: &Manifest,
    pattern: &PluginPattern,
) {
    let installed = match list_installed(&layout.modules_dir()).await {
        Ok(installed) => installed,
        Err(e) => {
            warn!("Failed to list {}: {}", layout.modules_dir().display(), e);
            return;
        }
    };

    for name in installed
        .iter()
        .filter(|name| pattern.matches(name))
        .filter(|name| !live.contains(name) && !bundled.contains(name))
    {
        warn!("Plugin {} is installed but not declared in any manifest", name);
    }
}
