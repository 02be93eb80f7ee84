//! Loading installed versions of candidate plugins

use std::collections::HashMap;
use std::path::Path;

use futures::stream::{self, StreamExt, TryStreamExt};
use serde::Deserialize;
use tracing::debug;

use crate::error::InventoryError;
use crate::inventory::manifest::{MANIFEST_FILE, package_dir};

/// Installed package name and version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledPackage {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Deserialize)]
struct PackageMetadata {
    version: String,
}

/// Read the installed version of a single package
pub async fn read_installed(
    modules_dir: &Path,
    name: &str,
) -> Result<InstalledPackage, InventoryError> {
    let path = package_dir(modules_dir, name).join(MANIFEST_FILE);

    let content = tokio::fs::read_to_string(&path)
        .await
        .map_err(|source| InventoryError::VersionRead {
            package: name.to_string(),
            source,
        })?;

    let metadata: PackageMetadata =
        serde_json::from_str(&content).map_err(|source| InventoryError::VersionParse {
            package: name.to_string(),
            source,
        })?;

    Ok(InstalledPackage {
        name: name.to_string(),
        version: metadata.version,
    })
}

/// Build a name -> installed version map for all candidates
///
/// At most `limit` metadata files are open at once. The first failure aborts
/// the remaining reads and is returned; no partial map is produced.
pub async fn load_versions(
    modules_dir: &Path,
    candidates: &[String],
    limit: usize,
) -> Result<HashMap<String, String>, InventoryError> {
    let versions = load_with(candidates, limit, |name| read_installed(modules_dir, name)).await?;

    debug!("Loaded installed versions for {} plugins", versions.len());
    Ok(versions)
}

/// Run `read` for every candidate with at most `limit` reads in flight
async fn load_with<'a, F, Fut>(
    candidates: &'a [String],
    limit: usize,
    read: F,
) -> Result<HashMap<String, String>, InventoryError>
where
    F: Fn(&'a str) -> Fut,
    Fut: Future<Output = Result<InstalledPackage, InventoryError>>,
{
    stream::iter(candidates)
        .map(|name| read(name.as_str()))
        .buffer_unordered(limit.max(1))
        .map_ok(|package| (package.name, package.version))
        .try_collect()
        .await
}
