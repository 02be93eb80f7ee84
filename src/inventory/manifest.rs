//! Reading package manifests and installed module directories

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::debug;

use crate::error::InventoryError;

/// Name of the manifest file inside every package directory
pub const MANIFEST_FILE: &str = "package.json";

/// Directory holding installed packages
pub const MODULES_DIR: &str = "node_modules";

/// The two fields of a package manifest this tool cares about
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Manifest {
    /// Declared dependencies, in manifest order
    #[serde(default)]
    pub dependencies: IndexMap<String, String>,
    #[serde(default)]
    pub version: Option<String>,
}

impl Manifest {
    pub fn contains(&self, name: &str) -> bool {
        self.dependencies.contains_key(name)
    }

    pub fn dependency_names(&self) -> impl Iterator<Item = &str> {
        self.dependencies.keys().map(String::as_str)
    }
}

/// Where the host keeps its manifests and installed packages
#[derive(Debug, Clone, PartialEq)]
pub struct HostLayout {
    /// Host data directory (live manifest and `node_modules/`)
    pub root: PathBuf,
    /// Manifest shipped with the host application
    pub bundled_manifest: PathBuf,
}

impl HostLayout {
    pub fn new(root: impl Into<PathBuf>, bundled_manifest: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            bundled_manifest: bundled_manifest.into(),
        }
    }

    pub fn live_manifest(&self) -> PathBuf {
        self.root.join(MANIFEST_FILE)
    }

    pub fn modules_dir(&self) -> PathBuf {
        self.root.join(MODULES_DIR)
    }

    pub fn package_dir(&self, name: &str) -> PathBuf {
        package_dir(&self.modules_dir(), name)
    }
}

/// Directory of an installed package; scoped names map to nested directories
pub fn package_dir(modules_dir: &Path, name: &str) -> PathBuf {
    name.split('/')
        .fold(modules_dir.to_path_buf(), |dir, part| dir.join(part))
}

/// Read and parse a manifest file
pub async fn read_manifest(path: &Path) -> Result<Manifest, InventoryError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| InventoryError::ManifestRead {
            path: path.to_path_buf(),
            source,
        })?;

    let manifest: Manifest =
        serde_json::from_str(&content).map_err(|source| InventoryError::ManifestParse {
            path: path.to_path_buf(),
            source,
        })?;

    debug!(
        "Read {} dependencies from {}",
        manifest.dependencies.len(),
        path.display()
    );
    Ok(manifest)
}

/// List the package names installed under `modules_dir`
///
/// Scoped packages (`@scope/name`) are listed with their scope. Hidden
/// entries such as `.bin` are skipped. A missing directory yields an empty list.
pub async fn list_installed(modules_dir: &Path) -> std::io::Result<Vec<String>> {
    let mut names = Vec::new();

    for entry in read_dir_names(modules_dir).await? {
        if entry.starts_with('.') {
            continue;
        }

        if entry.starts_with('@') {
            for scoped in read_dir_names(&modules_dir.join(&entry)).await? {
                if !scoped.starts_with('.') {
                    names.push(format!("{}/{}", entry, scoped));
                }
            }
        } else {
            names.push(entry);
        }
    }

    names.sort();
    Ok(names)
}

async fn read_dir_names(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_dir()
            && let Some(name) = entry.file_name().to_str()
        {
            names.push(name.to_string());
        }
    }
    Ok(names)
}
