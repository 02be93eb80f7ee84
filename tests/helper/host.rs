//! On-disk host fixtures

use std::path::{Path, PathBuf};

use serde_json::json;
use tempfile::TempDir;

use plugup::config::DEFAULT_PLUGIN_PATTERN;
use plugup::inventory::manifest::HostLayout;
use plugup::inventory::resolver::PluginPattern;

/// A temporary host directory with a live manifest, a bundled manifest and
/// installed packages
pub struct HostFixture {
    dir: TempDir,
    live: Vec<String>,
    bundled: Vec<String>,
    host_version: Option<String>,
}

impl HostFixture {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
            live: Vec::new(),
            bundled: Vec::new(),
            host_version: Some("5.4.0".to_string()),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn bundled_manifest(&self) -> PathBuf {
        self.root().join("host/package.json")
    }

    pub fn layout(&self) -> HostLayout {
        HostLayout::new(self.root(), self.bundled_manifest())
    }

    pub fn pattern(&self) -> PluginPattern {
        PluginPattern::new(DEFAULT_PLUGIN_PATTERN).unwrap()
    }

    /// Declare `name` in the live manifest and install it at `version`
    pub fn with_plugin(mut self, name: &str, version: &str) -> Self {
        self.live.push(name.to_string());
        self.install(name, version);
        self
    }

    /// Declare `name` in the live manifest without installing it
    pub fn with_declared(mut self, name: &str) -> Self {
        self.live.push(name.to_string());
        self
    }

    /// Declare `name` in the bundled manifest
    pub fn with_bundled(mut self, name: &str) -> Self {
        self.bundled.push(name.to_string());
        self
    }

    /// Mark an installed package as a version-control checkout
    pub fn with_git_checkout(self, name: &str) -> Self {
        std::fs::create_dir_all(self.package_dir(name).join(".git")).unwrap();
        self
    }

    pub fn without_host_version(mut self) -> Self {
        self.host_version = None;
        self
    }

    /// Write both manifests; call after all `with_*` builders
    pub fn build(self) -> Self {
        let deps = |names: &[String]| -> serde_json::Map<String, serde_json::Value> {
            names.iter().map(|n| (n.clone(), json!("*"))).collect()
        };

        let live = json!({ "name": "host-data", "dependencies": deps(&self.live) });
        write(&self.root().join("package.json"), &live.to_string());

        let mut bundled = json!({ "name": "host-app", "dependencies": deps(&self.bundled) });
        if let Some(version) = &self.host_version {
            bundled["version"] = json!(version);
        }
        write(&self.bundled_manifest(), &bundled.to_string());

        self
    }

    pub fn package_dir(&self, name: &str) -> PathBuf {
        name.split('/')
            .fold(self.root().join("node_modules"), |dir, part| dir.join(part))
    }

    fn install(&self, name: &str, version: &str) {
        let manifest = json!({ "name": name, "version": version });
        write(
            &self.package_dir(name).join("package.json"),
            &manifest.to_string(),
        );
    }
}

fn write(path: &Path, content: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}
