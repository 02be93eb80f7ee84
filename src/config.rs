use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

// =============================================================================
// Limits and defaults
// =============================================================================

/// Maximum number of package metadata reads in flight at once
pub const MAX_CONCURRENT_READS: usize = 50;

/// User agent sent to the suggestion service
pub const USER_AGENT: &str = concat!("plugup/", env!("CARGO_PKG_VERSION"));

/// Default suggestion endpoint
pub const DEFAULT_SUGGESTION_URL: &str = "https://plugins.example.org/api/suggest";

/// Default package name of the host application inside `node_modules`
pub const DEFAULT_HOST_PACKAGE: &str = "host-app";

/// Default naming convention for plugins and themes
pub const DEFAULT_PLUGIN_PATTERN: &str =
    r"^(@[a-z0-9._-]+/)?[a-z0-9._-]*(plugin|theme)-[a-z0-9._-]+$";

/// Application configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Host data directory holding the live `package.json` and `node_modules/`
    pub root: Option<PathBuf>,
    /// Manifest shipped with the host application
    pub bundled_manifest: Option<PathBuf>,
    pub host_package: String,
    /// Overrides the version read from the bundled manifest
    pub host_version: Option<String>,
    pub plugin_pattern: String,
    pub suggestion_url: String,
    pub package_manager: PackageManagerConfig,
    pub concurrency: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: None,
            bundled_manifest: None,
            host_package: DEFAULT_HOST_PACKAGE.to_string(),
            host_version: None,
            plugin_pattern: DEFAULT_PLUGIN_PATTERN.to_string(),
            suggestion_url: DEFAULT_SUGGESTION_URL.to_string(),
            package_manager: PackageManagerConfig::default(),
            concurrency: MAX_CONCURRENT_READS,
        }
    }
}

impl Config {
    /// Loads the configuration file, falling back to defaults when it does not exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Host data directory, defaulting to the current directory
    pub fn root_dir(&self) -> PathBuf {
        self.root.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Path of the bundled manifest, derived from the root when not configured
    pub fn bundled_manifest_path(&self) -> PathBuf {
        self.bundled_manifest.clone().unwrap_or_else(|| {
            self.root_dir()
                .join("node_modules")
                .join(&self.host_package)
                .join("package.json")
        })
    }

    /// Concurrency ceiling for metadata reads, clamped to `1..=MAX_CONCURRENT_READS`
    pub fn read_limit(&self) -> usize {
        self.concurrency.clamp(1, MAX_CONCURRENT_READS)
    }
}

/// External package manager invocation
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct PackageManagerConfig {
    pub executable: String,
    pub install_args: Vec<String>,
}

impl Default for PackageManagerConfig {
    fn default() -> Self {
        Self {
            executable: "npm".to_string(),
            install_args: vec!["install".to_string(), "--save".to_string()],
        }
    }
}

/// Suffix appended to the package manager executable on this platform
pub fn executable_suffix() -> &'static str {
    if cfg!(windows) { ".cmd" } else { "" }
}

/// Returns the path to the data directory for plugup.
/// Uses $XDG_DATA_HOME/plugup if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/plugup,
/// or ./plugup if neither is available.
pub fn data_dir() -> PathBuf {
    dir_with_env(
        std::env::var("XDG_DATA_HOME").ok(),
        dirs::home_dir(),
        ".local/share",
    )
}

/// Returns the path to the default configuration file.
pub fn config_path() -> PathBuf {
    dir_with_env(
        std::env::var("XDG_CONFIG_HOME").ok(),
        dirs::home_dir(),
        ".config",
    )
    .join("config.json")
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("plugup.log")
}

fn dir_with_env(xdg_home: Option<String>, home_dir: Option<PathBuf>, fallback: &str) -> PathBuf {
    let base = xdg_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(fallback)))
        .unwrap_or_else(|| PathBuf::from("."));

    base.join("plugup")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn config_from_partial_object_uses_defaults_for_missing_fields() {
        let result = serde_json::from_value::<Config>(json!({
            "suggestionUrl": "http://localhost:8080/suggest",
            "packageManager": {
                "executable": "pnpm"
            }
        }))
        .unwrap();

        assert_eq!(result.suggestion_url, "http://localhost:8080/suggest");
        assert_eq!(result.package_manager.executable, "pnpm");
        assert_eq!(
            result.package_manager.install_args,
            vec!["install".to_string(), "--save".to_string()]
        );
        assert_eq!(result.plugin_pattern, DEFAULT_PLUGIN_PATTERN);
        assert_eq!(result.concurrency, MAX_CONCURRENT_READS);
    }

    #[test]
    fn config_from_full_object_parses_all_fields() {
        let result = serde_json::from_value::<Config>(json!({
            "root": "/srv/host",
            "bundledManifest": "/opt/host/package.json",
            "hostPackage": "my-host",
            "hostVersion": "5.1.0",
            "pluginPattern": "^my-plugin-",
            "suggestionUrl": "http://localhost/suggest",
            "packageManager": {
                "executable": "yarn",
                "installArgs": ["add"]
            },
            "concurrency": 8
        }))
        .unwrap();

        assert_eq!(
            result,
            Config {
                root: Some(PathBuf::from("/srv/host")),
                bundled_manifest: Some(PathBuf::from("/opt/host/package.json")),
                host_package: "my-host".to_string(),
                host_version: Some("5.1.0".to_string()),
                plugin_pattern: "^my-plugin-".to_string(),
                suggestion_url: "http://localhost/suggest".to_string(),
                package_manager: PackageManagerConfig {
                    executable: "yarn".to_string(),
                    install_args: vec!["add".to_string()],
                },
                concurrency: 8,
            }
        );
    }

    #[test]
    fn load_returns_defaults_when_file_is_missing() {
        let temp_dir = TempDir::new().unwrap();

        let result = Config::load(&temp_dir.path().join("config.json")).unwrap();

        assert_eq!(result, Config::default());
    }

    #[test]
    fn load_fails_on_malformed_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let result = Config::load(&path);

        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn bundled_manifest_path_defaults_to_host_package_under_root() {
        let config = Config {
            root: Some(PathBuf::from("/srv/host")),
            ..Config::default()
        };

        assert_eq!(
            config.bundled_manifest_path(),
            PathBuf::from("/srv/host/node_modules/host-app/package.json")
        );
    }

    #[test]
    fn read_limit_is_clamped() {
        let zero = Config {
            concurrency: 0,
            ..Config::default()
        };
        let huge = Config {
            concurrency: 500,
            ..Config::default()
        };

        assert_eq!(zero.read_limit(), 1);
        assert_eq!(huge.read_limit(), MAX_CONCURRENT_READS);
    }

    #[test]
    fn dir_with_env_uses_xdg_home_when_set() {
        let path = dir_with_env(
            Some("/tmp/test-data".to_string()),
            Some(PathBuf::from("/home/user")),
            ".local/share",
        );

        assert_eq!(path, PathBuf::from("/tmp/test-data/plugup"));
    }

    #[test]
    fn dir_with_env_falls_back_to_home() {
        let path = dir_with_env(None, Some(PathBuf::from("/home/user")), ".config");

        assert_eq!(path, PathBuf::from("/home/user/.config/plugup"));
    }

    #[test]
    fn dir_with_env_falls_back_to_current_dir_when_no_dirs_available() {
        let path = dir_with_env(None, None, ".local/share");
        assert_eq!(path, PathBuf::from("./plugup"));
    }
}
