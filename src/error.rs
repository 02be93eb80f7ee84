use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid plugin pattern: {0}")]
    Pattern(#[from] regex::Error),
}

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("Failed to read manifest {path}: {source}")]
    ManifestRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse manifest {path}: {source}")]
    ManifestParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Manifest {path} has no version field")]
    MissingHostVersion { path: PathBuf },

    #[error("Failed to read metadata for {package}: {source}")]
    VersionRead {
        package: String,
        source: std::io::Error,
    },

    #[error("Failed to parse metadata for {package}: {source}")]
    VersionParse {
        package: String,
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum SuggestionError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid suggestion endpoint {url}: {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("Unexpected status: {0}")]
    Status(reqwest::StatusCode),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Error)]
pub enum InstallError {
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("{program} exited with {status}")]
    Failed {
        program: String,
        status: std::process::ExitStatus,
    },
}

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Failed to read confirmation: {0}")]
    Io(#[from] std::io::Error),

    #[error("Input closed before an answer was given")]
    Closed,
}

/// Any failure that aborts an upgrade check
#[derive(Debug, Error)]
pub enum CheckError {
    #[error(transparent)]
    Inventory(#[from] InventoryError),

    #[error("Suggestion query failed: {0}")]
    Suggestion(#[from] SuggestionError),

    #[error("Install failed: {0}")]
    Install(#[from] InstallError),

    #[error(transparent)]
    Prompt(#[from] PromptError),
}
