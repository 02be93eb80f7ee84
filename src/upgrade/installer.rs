//! Running the external package manager

#[cfg(test)]
use mockall::automock;

use std::path::PathBuf;

use tokio::process::Command;
use tracing::{error, info};

use crate::config::PackageManagerConfig;
use crate::error::InstallError;

/// Trait for applying pinned package installs
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Installer: Send + Sync {
    /// Install every `name@version` spec in one invocation
    async fn install(&self, specs: &[String]) -> Result<(), InstallError>;
}

/// Installer that shells out to the configured package manager
pub struct PackageManagerInstaller {
    config: PackageManagerConfig,
    suffix: String,
    working_dir: PathBuf,
}

impl PackageManagerInstaller {
    /// `suffix` is appended to the executable (e.g. `.cmd` on Windows)
    pub fn new(
        config: PackageManagerConfig,
        suffix: &str,
        working_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            config,
            suffix: suffix.to_string(),
            working_dir: working_dir.into(),
        }
    }

    pub fn program(&self) -> String {
        format!("{}{}", self.config.executable, self.suffix)
    }

    /// Full argument list: install subcommand followed by the pinned specs
    pub fn args(&self, specs: &[String]) -> Vec<String> {
        self.config
            .install_args
            .iter()
            .chain(specs)
            .cloned()
            .collect()
    }
}

#[async_trait::async_trait]
impl Installer for PackageManagerInstaller {
    async fn install(&self, specs: &[String]) -> Result<(), InstallError> {
        let program = self.program();
        let args = self.args(specs);
        info!("Running {} {}", program, args.join(" "));

        let status = Command::new(&program)
            .args(&args)
            .current_dir(&self.working_dir)
            .status()
            .await
            .map_err(|source| InstallError::Spawn {
                program: program.clone(),
                source,
            })?;

        if !status.success() {
            error!("{} exited with {}", program, status);
            return Err(InstallError::Failed { program, status });
        }

        Ok(())
    }
}
