//! End-to-end upgrade check: inventory, suggestions, plan, confirmation, install

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{CheckError, InventoryError};
use crate::inventory::loader::load_versions;
use crate::inventory::manifest::HostLayout;
use crate::inventory::resolver::{PluginPattern, resolve_candidates};
use crate::upgrade::installer::Installer;
use crate::upgrade::planner::{UpgradePlan, build_plan};
use crate::upgrade::prompt::Confirmer;
use crate::upgrade::suggestion::SuggestionService;

/// How a completed run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// No candidates, or nothing newer was suggested
    UpToDate,
    /// The user declined the plan; nothing was changed
    Skipped(UpgradePlan),
    /// The package manager applied the plan
    Upgraded(UpgradePlan),
}

/// Read-only half of the workflow: everything up to the plan
pub struct UpgradeCheck {
    layout: HostLayout,
    pattern: PluginPattern,
    host_version: Option<String>,
    read_limit: usize,
    suggestions: Arc<dyn SuggestionService>,
}

impl UpgradeCheck {
    pub fn new(
        layout: HostLayout,
        pattern: PluginPattern,
        read_limit: usize,
        suggestions: Arc<dyn SuggestionService>,
    ) -> Self {
        Self {
            layout,
            pattern,
            host_version: None,
            read_limit,
            suggestions,
        }
    }

    /// Use this host version instead of the bundled manifest's
    pub fn with_host_version(mut self, host_version: impl Into<String>) -> Self {
        self.host_version = Some(host_version.into());
        self
    }

    /// Installed versions of every candidate plugin
    pub async fn installed(&self) -> Result<HashMap<String, String>, InventoryError> {
        let inventory = resolve_candidates(&self.layout, &self.pattern).await?;
        load_versions(
            &self.layout.modules_dir(),
            &inventory.candidates,
            self.read_limit,
        )
        .await
    }

    /// Build the upgrade plan without prompting or installing
    ///
    /// An empty candidate set returns an empty plan without querying the service.
    pub async fn plan(&self) -> Result<UpgradePlan, CheckError> {
        let inventory = resolve_candidates(&self.layout, &self.pattern).await?;
        if inventory.candidates.is_empty() {
            debug!("No extraneous plugins installed");
            return Ok(UpgradePlan::default());
        }

        let installed = load_versions(
            &self.layout.modules_dir(),
            &inventory.candidates,
            self.read_limit,
        )
        .await?;

        let host_version = match (&self.host_version, inventory.bundled_version) {
            (Some(version), _) => version.clone(),
            (None, Some(version)) => version,
            (None, None) => {
                return Err(InventoryError::MissingHostVersion {
                    path: self.layout.bundled_manifest.clone(),
                }
                .into());
            }
        };

        let suggestions = self
            .suggestions
            .suggest(&host_version, &inventory.candidates)
            .await?;

        let plan = build_plan(&installed, suggestions);
        info!(
            "{} of {} plugins can be upgraded",
            plan.len(),
            inventory.candidates.len()
        );
        Ok(plan)
    }
}

/// Full workflow: plan, confirm, then hand the plan to the installer
pub struct UpgradeWorkflow {
    check: UpgradeCheck,
    confirmer: Arc<dyn Confirmer>,
    installer: Arc<dyn Installer>,
}

impl UpgradeWorkflow {
    pub fn new(
        check: UpgradeCheck,
        confirmer: Arc<dyn Confirmer>,
        installer: Arc<dyn Installer>,
    ) -> Self {
        Self {
            check,
            confirmer,
            installer,
        }
    }

    pub async fn run(&self) -> Result<Outcome, CheckError> {
        let plan = self.check.plan().await?;
        if plan.is_empty() {
            return Ok(Outcome::UpToDate);
        }

        if !self.confirmer.confirm(&plan).await? {
            info!("Upgrade of {} plugins declined", plan.len());
            return Ok(Outcome::Skipped(plan));
        }

        self.installer.install(&plan.install_specs()).await?;
        info!("Upgraded {} plugins", plan.len());
        Ok(Outcome::Upgraded(plan))
    }
}
