//! Building the upgrade plan from suggestions

use std::collections::{HashMap, HashSet};
use std::fmt;

use tracing::{debug, info, warn};

use crate::upgrade::semver::{CompareResult, compare_versions};
use crate::upgrade::suggestion::{SuggestionCode, SuggestionRecord};

/// A plugin with a strictly newer suggested version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpgradeCandidate {
    pub name: String,
    pub current: String,
    pub suggested: String,
}

impl UpgradeCandidate {
    /// `name@version` argument for the package manager
    pub fn install_spec(&self) -> String {
        format!("{}@{}", self.name, self.suggested)
    }
}

impl fmt::Display for UpgradeCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} -> {}", self.name, self.current, self.suggested)
    }
}

/// Ordered list of upgrades, in the order the service returned them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpgradePlan(Vec<UpgradeCandidate>);

impl UpgradePlan {
    pub fn new(entries: Vec<UpgradeCandidate>) -> Self {
        Self(entries)
    }

    pub fn entries(&self) -> &[UpgradeCandidate] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn install_specs(&self) -> Vec<String> {
        self.0.iter().map(UpgradeCandidate::install_spec).collect()
    }
}

/// Keep only match-found suggestions that are strictly newer than what is installed
///
/// Only the first suggestion per package is considered.
pub fn build_plan(
    installed: &HashMap<String, String>,
    suggestions: Vec<SuggestionRecord>,
) -> UpgradePlan {
    let mut seen = HashSet::new();
    let mut entries = Vec::new();

    for record in suggestions {
        if !seen.insert(record.package.clone()) {
            warn!("Ignoring duplicate suggestion for {}", record.package);
            continue;
        }

        if let SuggestionCode::Other(code) = &record.code {
            info!("No upgrade for {}: service answered {}", record.package, code);
            continue;
        }

        let Some(suggested) = record.version else {
            warn!("Ignoring match for {}: no version given", record.package);
            continue;
        };

        let Some(current) = installed.get(&record.package) else {
            warn!("Ignoring suggestion for unknown package {}", record.package);
            continue;
        };

        match compare_versions(current, &suggested) {
            CompareResult::Outdated => entries.push(UpgradeCandidate {
                current: current.clone(),
                name: record.package,
                suggested,
            }),
            CompareResult::Invalid => {
                warn!(
                    "Ignoring {}: cannot compare {} with {}",
                    record.package, current, suggested
                );
            }
            CompareResult::Latest | CompareResult::Newer => {
                debug!(
                    "{} {} is not older than suggested {}",
                    record.package, current, suggested
                );
            }
        }
    }

    UpgradePlan::new(entries)
}
