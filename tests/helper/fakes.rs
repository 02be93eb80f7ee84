//! Hand-written confirmer and installer doubles

use std::sync::Mutex;

use async_trait::async_trait;

use plugup::error::{InstallError, PromptError};
use plugup::upgrade::installer::Installer;
use plugup::upgrade::planner::UpgradePlan;
use plugup::upgrade::prompt::Confirmer;

/// Confirmer that answers with a fixed reply and remembers what it was shown
pub struct ScriptedConfirmer {
    answer: bool,
    shown: Mutex<Vec<UpgradePlan>>,
}

impl ScriptedConfirmer {
    pub fn answering(answer: bool) -> Self {
        Self {
            answer,
            shown: Mutex::new(Vec::new()),
        }
    }

    pub fn shown(&self) -> Vec<UpgradePlan> {
        self.shown.lock().unwrap().clone()
    }
}

#[async_trait]
impl Confirmer for ScriptedConfirmer {
    async fn confirm(&self, plan: &UpgradePlan) -> Result<bool, PromptError> {
        self.shown.lock().unwrap().push(plan.clone());
        Ok(self.answer)
    }
}

/// Installer that records every invocation instead of running anything
#[derive(Default)]
pub struct RecordingInstaller {
    calls: Mutex<Vec<Vec<String>>>,
}

impl RecordingInstaller {
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Installer for RecordingInstaller {
    async fn install(&self, specs: &[String]) -> Result<(), InstallError> {
        self.calls.lock().unwrap().push(specs.to_vec());
        Ok(())
    }
}
