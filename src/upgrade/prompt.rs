//! Interactive confirmation of an upgrade plan

#[cfg(test)]
use mockall::automock;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;

use crate::error::PromptError;
use crate::upgrade::planner::UpgradePlan;

/// Answers that accept the plan; anything else declines it
pub const AFFIRMATIVE_ANSWERS: [&str; 4] = ["y", "Y", "yes", "YES"];

pub fn is_affirmative(answer: &str) -> bool {
    AFFIRMATIVE_ANSWERS.contains(&answer.trim())
}

/// Trait for asking the user whether to apply a plan
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Confirmer: Send + Sync {
    /// Present `plan` and return whether the user accepted it
    async fn confirm(&self, plan: &UpgradePlan) -> Result<bool, PromptError>;
}

/// Confirmer that accepts every plan without asking
pub struct AssumeYes;

#[async_trait::async_trait]
impl Confirmer for AssumeYes {
    async fn confirm(&self, _plan: &UpgradePlan) -> Result<bool, PromptError> {
        Ok(true)
    }
}

/// Line-based prompt over an async reader and writer
pub struct TerminalConfirmer<R, W> {
    io: Mutex<(R, W)>,
}

impl TerminalConfirmer<BufReader<tokio::io::Stdin>, tokio::io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl<R, W> TerminalConfirmer<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            io: Mutex::new((reader, writer)),
        }
    }

    pub fn into_inner(self) -> (R, W) {
        self.io.into_inner()
    }
}

/// Text shown before asking for confirmation
pub fn render_plan(plan: &UpgradePlan) -> String {
    let mut text = format!("{} plugin(s) can be upgraded:\n", plan.len());
    for entry in plan.entries() {
        text.push_str(&format!("  {}\n", entry));
    }
    text
}

#[async_trait::async_trait]
impl<R, W> Confirmer for TerminalConfirmer<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn confirm(&self, plan: &UpgradePlan) -> Result<bool, PromptError> {
        let mut guard = self.io.lock().await;
        let (reader, writer) = &mut *guard;

        writer.write_all(render_plan(plan).as_bytes()).await?;
        writer.write_all(b"Upgrade now? [y/N] ").await?;
        writer.flush().await?;

        let mut answer = String::new();
        if reader.read_line(&mut answer).await? == 0 {
            return Err(PromptError::Closed);
        }

        Ok(is_affirmative(&answer))
    }
}
