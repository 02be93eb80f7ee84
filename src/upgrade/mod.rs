//! Upgrade decision and execution layer
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Inventory  │────▶│ Suggestion  │────▶│   Planner   │
//! │ (installed) │     │  (remote)   │     │ (semver cmp)│
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                                                │
//!                                                ▼
//!                     ┌─────────────┐     ┌─────────────┐
//!                     │  Installer  │◀────│   Prompt    │
//!                     │(pkg manager)│     │  (confirm)  │
//!                     └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`suggestion`]: Suggestion service trait and HTTP client
//! - [`semver`]: Version parsing and comparison
//! - [`planner`]: Builds the ordered upgrade plan
//! - [`prompt`]: Yes/no confirmation of a plan
//! - [`installer`]: External package manager invocation
//! - [`workflow`]: Ties the stages together

pub mod installer;
pub mod planner;
pub mod prompt;
pub mod semver;
pub mod suggestion;
pub mod workflow;
