//! Local inventory of installed plugins
//!
//! # Modules
//!
//! - [`manifest`]: live and bundled manifests, installed module directories
//! - [`resolver`]: which installed packages are extraneous plugins
//! - [`loader`]: bounded-concurrency loading of installed versions

pub mod loader;
pub mod manifest;
pub mod resolver;
