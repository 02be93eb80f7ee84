pub mod config;
pub mod error;
pub mod inventory;
pub mod logging;
pub mod upgrade;
