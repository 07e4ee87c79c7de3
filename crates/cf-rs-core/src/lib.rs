//! # cf-rs-core
//!
//! Error types, settings, and logging setup shared by the cf-rs crates.
//!
//! ## Modules
//!
//! - [`error`] - The [`CfError`] taxonomy and result alias
//! - [`settings`] - Logging and per-database configuration
//! - [`settings_loader`] - Loading settings from TOML, JSON, and the environment
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;

// Re-export the most commonly used types at the crate root.
pub use error::{CfError, CfResult};
pub use settings::{DatabaseSettings, Settings};
