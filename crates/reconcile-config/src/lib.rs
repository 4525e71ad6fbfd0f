//! Configuration and process setup for reconcile-based controllers.
//!
//! Settings come from an optional `reconcile.toml` overlaid with
//! `RECONCILE__*` environment variables. The loaded [`AppConfig`] drives
//! tracing initialization and picks the event recorder sink.

use std::path::PathBuf;

pub mod loader;
pub mod observability;
mod recorder;
pub mod settings;

pub use loader::load_config;
pub use observability::{apply_logging_level, init_tracing};
pub use recorder::{build_recorder, RecorderHandle};
pub use settings::{AppConfig, EventSink, EventsConfig, LogFormat, LoggingConfig};

/// Error types for configuration operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("Parse error: {0}")]
    Parse(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl ConfigError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
