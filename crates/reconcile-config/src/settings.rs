use reconcile_core::events::DEFAULT_BUFFER_SIZE;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Where applier events go
    #[serde(default)]
    pub events: EventsConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.logging.validate()?;
        self.events.validate()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// EnvFilter directive, e.g. `info` or `reconcile_apply=debug,info`
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        EnvFilter::try_new(&self.level)
            .map(|_| ())
            .map_err(|e| ConfigError::validation(format!("logging.level is invalid: {e}")))
    }
}

/// Recorder sinks selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EventSink {
    #[default]
    Log,
    Broadcast,
    Memory,
    LogAndBroadcast,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventsConfig {
    /// Component name events are attributed to
    #[serde(default = "default_component")]
    pub component: String,
    #[serde(default)]
    pub sink: EventSink,
    /// Broadcast channel capacity
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
}

fn default_component() -> String {
    "reconcile".into()
}

fn default_buffer_size() -> usize {
    DEFAULT_BUFFER_SIZE
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            component: default_component(),
            sink: EventSink::default(),
            buffer_size: default_buffer_size(),
        }
    }
}

impl EventsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.component.trim().is_empty() {
            return Err(ConfigError::validation("events.component must not be empty"));
        }
        if self.buffer_size == 0 {
            return Err(ConfigError::validation("events.buffer_size must be > 0"));
        }
        Ok(())
    }
}
