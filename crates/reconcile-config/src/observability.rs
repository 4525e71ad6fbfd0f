// Tracing initialization with a reloadable filter.
use std::sync::OnceLock;
use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};

use crate::ConfigError;
use crate::settings::{LogFormat, LoggingConfig};

static LOG_RELOAD_HANDLE: OnceLock<reload::Handle<EnvFilter, tracing_subscriber::Registry>> =
    OnceLock::new();

/// Install the global subscriber. `RUST_LOG`, when set and valid, wins over
/// the configured level. Calling this twice leaves the first subscriber in place.
pub fn init_tracing(config: &LoggingConfig) {
    let base_filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|_| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(&config.level));

    let (reload_layer, handle) = reload::Layer::new(base_filter);
    let _ = LOG_RELOAD_HANDLE.set(handle);

    let (json, pretty) = match config.format {
        LogFormat::Json => (Some(fmt::layer().json()), None),
        LogFormat::Pretty => (None, Some(fmt::layer())),
    };

    let _ = tracing_subscriber::registry()
        .with(reload_layer)
        .with(json)
        .with(pretty)
        .try_init();
}

/// Swap the active filter. A no-op before [`init_tracing`] has run.
pub fn apply_logging_level(level: &str) -> Result<(), ConfigError> {
    let filter = EnvFilter::try_new(level)
        .map_err(|e| ConfigError::validation(format!("invalid log level {level:?}: {e}")))?;
    if let Some(handle) = LOG_RELOAD_HANDLE.get() {
        handle
            .modify(|f| *f = filter)
            .map_err(|e| ConfigError::validation(e.to_string()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_level_is_rejected() {
        assert!(apply_logging_level("reconcile=bogus").is_err());
    }

    #[test]
    fn test_level_change_after_init() {
        init_tracing(&LoggingConfig::default());
        init_tracing(&LoggingConfig::default());
        assert!(apply_logging_level("debug").is_ok());
        assert!(apply_logging_level("reconcile_apply=trace,info").is_ok());
    }
}
