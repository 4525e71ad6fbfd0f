//! Layered configuration loading: optional TOML file, then environment.

use config::{Config, Environment, File};
use std::path::PathBuf;
use tracing::debug;

use crate::ConfigError;
use crate::settings::AppConfig;

/// File read when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "reconcile.toml";

/// Prefix for environment overrides, e.g. `RECONCILE__EVENTS__SINK=broadcast`.
pub const ENV_PREFIX: &str = "RECONCILE";

pub fn load_config(path: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();
    let file = path
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    if file.exists() {
        debug!(path = %file.display(), "Loading configuration file");
        builder = builder.add_source(File::from(file));
    } else if path.is_some() {
        return Err(ConfigError::MissingFile(file));
    }
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .try_parsing(true)
            .separator("__"),
    );
    let merged: AppConfig = builder.build()?.try_deserialize()?;
    merged.validate()?;
    Ok(merged)
}
