use crate::error::{AppError, AppResult};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

pub mod app;
pub mod validation;

pub use app::{AppConfig, SettingsConfig, WatchConfig};
pub use validation::ConfigValidationError;

/// Base name of the optional configuration file in the working directory
pub const DEFAULT_CONFIG_NAME: &str = "initdeco";

/// Prefix of environment overrides, e.g. `INITDECO__WATCH__POLL_INTERVAL_MS`
pub const ENV_PREFIX: &str = "INITDECO";

/// Load and validate the host configuration.
///
/// An explicit `path` must exist. Without one, `initdeco.toml` in the working
/// directory is used when present. Environment entries override file values.
pub fn load_config(path: Option<&Path>) -> AppResult<AppConfig> {
    let file_source = match path {
        Some(path) => File::from(path).required(true),
        None => File::with_name(DEFAULT_CONFIG_NAME).required(false),
    };
    let env_source = Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true);

    let config = Config::builder()
        .add_source(file_source)
        .add_source(env_source)
        .build()
        .map_err(|e| {
            AppError::Config(format!(
                "Configuration loading failed: {e}. Please check initdeco.toml and INITDECO__* environment variables."
            ))
        })?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| AppError::Config(format!("Failed to deserialize config: {e}")))?;

    if let Err(validation_errors) = app_config.validate() {
        let error_messages: Vec<String> =
            validation_errors.iter().map(|e| e.user_message()).collect();
        return Err(AppError::Config(format!(
            "Configuration validation failed:\n{}",
            error_messages.join("\n\n")
        )));
    }

    Ok(app_config)
}

/// Logging configuration
#[derive(Debug, Deserialize, Default, Clone)]
pub struct LoggingConfig {
    level: Option<String>,
    file: Option<String>,
}

impl LoggingConfig {
    pub fn level(&self) -> &str {
        self.level.as_deref().unwrap_or("info")
    }

    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }
}
