use super::{LoggingConfig, validation::ConfigValidationError};
use engine::watch::poller::DEFAULT_IGNORED_DIRS;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;
pub const MIN_POLL_INTERVAL_MS: u64 = 50;
pub const MAX_POLL_INTERVAL_MS: u64 = 60_000;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Main application configuration
#[derive(Debug, Deserialize, Default, Clone)]
pub struct AppConfig {
    #[serde(default)]
    logging: LoggingConfig,
    #[serde(default)]
    watch: WatchConfig,
    #[serde(default)]
    settings: SettingsConfig,
}

impl AppConfig {
    /// Validate the configuration against defined limits
    pub fn validate(&self) -> Result<(), Vec<ConfigValidationError>> {
        let mut errors = Vec::new();

        let interval = self.watch.poll_interval_ms();
        if !(MIN_POLL_INTERVAL_MS..=MAX_POLL_INTERVAL_MS).contains(&interval) {
            errors.push(ConfigValidationError::PollInterval {
                configured: interval,
                min_limit: MIN_POLL_INTERVAL_MS,
                max_limit: MAX_POLL_INTERVAL_MS,
            });
        }

        for entry in self.watch.ignore() {
            if entry.trim().is_empty() || entry.contains(['/', '\\']) {
                errors.push(ConfigValidationError::IgnoreEntry { entry });
            }
        }

        let level = self.logging.level().to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            errors.push(ConfigValidationError::LogLevel {
                configured: self.logging.level().to_string(),
            });
        }

        if self.settings.user_file().is_none() {
            errors.push(ConfigValidationError::UserSettingsLocation);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn logging(&self) -> &LoggingConfig {
        &self.logging
    }

    pub fn watch(&self) -> &WatchConfig {
        &self.watch
    }

    pub fn settings(&self) -> &SettingsConfig {
        &self.settings
    }
}

/// `[watch]` section
#[derive(Debug, Deserialize, Default, Clone)]
pub struct WatchConfig {
    enabled: Option<bool>,
    poll_interval_ms: Option<u64>,
    ignore: Option<Vec<String>>,
}

impl WatchConfig {
    pub fn enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    pub fn poll_interval_ms(&self) -> u64 {
        self.poll_interval_ms.unwrap_or(DEFAULT_POLL_INTERVAL_MS)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms())
    }

    /// Directory names skipped while scanning
    pub fn ignore(&self) -> Vec<String> {
        match &self.ignore {
            Some(dirs) => dirs.clone(),
            None => DEFAULT_IGNORED_DIRS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// `[settings]` section
#[derive(Debug, Deserialize, Default, Clone)]
pub struct SettingsConfig {
    user_file: Option<PathBuf>,
}

impl SettingsConfig {
    /// Configured user settings file, or `settings.json` under the platform
    /// config directory
    pub fn user_file(&self) -> Option<PathBuf> {
        self.user_file
            .clone()
            .or_else(|| dirs::config_dir().map(|dir| dir.join("initdeco").join("settings.json")))
    }
}
