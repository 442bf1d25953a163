/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid watch.poll_interval_ms: {configured} (min: {min_limit}, max: {max_limit})")]
    PollInterval {
        configured: u64,
        min_limit: u64,
        max_limit: u64,
    },
    #[error("Invalid watch.ignore entry: {entry:?}")]
    IgnoreEntry { entry: String },
    #[error("Invalid logging.level: {configured}")]
    LogLevel { configured: String },
    #[error("No location for the user settings file")]
    UserSettingsLocation,
}

impl ConfigValidationError {
    pub fn user_message(&self) -> String {
        match self {
            ConfigValidationError::PollInterval {
                configured,
                min_limit,
                max_limit,
            } => {
                format!(
                    "Watch poll interval out of range!\n\n\
                    Your configured value: {configured} ms\n\
                    Valid range: {min_limit} - {max_limit} ms\n\n\
                    Please update poll_interval_ms under [watch] in initdeco.toml."
                )
            }
            ConfigValidationError::IgnoreEntry { entry } => {
                format!(
                    "Ignored directory name is not usable!\n\n\
                    Your configured entry: {entry:?}\n\n\
                    Entries are plain directory names such as \".venv\"; they may not be \
                    blank or contain path separators."
                )
            }
            ConfigValidationError::LogLevel { configured } => {
                format!(
                    "Unknown log level!\n\n\
                    Your configured value: {configured}\n\
                    Valid values: trace, debug, info, warn, error\n\n\
                    Please update level under [logging] in initdeco.toml."
                )
            }
            ConfigValidationError::UserSettingsLocation => "No user configuration directory \
                could be found on this system.\n\n\
                Please set user_file under [settings] in initdeco.toml."
                .to_string(),
        }
    }
}
