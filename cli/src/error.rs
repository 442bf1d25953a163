use std::fmt::Display;

/// Errors surfaced by the `initdeco` terminal host.
///
/// Engine failures are flattened into messages at this boundary: the host
/// only reports them, it never branches on their inner variants.
///
/// # Error Categories
///
/// - [`Config`](AppError::Config) - `initdeco.toml` or environment overrides are unusable
/// - [`Io`](AppError::Io) - walking directories or touching settings files failed
/// - [`Engine`](AppError::Engine) - the engine could not read or persist settings
/// - [`Logger`](AppError::Logger) - the log dispatcher could not be installed
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// Configuration loading and validation errors.
    ///
    /// Raised before anything else runs, so the message is printed as is and
    /// the process exits.
    Config(String),

    /// File system failures outside the engine.
    Io(String),

    /// Settings store or watcher failures reported by the engine.
    Engine(String),

    /// The global logger was already set or its output could not be opened.
    Logger(String),
}

impl Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Config(msg) => write!(f, "Configuration Error: {msg}"),
            AppError::Io(msg) => write!(f, "I/O Error: {msg}"),
            AppError::Engine(msg) => write!(f, "Engine Error: {msg}"),
            AppError::Logger(msg) => write!(f, "Logger Error: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<engine::EngineError> for AppError {
    fn from(err: engine::EngineError) -> Self {
        AppError::Engine(err.to_string())
    }
}

impl From<engine::StoreError> for AppError {
    fn from(err: engine::StoreError) -> Self {
        AppError::Engine(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<log::SetLoggerError> for AppError {
    fn from(err: log::SetLoggerError) -> Self {
        AppError::Logger(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
