use std::path::PathBuf;
use thiserror::Error;

use crate::customization::ConfigTarget;

/// Errors raised by the host configuration and customization stores.
///
/// Reads and writes go through host-owned storage (a settings file, an
/// editor's configuration service, an in-memory map). Every failure carries
/// the scope or location involved so the caller can report something useful.
///
/// # Examples
///
/// ```no_run
/// use engine::error::StoreError;
///
/// fn describe(error: &StoreError) -> &'static str {
///     match error {
///         StoreError::ReadOnly { .. } => "scope cannot be written",
///         StoreError::Parse { .. } => "settings file is malformed",
///         _ => "storage unavailable",
///     }
/// }
/// ```
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing storage could not be read.
    #[error("Failed to read configuration from {location}: {reason}")]
    Read { location: String, reason: String },

    /// The backing storage was read but its content is not valid.
    #[error("Failed to parse configuration from {location}: {reason}")]
    Parse { location: String, reason: String },

    /// The host rejected or failed a write.
    #[error("Failed to write configuration to {location}: {reason}")]
    Write { location: String, reason: String },

    /// The selected configuration scope does not accept writes.
    #[error("Configuration target {target} is read-only")]
    ReadOnly { target: ConfigTarget },
}

/// Errors raised while setting up a file watch.
///
/// Watch failures are never fatal: the bootstrap layer logs them and keeps
/// serving decorations on demand without live invalidation.
#[derive(Debug, Error)]
pub enum WatchError {
    /// The execution context cannot host a watcher.
    #[error("File watching is not supported here: {0}")]
    Unsupported(String),

    /// The directory to watch does not exist or is not a directory.
    #[error("Watch root does not exist or is not a directory: {}", path.display())]
    RootMissing { path: PathBuf },

    #[error("Watch I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Top-level error for engine operations that reach the host.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Watch(#[from] WatchError),
}

pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_messages_name_the_location() {
        let error = StoreError::Write {
            location: "/tmp/settings.json".to_string(),
            reason: "disk full".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to write configuration to /tmp/settings.json: disk full"
        );

        let error = StoreError::ReadOnly {
            target: ConfigTarget::Workspace,
        };
        assert_eq!(error.to_string(), "Configuration target workspace is read-only");
    }

    #[test]
    fn test_engine_error_is_transparent() {
        let error: EngineError = WatchError::Unsupported("no runtime".to_string()).into();
        assert_eq!(error.to_string(), "File watching is not supported here: no runtime");
    }
}
