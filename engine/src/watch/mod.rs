//! File-change notifications for the decorated filename.
//!
//! Hosts that have a native watcher implement [`FileWatcher`] on top of it.
//! [`PollingWatcher`] is a portable implementation that periodically scans a
//! directory tree.

pub mod poller;

pub use poller::{PollingWatcher, find_files};

use crate::error::WatchError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchEventKind {
    Created,
    Changed,
    Deleted,
}

/// A change to one watched file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEvent {
    pub kind: WatchEventKind,
    pub path: PathBuf,
}

impl WatchEvent {
    pub fn new(kind: WatchEventKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }
}

/// Live stream of watch events.
///
/// Dropping the subscription stops the underlying watcher.
pub struct WatchSubscription {
    events: mpsc::Receiver<WatchEvent>,
    cancel: CancellationToken,
}

impl WatchSubscription {
    pub fn new(events: mpsc::Receiver<WatchEvent>, cancel: CancellationToken) -> Self {
        Self { events, cancel }
    }

    /// Next event, or `None` once the watcher has stopped.
    pub async fn next_event(&mut self) -> Option<WatchEvent> {
        self.events.recv().await
    }

    /// Token that stops the watcher when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

impl Drop for WatchSubscription {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Source of change notifications scoped to one filename.
#[async_trait]
pub trait FileWatcher: Send + Sync {
    /// Start watching every file named `file_name` below `root`.
    ///
    /// # Errors
    ///
    /// Returns a [`WatchError`] when the environment cannot watch files or
    /// `root` is not a directory. Callers are expected to carry on without
    /// live invalidation.
    async fn watch(&self, root: &Path, file_name: &str)
        -> Result<WatchSubscription, WatchError>;
}
