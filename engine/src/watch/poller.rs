use super::{FileWatcher, WatchEvent, WatchEventKind, WatchSubscription};
use crate::error::WatchError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tokio::sync::mpsc;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Directory names never descended into
pub const DEFAULT_IGNORED_DIRS: &[&str] = &[
    ".git",
    "node_modules",
    "__pycache__",
    ".venv",
    "venv",
    "target",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileStamp {
    len: u64,
    modified: Option<SystemTime>,
}

type Snapshot = HashMap<PathBuf, FileStamp>;

/// Watches a directory tree by rescanning it on a fixed interval.
///
/// Works anywhere a tokio runtime is available, at the cost of latency equal
/// to the interval. Scans run on the blocking pool.
#[derive(Debug, Clone)]
pub struct PollingWatcher {
    interval: Duration,
    ignored_dirs: Vec<String>,
}

impl PollingWatcher {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            ignored_dirs: DEFAULT_IGNORED_DIRS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Replace the list of directory names skipped while scanning
    pub fn with_ignored_dirs<I, S>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored_dirs = dirs.into_iter().map(Into::into).collect();
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

#[async_trait]
impl FileWatcher for PollingWatcher {
    async fn watch(
        &self,
        root: &Path,
        file_name: &str,
    ) -> Result<WatchSubscription, WatchError> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| WatchError::Unsupported(e.to_string()))?;

        if !root.is_dir() {
            return Err(WatchError::RootMissing {
                path: root.to_path_buf(),
            });
        }

        let scanner = Scanner {
            root: root.to_path_buf(),
            file_name: file_name.to_string(),
            ignored_dirs: self.ignored_dirs.clone(),
        };
        // Baseline before returning, so changes made after `watch` resolves
        // are reported
        let initial = {
            let scanner = scanner.clone();
            runtime
                .spawn_blocking(move || scanner.scan())
                .await
                .map_err(io::Error::other)??
        };

        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let period = self.interval;

        log::info!(
            "Polling {} for {file_name} changes every {period:?}",
            root.display()
        );

        runtime.spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.tick().await; // Skip the first immediate tick

            let mut previous = initial;
            loop {
                tokio::select! {
                    () = token.cancelled() => break,
                    _ = ticker.tick() => {}
                }

                let scanner = scanner.clone();
                let current = match tokio::task::spawn_blocking(move || scanner.scan()).await {
                    Ok(Ok(snapshot)) => snapshot,
                    Ok(Err(e)) => {
                        log::debug!("Watch scan failed: {e}");
                        continue;
                    }
                    Err(e) => {
                        log::error!("Watch scan task failed: {e}");
                        break;
                    }
                };

                for event in diff(&previous, &current) {
                    if tx.send(event).await.is_err() {
                        return;
                    }
                }
                previous = current;
            }
            log::debug!("Polling watcher stopped");
        });

        Ok(WatchSubscription::new(rx, cancel))
    }
}

/// Every file named `file_name` below `root`, sorted by path.
///
/// Uses the same walk as [`PollingWatcher`], so a listing and the watch that
/// follows it agree on which files exist.
pub fn find_files(
    root: &Path,
    file_name: &str,
    ignored_dirs: &[String],
) -> io::Result<Vec<PathBuf>> {
    let scanner = Scanner {
        root: root.to_path_buf(),
        file_name: file_name.to_string(),
        ignored_dirs: ignored_dirs.to_vec(),
    };
    let mut paths: Vec<PathBuf> = scanner.scan()?.into_keys().collect();
    paths.sort();
    Ok(paths)
}

#[derive(Debug, Clone)]
struct Scanner {
    root: PathBuf,
    file_name: String,
    ignored_dirs: Vec<String>,
}

impl Scanner {
    /// Walk the tree. Unreadable subdirectories are skipped; only an
    /// unreadable root is an error.
    fn scan(&self) -> io::Result<Snapshot> {
        let mut snapshot = Snapshot::new();
        let mut pending = vec![self.root.clone()];
        let mut is_root = true;

        while let Some(dir) = pending.pop() {
            let entries = match fs::read_dir(&dir) {
                Ok(entries) => entries,
                Err(e) if is_root => return Err(e),
                Err(_) => continue,
            };
            is_root = false;

            for entry in entries.flatten() {
                let Ok(file_type) = entry.file_type() else {
                    continue;
                };
                let name = entry.file_name();

                if file_type.is_dir() {
                    let skip = name
                        .to_str()
                        .is_some_and(|n| self.ignored_dirs.iter().any(|d| d == n));
                    if !skip {
                        pending.push(entry.path());
                    }
                } else if file_type.is_file() && name == self.file_name.as_str() {
                    if let Ok(metadata) = entry.metadata() {
                        snapshot.insert(
                            entry.path(),
                            FileStamp {
                                len: metadata.len(),
                                modified: metadata.modified().ok(),
                            },
                        );
                    }
                }
            }
        }

        Ok(snapshot)
    }
}

/// Events turning `previous` into `current`, ordered by path
fn diff(previous: &Snapshot, current: &Snapshot) -> Vec<WatchEvent> {
    let mut events: Vec<WatchEvent> = current
        .iter()
        .filter_map(|(path, stamp)| match previous.get(path) {
            None => Some(WatchEvent::new(WatchEventKind::Created, path.clone())),
            Some(old) if old != stamp => {
                Some(WatchEvent::new(WatchEventKind::Changed, path.clone()))
            }
            Some(_) => None,
        })
        .chain(
            previous
                .keys()
                .filter(|path| !current.contains_key(*path))
                .map(|path| WatchEvent::new(WatchEventKind::Deleted, path.clone())),
        )
        .collect();

    events.sort_by(|a, b| a.path.cmp(&b.path));
    events
}
