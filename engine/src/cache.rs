use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Result of a cache lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheLookup {
    Hit(bool),
    Miss,
}

/// Marks the cache state an inspection started from.
///
/// Every invalidation bumps the generation; a result computed before an
/// invalidation is discarded by [`EmptinessCache::set_if_current`] instead of
/// re-populating the cache with stale data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation(u64);

#[derive(Default)]
struct CacheState {
    entries: HashMap<PathBuf, bool>,
    generation: u64,
}

/// Last known emptiness per file.
///
/// No capacity bound and no expiry: entries live until they are invalidated
/// individually or the whole cache is cleared.
#[derive(Clone, Default)]
pub struct EmptinessCache {
    state: Arc<RwLock<CacheState>>,
}

impl EmptinessCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, path: &Path) -> CacheLookup {
        let state = self.state.read().await;
        match state.entries.get(path) {
            Some(&is_empty) => CacheLookup::Hit(is_empty),
            None => CacheLookup::Miss,
        }
    }

    pub async fn set(&self, path: PathBuf, is_empty: bool) {
        let mut state = self.state.write().await;
        state.entries.insert(path, is_empty);
    }

    /// Current generation, taken before starting an inspection
    pub async fn generation(&self) -> Generation {
        Generation(self.state.read().await.generation)
    }

    /// Store `is_empty` only if nothing was invalidated since `generation`.
    /// Returns whether the entry was stored.
    pub async fn set_if_current(
        &self,
        path: PathBuf,
        is_empty: bool,
        generation: Generation,
    ) -> bool {
        let mut state = self.state.write().await;
        if state.generation != generation.0 {
            return false;
        }
        state.entries.insert(path, is_empty);
        true
    }

    /// Drop the entry for `path` without bumping the generation.
    ///
    /// Used after a failed inspection, where no cached result may survive but
    /// concurrent inspections of other files are still valid.
    pub async fn forget(&self, path: &Path) {
        let mut state = self.state.write().await;
        state.entries.remove(path);
    }

    pub async fn invalidate(&self, path: &Path) {
        let mut state = self.state.write().await;
        state.entries.remove(path);
        state.generation += 1;
    }

    pub async fn invalidate_all(&self) {
        let mut state = self.state.write().await;
        state.entries.clear();
        state.generation += 1;
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.entries.is_empty()
    }
}
