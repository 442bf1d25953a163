use super::store::{ConfigTarget, CustomizationSection, CustomizationStore};
use crate::constants::COLOR_CUSTOMIZATIONS_SECTION;
use crate::error::StoreError;
use crate::settings::{ConfigurationChange, SettingsSource};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use tokio::sync::broadcast;

const CHANGE_CHANNEL_CAPACITY: usize = 64;

#[derive(Default)]
struct MemoryState {
    settings: HashMap<String, String>,
    sections: HashMap<ConfigTarget, CustomizationSection>,
    read_only: Option<ConfigTarget>,
}

/// In-memory host configuration.
///
/// Implements both [`SettingsSource`] and [`CustomizationStore`]. Every
/// customization write broadcasts a change notification, even when the
/// written section equals the stored one, so it behaves like the least
/// forgiving host.
pub struct MemoryConfiguration {
    state: Mutex<MemoryState>,
    workspace_open: AtomicBool,
    writes: AtomicUsize,
    changes: broadcast::Sender<ConfigurationChange>,
}

impl MemoryConfiguration {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            state: Mutex::new(MemoryState::default()),
            workspace_open: AtomicBool::new(false),
            writes: AtomicUsize::new(0),
            changes,
        }
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn notify(&self, key: &str) {
        // No subscribers is fine
        let _ = self.changes.send(ConfigurationChange::new([key]));
    }

    /// Set a user setting and notify subscribers
    pub fn set_setting(&self, key: &str, value: &str) {
        self.state()
            .settings
            .insert(key.to_string(), value.to_string());
        self.notify(key);
    }

    pub fn remove_setting(&self, key: &str) {
        self.state().settings.remove(key);
        self.notify(key);
    }

    pub fn set_workspace_open(&self, open: bool) {
        self.workspace_open.store(open, Ordering::SeqCst);
    }

    /// Make one scope reject writes, or `None` to accept all writes again
    pub fn set_read_only(&self, target: Option<ConfigTarget>) {
        self.state().read_only = target;
    }

    /// Install a section without counting a write or notifying.
    ///
    /// Non-object values clear the section.
    pub fn seed_customizations(&self, target: ConfigTarget, section: Value) {
        let mut state = self.state();
        match section {
            Value::Object(map) => {
                state.sections.insert(target, map);
            }
            _ => {
                state.sections.remove(&target);
            }
        }
    }

    /// Snapshot of the section stored in `target`
    pub fn customizations(&self, target: ConfigTarget) -> Option<CustomizationSection> {
        self.state().sections.get(&target).cloned()
    }

    /// Number of customization writes accepted so far
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl Default for MemoryConfiguration {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SettingsSource for MemoryConfiguration {
    async fn get_string(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.state().settings.get(key).cloned())
    }

    fn subscribe(&self) -> broadcast::Receiver<ConfigurationChange> {
        self.changes.subscribe()
    }
}

#[async_trait]
impl CustomizationStore for MemoryConfiguration {
    fn has_workspace(&self) -> bool {
        self.workspace_open.load(Ordering::SeqCst)
    }

    async fn read_customizations(
        &self,
        target: ConfigTarget,
    ) -> Result<Option<CustomizationSection>, StoreError> {
        Ok(self.customizations(target))
    }

    async fn write_customizations(
        &self,
        target: ConfigTarget,
        section: Option<CustomizationSection>,
    ) -> Result<(), StoreError> {
        {
            let mut state = self.state();
            if state.read_only == Some(target) {
                return Err(StoreError::ReadOnly { target });
            }

            match section {
                Some(section) => {
                    state.sections.insert(target, section);
                }
                None => {
                    state.sections.remove(&target);
                }
            }
        }

        self.writes.fetch_add(1, Ordering::SeqCst);
        self.notify(COLOR_CUSTOMIZATIONS_SECTION);
        Ok(())
    }
}
