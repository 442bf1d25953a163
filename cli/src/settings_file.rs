//! JSON settings files backing both engine configuration seams.
//!
//! Files use the editor layout: flat dotted keys for plain settings and a
//! nested `workbench.colorCustomizations` object for token colors.
//!
//! ```json
//! {
//!   "initdeco.emptyColor": "#6E7681",
//!   "workbench.colorCustomizations": { "initdeco.emptyInitFile": "#6E7681" }
//! }
//! ```
//!
//! The user file applies everywhere; `<workspace>/.initdeco/settings.json`
//! overrides it while a workspace is open.

use async_trait::async_trait;
use engine::constants::{COLOR_CUSTOMIZATIONS_SECTION, SETTINGS_SECTION};
use engine::customization::{ConfigTarget, CustomizationSection, CustomizationStore};
use engine::settings::{ConfigurationChange, SettingsSource};
use engine::StoreError;
use serde_json::{Map, Value};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::sync::{Mutex, broadcast};

pub const WORKSPACE_SETTINGS_DIR: &str = ".initdeco";
pub const SETTINGS_FILE_NAME: &str = "settings.json";

const CHANGE_CHANNEL_CAPACITY: usize = 64;

type SettingsMap = Map<String, Value>;

/// Modification times of both settings files, compared to spot edits made
/// outside this process
pub type SettingsFingerprint = (Option<SystemTime>, Option<SystemTime>);

pub struct JsonSettingsStore {
    user_file: PathBuf,
    workspace_file: Option<PathBuf>,
    changes: broadcast::Sender<ConfigurationChange>,
    // Read-modify-write cycles on either file run one at a time
    write_lock: Mutex<()>,
}

impl JsonSettingsStore {
    pub fn new(user_file: impl Into<PathBuf>, workspace_root: Option<&Path>) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            user_file: user_file.into(),
            workspace_file: workspace_root.map(Self::workspace_settings_path),
            changes,
            write_lock: Mutex::new(()),
        }
    }

    pub fn workspace_settings_path(root: &Path) -> PathBuf {
        root.join(WORKSPACE_SETTINGS_DIR).join(SETTINGS_FILE_NAME)
    }

    pub fn user_file(&self) -> &Path {
        &self.user_file
    }

    pub fn workspace_file(&self) -> Option<&Path> {
        self.workspace_file.as_deref()
    }

    /// File backing `target`. The workspace scope only exists with a workspace.
    pub fn file_for(&self, target: ConfigTarget) -> Result<&Path, StoreError> {
        match target {
            ConfigTarget::Global => Ok(&self.user_file),
            ConfigTarget::Workspace => self
                .workspace_file
                .as_deref()
                .ok_or(StoreError::ReadOnly { target }),
        }
    }

    /// Set or, with `None`, remove a plain setting in one scope and notify
    /// subscribers.
    pub async fn set_setting(
        &self,
        key: &str,
        value: Option<&str>,
        target: ConfigTarget,
    ) -> Result<(), StoreError> {
        let path = self.file_for(target)?;
        {
            let _guard = self.write_lock.lock().await;
            let mut settings = read_file(path).await?;
            let changed = match value {
                Some(value) => {
                    settings.insert(key.to_string(), Value::String(value.to_string()))
                        != Some(Value::String(value.to_string()))
                }
                None => settings.remove(key).is_some(),
            };
            if !changed {
                return Ok(());
            }
            write_file(path, &settings).await?;
        }

        log::info!("Updated {key} in {target} settings");
        self.notify([key]);
        Ok(())
    }

    /// Raw value of `key` in a single scope, without merging
    pub async fn setting_in(
        &self,
        key: &str,
        target: ConfigTarget,
    ) -> Result<Option<String>, StoreError> {
        let Ok(path) = self.file_for(target) else {
            return Ok(None);
        };
        let settings = read_file(path).await?;
        Ok(settings.get(key).and_then(Value::as_str).map(str::to_string))
    }

    /// Token colors as a renderer sees them: workspace entries override user ones
    pub async fn merged_customizations(&self) -> Result<CustomizationSection, StoreError> {
        let mut merged = self
            .read_customizations(ConfigTarget::Global)
            .await?
            .unwrap_or_default();
        if self.workspace_file.is_some() {
            if let Some(workspace) = self.read_customizations(ConfigTarget::Workspace).await? {
                merged.extend(workspace);
            }
        }
        Ok(merged)
    }

    pub async fn fingerprint(&self) -> SettingsFingerprint {
        let user = modified(&self.user_file).await;
        let workspace = match &self.workspace_file {
            Some(path) => modified(path).await,
            None => None,
        };
        (user, workspace)
    }

    /// Tell subscribers the files may have been edited by someone else
    pub fn announce_external_change(&self) {
        self.notify([SETTINGS_SECTION, COLOR_CUSTOMIZATIONS_SECTION]);
    }

    fn notify<I, S>(&self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        // No receivers is fine: nothing is listening yet
        let _ = self.changes.send(ConfigurationChange::new(keys));
    }
}

async fn modified(path: &Path) -> Option<SystemTime> {
    tokio::fs::metadata(path)
        .await
        .ok()
        .and_then(|metadata| metadata.modified().ok())
}

/// Parse a settings file. A missing or blank file is an empty object.
async fn read_file(path: &Path) -> Result<SettingsMap, StoreError> {
    let location = path.display().to_string();
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(SettingsMap::new()),
        Err(e) => {
            return Err(StoreError::Read {
                location,
                reason: e.to_string(),
            });
        }
    };

    if content.trim().is_empty() {
        return Ok(SettingsMap::new());
    }

    match serde_json::from_str::<Value>(&content) {
        Ok(Value::Object(settings)) => Ok(settings),
        Ok(_) => Err(StoreError::Parse {
            location,
            reason: "top-level value is not an object".to_string(),
        }),
        Err(e) => Err(StoreError::Parse {
            location,
            reason: e.to_string(),
        }),
    }
}

async fn write_file(path: &Path, settings: &SettingsMap) -> Result<(), StoreError> {
    let write_error = |reason: String| StoreError::Write {
        location: path.display().to_string(),
        reason,
    };

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| write_error(e.to_string()))?;
    }

    let mut content =
        serde_json::to_string_pretty(settings).map_err(|e| write_error(e.to_string()))?;
    content.push('\n');

    tokio::fs::write(path, content)
        .await
        .map_err(|e| write_error(e.to_string()))
}

fn section_of(
    path: &Path,
    settings: &SettingsMap,
) -> Result<Option<CustomizationSection>, StoreError> {
    match settings.get(COLOR_CUSTOMIZATIONS_SECTION) {
        None => Ok(None),
        Some(Value::Object(section)) => Ok(Some(section.clone())),
        Some(_) => Err(StoreError::Parse {
            location: path.display().to_string(),
            reason: format!("{COLOR_CUSTOMIZATIONS_SECTION} is not an object"),
        }),
    }
}

#[async_trait]
impl SettingsSource for JsonSettingsStore {
    async fn get_string(&self, key: &str) -> Result<Option<String>, StoreError> {
        if let Some(path) = &self.workspace_file {
            if let Some(value) = read_file(path).await?.get(key) {
                return Ok(value.as_str().map(str::to_string));
            }
        }
        let user = read_file(&self.user_file).await?;
        Ok(user.get(key).and_then(Value::as_str).map(str::to_string))
    }

    fn subscribe(&self) -> broadcast::Receiver<ConfigurationChange> {
        self.changes.subscribe()
    }
}

#[async_trait]
impl CustomizationStore for JsonSettingsStore {
    fn has_workspace(&self) -> bool {
        self.workspace_file.is_some()
    }

    async fn read_customizations(
        &self,
        target: ConfigTarget,
    ) -> Result<Option<CustomizationSection>, StoreError> {
        let path = self.file_for(target)?;
        let settings = read_file(path).await?;
        section_of(path, &settings)
    }

    async fn write_customizations(
        &self,
        target: ConfigTarget,
        section: Option<CustomizationSection>,
    ) -> Result<(), StoreError> {
        let path = self.file_for(target)?;
        {
            let _guard = self.write_lock.lock().await;
            let mut settings = read_file(path).await?;
            match section {
                Some(section) => {
                    settings.insert(
                        COLOR_CUSTOMIZATIONS_SECTION.to_string(),
                        Value::Object(section),
                    );
                }
                None => {
                    settings.remove(COLOR_CUSTOMIZATIONS_SECTION);
                }
            }
            write_file(path, &settings).await?;
        }

        self.notify([COLOR_CUSTOMIZATIONS_SECTION]);
        Ok(())
    }
}
