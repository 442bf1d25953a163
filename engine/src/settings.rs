use crate::color::ColorVariant;
use crate::error::StoreError;
use async_trait::async_trait;
use tokio::sync::broadcast;

/// Notification that one or more configuration keys changed.
///
/// Keys are dotted paths (`initdeco.emptyColor`,
/// `workbench.colorCustomizations`). [`affects`](Self::affects) matches a key
/// or any of its parents, the way editor hosts report configuration changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationChange {
    keys: Vec<String>,
}

impl ConfigurationChange {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// True when `section` is one of the changed keys or a parent of one.
    pub fn affects(&self, section: &str) -> bool {
        self.keys.iter().any(|key| {
            key == section
                || (key.starts_with(section) && key[section.len()..].starts_with('.'))
                || (section.starts_with(key.as_str()) && section[key.len()..].starts_with('.'))
        })
    }
}

/// Host configuration surface read by the engine.
///
/// Implementations return the effective value of a setting after merging
/// scopes, and broadcast a [`ConfigurationChange`] whenever any key changes,
/// including changes caused by the engine's own customization writes.
#[async_trait]
pub trait SettingsSource: Send + Sync {
    /// Effective string value of `key`, or `None` when unset.
    async fn get_string(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Subscribe to configuration change notifications.
    fn subscribe(&self) -> broadcast::Receiver<ConfigurationChange>;
}

/// Raw user settings for both decoration variants.
///
/// Values are kept exactly as configured; unset colors read as blank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorSettings {
    pub empty_color: String,
    pub non_empty_color: String,
    pub empty_badge: Option<String>,
    pub non_empty_badge: Option<String>,
}

impl ColorSettings {
    /// Read all settings owned by the engine from `source`.
    pub async fn load(source: &dyn SettingsSource) -> Result<Self, StoreError> {
        Ok(Self {
            empty_color: source
                .get_string(ColorVariant::Empty.color_setting())
                .await?
                .unwrap_or_default(),
            non_empty_color: source
                .get_string(ColorVariant::NonEmpty.color_setting())
                .await?
                .unwrap_or_default(),
            empty_badge: source.get_string(ColorVariant::Empty.badge_setting()).await?,
            non_empty_badge: source
                .get_string(ColorVariant::NonEmpty.badge_setting())
                .await?,
        })
    }

    pub fn color(&self, variant: ColorVariant) -> &str {
        match variant {
            ColorVariant::Empty => &self.empty_color,
            ColorVariant::NonEmpty => &self.non_empty_color,
        }
    }

    pub fn badge(&self, variant: ColorVariant) -> Option<&str> {
        match variant {
            ColorVariant::Empty => self.empty_badge.as_deref(),
            ColorVariant::NonEmpty => self.non_empty_badge.as_deref(),
        }
    }
}
