use crate::color::{BadgeValidator, ColorResolver, ColorValidationError, ColorVariant};
use crate::constants::{SETTINGS_SECTION, TARGET_FILE_NAME};
use crate::customization::CustomizationStore;
use crate::error::{EngineError, EngineResult};
use crate::inspector::FileInspector;
use crate::provider::DecorationProvider;
use crate::settings::{ColorSettings, ConfigurationChange, SettingsSource};
use crate::validation::Validator;
use crate::watch::{FileWatcher, WatchSubscription};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Collaborators supplied by the host at activation
#[derive(Clone)]
pub struct HostServices {
    pub settings: Arc<dyn SettingsSource>,
    pub customizations: Arc<dyn CustomizationStore>,
    pub inspector: Arc<dyn FileInspector>,
    /// `None` when the host cannot watch files
    pub watcher: Option<Arc<dyn FileWatcher>>,
    /// Root of the open workspace, if any
    pub workspace_root: Option<PathBuf>,
}

/// Re-resolves colors when the engine's settings change.
struct ChangeCoordinator {
    settings: Arc<dyn SettingsSource>,
    resolver: ColorResolver,
    provider: Arc<DecorationProvider>,
    // Held across a whole resolution so passes never interleave
    pass: Mutex<()>,
}

impl ChangeCoordinator {
    /// Resolve both variants and push the result into the provider.
    ///
    /// Every pass re-reads the store, so a dedicated entry removed by someone
    /// else is written back. Passes terminate because the adapter skips
    /// writes that would not change the store. A variant whose literal
    /// cannot be persisted keeps the color it had, and the first store error
    /// is returned after the provider has been updated.
    async fn apply_settings(&self) -> EngineResult<()> {
        let _pass = self.pass.lock().await;
        let settings = ColorSettings::load(self.settings.as_ref()).await?;

        let mut style = self.provider.style().await;
        let mut first_error = None;

        for variant in ColorVariant::ALL {
            let slot = style.variant_mut(variant);
            match self
                .resolver
                .resolve_variant(variant, settings.color(variant))
                .await
            {
                Ok(color) => slot.color = color,
                Err(e) => {
                    log::warn!("Keeping {} for {variant} files: {e}", slot.color);
                    first_error.get_or_insert(e);
                }
            }
            slot.badge = badge_from_setting(variant, settings.badge(variant));
        }

        self.provider.set_colors(style).await;

        match first_error {
            Some(e) => Err(EngineError::Store(e)),
            None => Ok(()),
        }
    }
}

fn badge_from_setting(variant: ColorVariant, raw: Option<&str>) -> Option<String> {
    let raw = raw?;
    match BadgeValidator.validate(raw) {
        Ok(()) => Some(raw.trim().to_string()),
        Err(ColorValidationError::BlankBadge) => None,
        Err(e) => {
            log::warn!("Ignoring {variant} badge: {e}");
            None
        }
    }
}

/// Owns the live decoration provider and its background listeners.
///
/// Create with [`Colorizer::activate`] when the host starts and tear down
/// with [`Colorizer::deactivate`]. Dropping an active colorizer stops its
/// listeners without waiting for them.
pub struct Colorizer {
    provider: Arc<DecorationProvider>,
    coordinator: Arc<ChangeCoordinator>,
    cancel: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
    watching: bool,
}

impl Colorizer {
    /// Resolve colors, start listening for setting changes and, when
    /// possible, start watching the workspace.
    ///
    /// Never fails: store and watch failures are logged and the colorizer
    /// runs with fallback colors or without live invalidation.
    pub async fn activate(host: HostServices) -> Self {
        let provider = Arc::new(DecorationProvider::new(host.inspector.clone()));
        let coordinator = Arc::new(ChangeCoordinator {
            settings: host.settings.clone(),
            resolver: ColorResolver::new(host.customizations.clone()),
            provider: provider.clone(),
            pass: Mutex::new(()),
        });
        let cancel = CancellationToken::new();

        // Subscribe before the first resolution so no change slips between
        let changes = host.settings.subscribe();
        if let Err(e) = coordinator.apply_settings().await {
            log::warn!("Failed to apply color settings at activation: {e}");
        }

        let mut tasks = vec![tokio::spawn(listen_for_settings(
            coordinator.clone(),
            changes,
            cancel.clone(),
        ))];

        let subscription = match (&host.watcher, &host.workspace_root) {
            (Some(watcher), Some(root)) => match watcher.watch(root, TARGET_FILE_NAME).await {
                Ok(subscription) => Some(subscription),
                Err(e) => {
                    log::warn!("File watching unavailable, decorations will not auto-refresh: {e}");
                    None
                }
            },
            _ => None,
        };
        let watching = subscription.is_some();
        if let Some(subscription) = subscription {
            tasks.push(tokio::spawn(forward_watch_events(
                provider.clone(),
                subscription,
                cancel.clone(),
            )));
        }

        log::info!("Colorizer activated (watching: {watching})");

        Self {
            provider,
            coordinator,
            cancel,
            tasks,
            watching,
        }
    }

    pub fn provider(&self) -> Arc<DecorationProvider> {
        self.provider.clone()
    }

    /// Whether file changes invalidate decorations automatically
    pub fn is_watching(&self) -> bool {
        self.watching
    }

    /// Re-read the settings and resolve both colors again.
    ///
    /// # Errors
    ///
    /// Returns the first store failure. The provider is still updated: the
    /// failing variant keeps its previous color.
    pub async fn reload_settings(&self) -> EngineResult<()> {
        self.coordinator.apply_settings().await
    }

    /// Stop every listener and wait for them to finish.
    pub async fn deactivate(mut self) {
        self.cancel.cancel();
        for task in std::mem::take(&mut self.tasks) {
            if let Err(e) = task.await {
                log::error!("Colorizer task ended abnormally: {e}");
            }
        }
        log::info!("Colorizer deactivated");
    }
}

impl Drop for Colorizer {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn listen_for_settings(
    coordinator: Arc<ChangeCoordinator>,
    mut changes: broadcast::Receiver<ConfigurationChange>,
    cancel: CancellationToken,
) {
    loop {
        let change = tokio::select! {
            () = cancel.cancelled() => break,
            change = changes.recv() => change,
        };

        let relevant = match change {
            Ok(change) => change.affects(SETTINGS_SECTION),
            Err(RecvError::Lagged(missed)) => {
                log::debug!("Missed {missed} configuration notifications, re-checking settings");
                true
            }
            Err(RecvError::Closed) => break,
        };

        if relevant {
            if let Err(e) = coordinator.apply_settings().await {
                log::warn!("Failed to apply changed color settings: {e}");
            }
        }
    }
}

async fn forward_watch_events(
    provider: Arc<DecorationProvider>,
    mut subscription: WatchSubscription,
    cancel: CancellationToken,
) {
    loop {
        let event = tokio::select! {
            () = cancel.cancelled() => break,
            event = subscription.next_event() => event,
        };

        let Some(event) = event else {
            log::debug!("Watch stream closed");
            break;
        };

        log::debug!("{:?} {}", event.kind, event.path.display());
        provider.invalidate(Some(&event.path)).await;
    }
}
