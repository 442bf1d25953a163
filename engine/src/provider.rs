use crate::cache::{CacheLookup, EmptinessCache};
use crate::color::{ColorVariant, ResolvedColor};
use crate::constants::TARGET_FILE_NAME;
use crate::inspector::FileInspector;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};
use tokio_util::sync::CancellationToken;

const REFRESH_CHANNEL_CAPACITY: usize = 256;

/// Decoration attached to a matching file. Produced per query, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoration {
    pub color: ResolvedColor,
    pub tooltip: String,
    pub badge: Option<String>,
}

/// Color and optional badge for one variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantStyle {
    pub color: ResolvedColor,
    pub badge: Option<String>,
}

impl VariantStyle {
    pub fn new(color: ResolvedColor) -> Self {
        Self { color, badge: None }
    }

    pub fn with_badge(mut self, badge: Option<String>) -> Self {
        self.badge = badge;
        self
    }
}

/// Current styles for both variants
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecorationStyle {
    pub empty: VariantStyle,
    pub non_empty: VariantStyle,
}

impl DecorationStyle {
    /// Symbolic styles used before the first resolution succeeds
    pub fn fallback() -> Self {
        Self {
            empty: VariantStyle::new(ResolvedColor::Token(
                ColorVariant::Empty.fallback_token().to_string(),
            )),
            non_empty: VariantStyle::new(ResolvedColor::Token(
                ColorVariant::NonEmpty.fallback_token().to_string(),
            )),
        }
    }

    pub fn variant(&self, variant: ColorVariant) -> &VariantStyle {
        match variant {
            ColorVariant::Empty => &self.empty,
            ColorVariant::NonEmpty => &self.non_empty,
        }
    }

    pub fn variant_mut(&mut self, variant: ColorVariant) -> &mut VariantStyle {
        match variant {
            ColorVariant::Empty => &mut self.empty,
            ColorVariant::NonEmpty => &mut self.non_empty,
        }
    }
}

impl Default for DecorationStyle {
    fn default() -> Self {
        Self::fallback()
    }
}

/// Scope of a refresh broadcast
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshEvent {
    /// Every decoration may have changed
    All,
    /// Only these files need re-querying
    Files(Vec<PathBuf>),
}

impl RefreshEvent {
    pub fn includes(&self, path: &Path) -> bool {
        match self {
            RefreshEvent::All => true,
            RefreshEvent::Files(paths) => paths.iter().any(|p| p == path),
        }
    }
}

/// Whether `path` names the decorated file
pub fn is_target(path: &Path) -> bool {
    path.file_name().is_some_and(|name| name == TARGET_FILE_NAME)
}

/// Answers decoration queries and broadcasts refresh signals.
///
/// Owns the emptiness cache and the current [`DecorationStyle`]; it is the
/// only writer of both. Hosts call [`provide_decoration`](Self::provide_decoration)
/// for each visible file and re-query whatever a [`RefreshEvent`] names.
pub struct DecorationProvider {
    inspector: Arc<dyn FileInspector>,
    cache: EmptinessCache,
    style: RwLock<DecorationStyle>,
    refresh: broadcast::Sender<RefreshEvent>,
}

impl DecorationProvider {
    pub fn new(inspector: Arc<dyn FileInspector>) -> Self {
        Self::with_style(inspector, DecorationStyle::fallback())
    }

    pub fn with_style(inspector: Arc<dyn FileInspector>, style: DecorationStyle) -> Self {
        let (refresh, _) = broadcast::channel(REFRESH_CHANNEL_CAPACITY);
        Self {
            inspector,
            cache: EmptinessCache::new(),
            style: RwLock::new(style),
            refresh,
        }
    }

    /// Subscribe to refresh broadcasts
    pub fn subscribe(&self) -> broadcast::Receiver<RefreshEvent> {
        self.refresh.subscribe()
    }

    pub fn cache(&self) -> &EmptinessCache {
        &self.cache
    }

    /// Snapshot of the current styles
    pub async fn style(&self) -> DecorationStyle {
        self.style.read().await.clone()
    }

    /// Decoration for `path`, or `None` when it is not the target file.
    pub async fn provide_decoration(&self, path: &Path) -> Option<Decoration> {
        self.provide_decoration_cancellable(path, &CancellationToken::new())
            .await
    }

    /// Like [`provide_decoration`](Self::provide_decoration), abandoning the
    /// query without touching the cache once `cancel` fires.
    pub async fn provide_decoration_cancellable(
        &self,
        path: &Path,
        cancel: &CancellationToken,
    ) -> Option<Decoration> {
        if !is_target(path) {
            return None;
        }

        let is_empty = match self.cache.get(path).await {
            CacheLookup::Hit(is_empty) => {
                log::debug!("Emptiness cache hit for {}", path.display());
                is_empty
            }
            CacheLookup::Miss => self.inspect(path, cancel).await?,
        };

        let variant = ColorVariant::for_emptiness(is_empty);
        let style = self.style.read().await;
        let variant_style = style.variant(variant);

        Some(Decoration {
            color: variant_style.color.clone(),
            tooltip: variant.tooltip().to_string(),
            badge: variant_style.badge.clone(),
        })
    }

    /// Inspect on cache miss. Returns `None` only when cancelled.
    async fn inspect(&self, path: &Path, cancel: &CancellationToken) -> Option<bool> {
        let generation = self.cache.generation().await;

        let result = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                log::debug!("Decoration query for {} cancelled", path.display());
                return None;
            }
            result = self.inspector.is_empty(path) => result,
        };

        match result {
            Ok(is_empty) => {
                if !self
                    .cache
                    .set_if_current(path.to_path_buf(), is_empty, generation)
                    .await
                {
                    log::debug!(
                        "Discarding inspection of {} started before an invalidation",
                        path.display()
                    );
                }
                Some(is_empty)
            }
            Err(e) => {
                // Fail open as non-empty and leave nothing cached so the next
                // query inspects again.
                log::debug!("Failed to inspect {}: {e}", path.display());
                self.cache.forget(path).await;
                Some(false)
            }
        }
    }

    /// Replace both styles, clear the cache and refresh every decoration.
    pub async fn set_colors(&self, style: DecorationStyle) {
        *self.style.write().await = style;
        self.cache.invalidate_all().await;
        self.broadcast(RefreshEvent::All);
    }

    /// Forget the cached state for `path` (or everything) and refresh it.
    pub async fn invalidate(&self, path: Option<&Path>) {
        match path {
            Some(path) => {
                self.cache.invalidate(path).await;
                self.broadcast(RefreshEvent::Files(vec![path.to_path_buf()]));
            }
            None => {
                self.cache.invalidate_all().await;
                self.broadcast(RefreshEvent::All);
            }
        }
    }

    fn broadcast(&self, event: RefreshEvent) {
        // No subscribers is fine
        let _ = self.refresh.send(event);
    }
}
