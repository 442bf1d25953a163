//! Subcommand implementations.
//!
//! Every command runs the same engine an editor would: it activates a
//! [`Colorizer`] against the JSON settings store, queries decorations through
//! the provider and tears it down again. Output goes to the writer passed in.

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::render::Renderer;
use crate::settings_file::{JsonSettingsStore, WORKSPACE_SETTINGS_DIR};
use engine::constants::TARGET_FILE_NAME;
use engine::customization::ConfigTarget;
use engine::inspector::FsInspector;
use engine::watch::{FileWatcher, PollingWatcher, find_files};
use engine::{ColorVariant, Colorizer, DecorationProvider, HostServices, RefreshEvent, ResolvedColor};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;

/// Counts reported at the end of a listing
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ListSummary {
    pub empty: usize,
    pub non_empty: usize,
}

/// A directory counts as an open workspace once it has its own settings
/// directory.
pub fn is_workspace(root: &Path) -> bool {
    root.join(WORKSPACE_SETTINGS_DIR).is_dir()
}

/// Settings store for `root`. `force_workspace` opens the workspace scope
/// even before its settings directory exists.
pub fn open_store(
    config: &AppConfig,
    root: &Path,
    force_workspace: bool,
) -> AppResult<Arc<JsonSettingsStore>> {
    let user_file = config
        .settings()
        .user_file()
        .ok_or_else(|| AppError::Config("No location for the user settings file".to_string()))?;
    let workspace = (force_workspace || is_workspace(root)).then_some(root);
    Ok(Arc::new(JsonSettingsStore::new(user_file, workspace)))
}

fn host_services(
    store: &Arc<JsonSettingsStore>,
    root: &Path,
    watcher: Option<Arc<dyn FileWatcher>>,
) -> HostServices {
    HostServices {
        settings: store.clone(),
        customizations: store.clone(),
        inspector: Arc::new(FsInspector),
        watcher,
        workspace_root: Some(root.to_path_buf()),
    }
}

/// `ROOT` argument, defaulting to the working directory
pub async fn resolve_root(root: Option<&Path>) -> AppResult<PathBuf> {
    let root = match root {
        Some(root) => root.to_path_buf(),
        None => std::env::current_dir()?,
    };
    let metadata = tokio::fs::metadata(&root)
        .await
        .map_err(|e| AppError::Io(format!("{}: {e}", root.display())))?;
    if !metadata.is_dir() {
        return Err(AppError::Io(format!("{} is not a directory", root.display())));
    }
    Ok(root)
}

/// Print every `__init__.py` below `root` with its decoration.
pub async fn list(config: &AppConfig, root: &Path, out: &mut dyn Write) -> AppResult<ListSummary> {
    let store = open_store(config, root, false)?;
    let colorizer = Colorizer::activate(host_services(&store, root, None)).await;

    let result = print_listing(config, &store, &colorizer.provider(), root, out).await;
    colorizer.deactivate().await;
    result
}

/// List, then follow file and settings changes until `shutdown` fires.
pub async fn watch(
    config: &AppConfig,
    root: &Path,
    out: &mut dyn Write,
    shutdown: CancellationToken,
) -> AppResult<()> {
    let store = open_store(config, root, false)?;
    let watcher: Option<Arc<dyn FileWatcher>> = if config.watch().enabled() {
        Some(Arc::new(
            PollingWatcher::new(config.watch().poll_interval())
                .with_ignored_dirs(config.watch().ignore()),
        ))
    } else {
        None
    };

    let colorizer = Colorizer::activate(host_services(&store, root, watcher)).await;
    let provider = colorizer.provider();
    let mut refresh = provider.subscribe();

    let result = async {
        print_listing(config, &store, &provider, root, out).await?;
        if !colorizer.is_watching() {
            writeln!(out, "File watching is off; following settings changes only")?;
        }

        let mut ticker = interval(config.watch().poll_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;
        let mut fingerprint = store.fingerprint().await;

        loop {
            tokio::select! {
                () = shutdown.cancelled() => break,
                event = refresh.recv() => match event {
                    Ok(RefreshEvent::Files(paths)) => {
                        let renderer = Renderer::new(store.merged_customizations().await?);
                        for path in paths {
                            print_change(&provider, &renderer, root, &path, out).await?;
                        }
                    }
                    Ok(RefreshEvent::All) | Err(RecvError::Lagged(_)) => {
                        writeln!(out, "Decoration colors changed")?;
                        print_listing(config, &store, &provider, root, out).await?;
                    }
                    Err(RecvError::Closed) => break,
                },
                _ = ticker.tick() => {
                    let current = store.fingerprint().await;
                    if current != fingerprint {
                        log::debug!("Settings files changed on disk");
                        fingerprint = current;
                        store.announce_external_change();
                    }
                }
            }
        }
        Ok::<(), AppError>(())
    }
    .await;

    colorizer.deactivate().await;
    result
}

/// Write a color setting and resolve it, so the customization section
/// reflects the new value before returning.
pub async fn set(
    config: &AppConfig,
    root: &Path,
    variant: ColorVariant,
    value: &str,
    workspace: bool,
    out: &mut dyn Write,
) -> AppResult<ResolvedColor> {
    let store = open_store(config, root, workspace)?;
    let target = if workspace {
        ConfigTarget::Workspace
    } else {
        ConfigTarget::Global
    };

    let value = value.trim();
    store
        .set_setting(
            variant.color_setting(),
            (!value.is_empty()).then_some(value),
            target,
        )
        .await?;

    let colorizer = Colorizer::activate(host_services(&store, root, None)).await;
    let reloaded = colorizer.reload_settings().await;
    let resolved = colorizer.provider().style().await.variant(variant).color.clone();
    colorizer.deactivate().await;
    reloaded?;

    writeln!(out, "{variant} files now use {resolved}")?;
    Ok(resolved)
}

/// Print raw settings per scope and the handles they resolve to.
pub async fn show(config: &AppConfig, root: &Path, out: &mut dyn Write) -> AppResult<()> {
    let store = open_store(config, root, false)?;

    writeln!(out, "User settings:      {}", store.user_file().display())?;
    match store.workspace_file() {
        Some(path) => writeln!(out, "Workspace settings: {}", path.display())?,
        None => writeln!(out, "Workspace settings: (no workspace)")?,
    }
    writeln!(out)?;

    for variant in ColorVariant::ALL {
        for key in [variant.color_setting(), variant.badge_setting()] {
            let user = store.setting_in(key, ConfigTarget::Global).await?;
            let workspace = store.setting_in(key, ConfigTarget::Workspace).await?;
            writeln!(
                out,
                "{key:<24} user={:<12} workspace={}",
                user.as_deref().unwrap_or("-"),
                workspace.as_deref().unwrap_or("-")
            )?;
        }
    }
    writeln!(out)?;

    let colorizer = Colorizer::activate(host_services(&store, root, None)).await;
    if let Err(e) = colorizer.reload_settings().await {
        writeln!(out, "Warning: {e}")?;
    }
    let style = colorizer.provider().style().await;
    colorizer.deactivate().await;

    let renderer = Renderer::new(store.merged_customizations().await?);
    for variant in ColorVariant::ALL {
        let variant_style = style.variant(variant);
        let rgb = match renderer.color_of(&variant_style.color) {
            Some((r, g, b)) => format!("#{r:02X}{g:02X}{b:02X}"),
            None => "uncolored".to_string(),
        };
        writeln!(
            out,
            "{:<10} {} ({rgb}){}",
            variant.to_string(),
            variant_style.color,
            variant_style
                .badge
                .as_deref()
                .map(|badge| format!(" badge {badge}"))
                .unwrap_or_default()
        )?;
    }
    Ok(())
}

async fn scan(root: &Path, ignored: Vec<String>) -> AppResult<Vec<PathBuf>> {
    let root = root.to_path_buf();
    tokio::task::spawn_blocking(move || find_files(&root, TARGET_FILE_NAME, &ignored))
        .await
        .map_err(|e| AppError::Io(format!("Directory scan failed: {e}")))?
        .map_err(AppError::from)
}

async fn print_listing(
    config: &AppConfig,
    store: &JsonSettingsStore,
    provider: &DecorationProvider,
    root: &Path,
    out: &mut dyn Write,
) -> AppResult<ListSummary> {
    let files = scan(root, config.watch().ignore()).await?;
    let renderer = Renderer::new(store.merged_customizations().await?);
    let mut summary = ListSummary::default();

    for path in files {
        let Some(decoration) = provider.provide_decoration(&path).await else {
            continue;
        };
        if decoration.tooltip == ColorVariant::Empty.tooltip() {
            summary.empty += 1;
        } else {
            summary.non_empty += 1;
        }
        writeln!(out, "{}", renderer.render(&label(root, &path), &decoration))?;
    }

    writeln!(
        out,
        "{} empty, {} non-empty",
        summary.empty, summary.non_empty
    )?;
    Ok(summary)
}

async fn print_change(
    provider: &DecorationProvider,
    renderer: &Renderer,
    root: &Path,
    path: &Path,
    out: &mut dyn Write,
) -> AppResult<()> {
    if !tokio::fs::try_exists(path).await.unwrap_or(false) {
        writeln!(out, "removed  {}", label(root, path))?;
        return Ok(());
    }
    if let Some(decoration) = provider.provide_decoration(path).await {
        writeln!(out, "updated  {}", renderer.render(&label(root, path), &decoration))?;
    }
    Ok(())
}

fn label(root: &Path, path: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}
