use claims::*;
use engine::constants::{
    EMPTY_COLOR_SETTING, NON_EMPTY_BADGE_SETTING, NON_EMPTY_COLOR_SETTING, TARGET_FILE_NAME,
};
use engine::customization::{ConfigTarget, MemoryConfiguration};
use engine::inspector::FsInspector;
use engine::watch::PollingWatcher;
use engine::{Colorizer, Decoration, HostServices, RefreshEvent, ResolvedColor};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::timeout;

// Helper module for building hosts and workspaces
mod helpers {
    use super::*;

    pub fn memory_host(store: &Arc<MemoryConfiguration>, root: Option<&Path>) -> HostServices {
        HostServices {
            settings: store.clone(),
            customizations: store.clone(),
            inspector: Arc::new(FsInspector),
            watcher: None,
            workspace_root: root.map(Path::to_path_buf),
        }
    }

    /// Create `<root>/<package>/__init__.py` with `content`
    pub fn write_init(root: &Path, package: &str, content: &str) -> PathBuf {
        let dir = root.join(package);
        fs::create_dir_all(&dir).expect("create package dir");
        let path = dir.join(TARGET_FILE_NAME);
        fs::write(&path, content).expect("write __init__.py");
        path
    }

    /// Wait until a refresh naming `path` arrives
    pub async fn wait_for_refresh(
        refresh: &mut broadcast::Receiver<RefreshEvent>,
        path: &Path,
    ) -> bool {
        let deadline = Duration::from_secs(5);
        timeout(deadline, async {
            loop {
                match refresh.recv().await {
                    Ok(event) if event.includes(path) => return true,
                    Ok(_) => continue,
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => return false,
                }
            }
        })
        .await
        .unwrap_or(false)
    }
}

use helpers::*;

#[tokio::test]
async fn test_literal_and_token_settings_scenario() {
    let workspace = tempfile::tempdir().expect("temp dir");
    let init = write_init(workspace.path(), "proj/pkg", "");
    let other = workspace.path().join("proj/pkg/other.py");
    fs::write(&other, "").expect("write other.py");

    let store = Arc::new(MemoryConfiguration::new());
    store.set_setting(EMPTY_COLOR_SETTING, "#ABCDEF99");
    store.set_setting(NON_EMPTY_COLOR_SETTING, "charts.blue");

    let colorizer = Colorizer::activate(memory_host(&store, None)).await;
    let provider = colorizer.provider();

    assert_eq!(
        store
            .customizations(ConfigTarget::Global)
            .map(serde_json::Value::Object),
        Some(json!({ "initdeco.emptyInitFile": "#ABCDEF99" }))
    );

    let decoration = assert_some!(provider.provide_decoration(&init).await);
    assert_eq!(
        decoration,
        Decoration {
            color: ResolvedColor::Dedicated("initdeco.emptyInitFile".to_string()),
            tooltip: "Empty __init__.py file".to_string(),
            badge: None,
        }
    );
    assert_none!(provider.provide_decoration(&other).await);

    colorizer.deactivate().await;
}

#[tokio::test]
async fn test_setting_change_round_trip_through_store() {
    let workspace = tempfile::tempdir().expect("temp dir");
    let init = write_init(workspace.path(), "pkg", "VERSION = 1\n");

    let store = Arc::new(MemoryConfiguration::new());
    store.set_workspace_open(true);
    store.seed_customizations(
        ConfigTarget::Workspace,
        json!({ "editorError.foreground": "#ff0000" }),
    );
    store.set_setting(NON_EMPTY_COLOR_SETTING, "#112233");

    let colorizer = Colorizer::activate(memory_host(&store, Some(workspace.path()))).await;
    let provider = colorizer.provider();
    let mut refresh = provider.subscribe();

    let decoration = assert_some!(provider.provide_decoration(&init).await);
    assert_eq!(
        decoration.color,
        ResolvedColor::Dedicated("initdeco.nonEmptyInitFile".to_string())
    );

    // Switch to a theme token: the literal disappears, unrelated keys stay
    store.set_setting(NON_EMPTY_COLOR_SETTING, "charts.orange");
    store.set_setting(NON_EMPTY_BADGE_SETTING, "N");
    // Both changes land before the listener wakes, so the first pass sees them
    assert!(wait_for_refresh(&mut refresh, &init).await);

    let decoration = assert_some!(provider.provide_decoration(&init).await);
    assert_eq!(decoration.color, ResolvedColor::Token("charts.orange".to_string()));
    assert_eq!(decoration.badge.as_deref(), Some("N"));

    let section = assert_some!(store.customizations(ConfigTarget::Workspace));
    assert_eq!(section.get("editorError.foreground"), Some(&json!("#ff0000")));
    assert_none!(section.get("initdeco.nonEmptyInitFile"));
    // Empty default literal was written to the workspace scope, never global
    assert_some!(section.get("initdeco.emptyInitFile"));
    assert_none!(store.customizations(ConfigTarget::Global));

    colorizer.deactivate().await;
}

#[tokio::test]
async fn test_watcher_invalidates_changed_files() {
    let workspace = tempfile::tempdir().expect("temp dir");
    let init = write_init(workspace.path(), "pkg", "");

    let store = Arc::new(MemoryConfiguration::new());
    store.set_setting(EMPTY_COLOR_SETTING, "charts.yellow");
    store.set_setting(NON_EMPTY_COLOR_SETTING, "charts.green");

    let mut host = memory_host(&store, Some(workspace.path()));
    host.watcher = Some(Arc::new(PollingWatcher::new(Duration::from_millis(20))));

    let colorizer = Colorizer::activate(host).await;
    assert!(colorizer.is_watching());
    let provider = colorizer.provider();
    let mut refresh = provider.subscribe();

    let decoration = assert_some!(provider.provide_decoration(&init).await);
    assert_eq!(decoration.color, ResolvedColor::Token("charts.yellow".to_string()));

    fs::write(&init, "from .core import *\n").expect("fill __init__.py");
    assert!(wait_for_refresh(&mut refresh, &init).await);

    let decoration = assert_some!(provider.provide_decoration(&init).await);
    assert_eq!(decoration.color, ResolvedColor::Token("charts.green".to_string()));
    assert_eq!(decoration.tooltip, "Non-empty __init__.py file");

    // A brand new package is picked up too
    let created = write_init(workspace.path(), "pkg/sub", "");
    assert!(wait_for_refresh(&mut refresh, &created).await);
    let decoration = assert_some!(provider.provide_decoration(&created).await);
    assert_eq!(decoration.tooltip, "Empty __init__.py file");

    colorizer.deactivate().await;
}

#[tokio::test]
async fn test_missing_workspace_root_disables_watching_only() {
    let workspace = tempfile::tempdir().expect("temp dir");
    let init = write_init(workspace.path(), "pkg", "");

    let store = Arc::new(MemoryConfiguration::new());
    let mut host = memory_host(&store, Some(&workspace.path().join("missing")));
    host.watcher = Some(Arc::new(PollingWatcher::new(Duration::from_millis(20))));

    let colorizer = Colorizer::activate(host).await;
    assert!(!colorizer.is_watching());

    let decoration = assert_some!(colorizer.provider().provide_decoration(&init).await);
    assert_eq!(
        decoration.color,
        ResolvedColor::Dedicated("initdeco.emptyInitFile".to_string())
    );

    colorizer.deactivate().await;
}

#[tokio::test]
async fn test_deleted_file_fails_open_then_recovers() {
    let workspace = tempfile::tempdir().expect("temp dir");
    let path = workspace.path().join("pkg").join(TARGET_FILE_NAME);

    let store = Arc::new(MemoryConfiguration::new());
    let colorizer = Colorizer::activate(memory_host(&store, None)).await;
    let provider = colorizer.provider();

    let decoration = assert_some!(provider.provide_decoration(&path).await);
    assert_eq!(
        decoration.color,
        ResolvedColor::Dedicated("initdeco.nonEmptyInitFile".to_string())
    );

    write_init(workspace.path(), "pkg", "");
    let decoration = assert_some!(provider.provide_decoration(&path).await);
    assert_eq!(
        decoration.color,
        ResolvedColor::Dedicated("initdeco.emptyInitFile".to_string())
    );

    colorizer.deactivate().await;
}
