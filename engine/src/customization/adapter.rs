use super::store::{ConfigTarget, CustomizationStore};
use crate::error::StoreError;
use serde_json::Value;
use std::sync::Arc;

/// Outcome of a single adapter call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralChange {
    /// The store already held the requested state; nothing was written.
    Unchanged,
    Applied,
    Removed,
}

/// Persists literal colors under the engine's dedicated tokens.
///
/// Both operations are idempotent: when the store already matches, no write
/// happens, which also means the host has nothing to notify about.
#[derive(Clone)]
pub struct CustomizationAdapter {
    store: Arc<dyn CustomizationStore>,
}

impl CustomizationAdapter {
    pub fn new(store: Arc<dyn CustomizationStore>) -> Self {
        Self { store }
    }

    /// Narrowest scope that applies right now. Not cached: workspaces can be
    /// opened or closed between two resolutions.
    pub fn current_target(&self) -> ConfigTarget {
        if self.store.has_workspace() {
            ConfigTarget::Workspace
        } else {
            ConfigTarget::Global
        }
    }

    /// Ensure `token` maps to `literal` in the customization section.
    pub async fn apply_literal(
        &self,
        token: &str,
        literal: &str,
    ) -> Result<LiteralChange, StoreError> {
        let target = self.current_target();
        let mut section = self
            .store
            .read_customizations(target)
            .await?
            .unwrap_or_default();

        if section.get(token).and_then(Value::as_str) == Some(literal) {
            return Ok(LiteralChange::Unchanged);
        }

        section.insert(token.to_string(), Value::String(literal.to_string()));
        self.store.write_customizations(target, Some(section)).await?;

        log::info!("Applied {token} = {literal} to {target} color customizations");
        Ok(LiteralChange::Applied)
    }

    /// Remove `token` from the customization section, clearing the section
    /// when nothing else is left in it.
    pub async fn remove_literal(&self, token: &str) -> Result<LiteralChange, StoreError> {
        let target = self.current_target();
        let Some(mut section) = self.store.read_customizations(target).await? else {
            return Ok(LiteralChange::Unchanged);
        };

        if section.remove(token).is_none() {
            return Ok(LiteralChange::Unchanged);
        }

        let remaining = if section.is_empty() {
            None
        } else {
            Some(section)
        };
        self.store.write_customizations(target, remaining).await?;

        log::info!("Removed {token} from {target} color customizations");
        Ok(LiteralChange::Removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customization::memory::MemoryConfiguration;
    use serde_json::json;

    fn adapter_with(store: &Arc<MemoryConfiguration>) -> CustomizationAdapter {
        CustomizationAdapter::new(store.clone())
    }

    #[tokio::test]
    async fn test_apply_literal_is_idempotent() {
        let store = Arc::new(MemoryConfiguration::new());
        let adapter = adapter_with(&store);

        let first = adapter.apply_literal("initdeco.emptyInitFile", "#112233").await;
        assert_eq!(first.ok(), Some(LiteralChange::Applied));
        assert_eq!(store.write_count(), 1);

        let second = adapter.apply_literal("initdeco.emptyInitFile", "#112233").await;
        assert_eq!(second.ok(), Some(LiteralChange::Unchanged));
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn test_apply_literal_preserves_unrelated_keys() {
        let store = Arc::new(MemoryConfiguration::new());
        store.seed_customizations(
            ConfigTarget::Global,
            json!({ "editor.background": "#000000" }),
        );
        let adapter = adapter_with(&store);

        assert!(adapter.apply_literal("initdeco.emptyInitFile", "#112233").await.is_ok());

        let section = store.customizations(ConfigTarget::Global);
        assert_eq!(
            section.map(serde_json::Value::Object),
            Some(json!({
                "editor.background": "#000000",
                "initdeco.emptyInitFile": "#112233",
            }))
        );
    }

    #[tokio::test]
    async fn test_remove_literal_clears_emptied_section() {
        let store = Arc::new(MemoryConfiguration::new());
        let adapter = adapter_with(&store);

        assert!(adapter.apply_literal("initdeco.emptyInitFile", "#112233").await.is_ok());
        let removed = adapter.remove_literal("initdeco.emptyInitFile").await;
        assert_eq!(removed.ok(), Some(LiteralChange::Removed));
        assert!(store.customizations(ConfigTarget::Global).is_none());

        // Nothing left to remove: no further write
        let writes = store.write_count();
        let again = adapter.remove_literal("initdeco.emptyInitFile").await;
        assert_eq!(again.ok(), Some(LiteralChange::Unchanged));
        assert_eq!(store.write_count(), writes);
    }

    #[tokio::test]
    async fn test_target_follows_workspace_state_per_call() {
        let store = Arc::new(MemoryConfiguration::new());
        let adapter = adapter_with(&store);
        assert_eq!(adapter.current_target(), ConfigTarget::Global);

        store.set_workspace_open(true);
        assert_eq!(adapter.current_target(), ConfigTarget::Workspace);

        assert!(adapter.apply_literal("initdeco.nonEmptyInitFile", "#445566").await.is_ok());
        assert!(store.customizations(ConfigTarget::Global).is_none());
        assert!(store.customizations(ConfigTarget::Workspace).is_some());
    }

    #[tokio::test]
    async fn test_write_failure_is_propagated() {
        let store = Arc::new(MemoryConfiguration::new());
        store.set_read_only(Some(ConfigTarget::Global));
        let adapter = adapter_with(&store);

        let result = adapter.apply_literal("initdeco.emptyInitFile", "#112233").await;
        assert!(matches!(
            result,
            Err(StoreError::ReadOnly {
                target: ConfigTarget::Global
            })
        ));
    }
}
