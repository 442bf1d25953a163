use super::{ColorValue, ColorVariant, ResolvedColor};
use crate::customization::{CustomizationAdapter, CustomizationStore};
use crate::error::StoreError;
use std::sync::Arc;

/// Resolves color settings into [`ResolvedColor`] handles.
///
/// Holds no state of its own beyond the adapter; every call reads the store
/// again.
#[derive(Clone)]
pub struct ColorResolver {
    adapter: CustomizationAdapter,
}

impl ColorResolver {
    pub fn new(store: Arc<dyn CustomizationStore>) -> Self {
        Self {
            adapter: CustomizationAdapter::new(store),
        }
    }

    pub fn adapter(&self) -> &CustomizationAdapter {
        &self.adapter
    }

    /// Resolve one raw setting value.
    ///
    /// A literal is persisted under `dedicated_token` and the handle points at
    /// that token. A token name is returned as-is after removing any literal a
    /// previous session left under `dedicated_token`.
    ///
    /// # Errors
    ///
    /// Only store failures are reported; classification itself cannot fail.
    pub async fn resolve(
        &self,
        raw: &str,
        dedicated_token: &str,
        default: &str,
    ) -> Result<ResolvedColor, StoreError> {
        match ColorValue::classify(raw, default) {
            ColorValue::Literal(literal) => {
                self.adapter.apply_literal(dedicated_token, literal).await?;
                Ok(ResolvedColor::Dedicated(dedicated_token.to_string()))
            }
            ColorValue::Token(token) => {
                self.adapter.remove_literal(dedicated_token).await?;
                Ok(ResolvedColor::Token(token.to_string()))
            }
        }
    }

    /// Resolve a setting using the variant's dedicated token and default.
    pub async fn resolve_variant(
        &self,
        variant: ColorVariant,
        raw: &str,
    ) -> Result<ResolvedColor, StoreError> {
        self.resolve(raw, variant.dedicated_token(), variant.default_color())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customization::{ConfigTarget, MemoryConfiguration};
    use serde_json::json;

    fn setup() -> (Arc<MemoryConfiguration>, ColorResolver) {
        let store = Arc::new(MemoryConfiguration::new());
        let resolver = ColorResolver::new(store.clone());
        (store, resolver)
    }

    #[tokio::test]
    async fn test_literal_is_persisted_under_dedicated_token() {
        let (store, resolver) = setup();

        let handle = resolver.resolve_variant(ColorVariant::Empty, "#ABCDEF99").await;
        assert_eq!(
            handle.ok(),
            Some(ResolvedColor::Dedicated("initdeco.emptyInitFile".to_string()))
        );
        assert_eq!(
            store.customizations(ConfigTarget::Global).map(serde_json::Value::Object),
            Some(json!({ "initdeco.emptyInitFile": "#ABCDEF99" }))
        );
    }

    #[tokio::test]
    async fn test_token_is_returned_without_store_entry() {
        let (store, resolver) = setup();

        let handle = resolver.resolve_variant(ColorVariant::NonEmpty, "charts.blue").await;
        assert_eq!(handle.ok(), Some(ResolvedColor::Token("charts.blue".to_string())));
        assert!(store.customizations(ConfigTarget::Global).is_none());
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_blank_setting_uses_default_literal() {
        let (store, resolver) = setup();

        let handle = resolver.resolve_variant(ColorVariant::NonEmpty, "   ").await;
        assert_eq!(
            handle.ok(),
            Some(ResolvedColor::Dedicated("initdeco.nonEmptyInitFile".to_string()))
        );
        let section = store.customizations(ConfigTarget::Global);
        assert_eq!(
            section.and_then(|s| s.get("initdeco.nonEmptyInitFile").cloned()),
            Some(json!("#3572A5"))
        );
    }

    #[tokio::test]
    async fn test_resolving_twice_writes_once() {
        let (store, resolver) = setup();

        assert!(resolver.resolve_variant(ColorVariant::Empty, "#112233").await.is_ok());
        assert!(resolver.resolve_variant(ColorVariant::Empty, "#112233").await.is_ok());
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn test_switch_to_token_removes_literal_only() {
        let (store, resolver) = setup();
        store.seed_customizations(
            ConfigTarget::Global,
            json!({ "terminal.ansiRed": "#ff0000" }),
        );

        assert!(resolver.resolve_variant(ColorVariant::Empty, "#112233").await.is_ok());
        let handle = resolver.resolve_variant(ColorVariant::Empty, "charts.green").await;
        assert_eq!(handle.ok(), Some(ResolvedColor::Token("charts.green".to_string())));

        assert_eq!(
            store.customizations(ConfigTarget::Global).map(serde_json::Value::Object),
            Some(json!({ "terminal.ansiRed": "#ff0000" }))
        );
    }

    #[tokio::test]
    async fn test_padded_literal_is_stored_trimmed() {
        let (store, resolver) = setup();

        let handle = resolver.resolve_variant(ColorVariant::Empty, "  #abcdef ").await;
        assert!(handle.is_ok_and(|h| h.is_dedicated()));
        assert_eq!(
            store.customizations(ConfigTarget::Global).map(serde_json::Value::Object),
            Some(json!({ "initdeco.emptyInitFile": "#abcdef" }))
        );
    }

    #[tokio::test]
    async fn test_invalid_hex_is_a_token() {
        let (store, resolver) = setup();

        let handle = resolver.resolve_variant(ColorVariant::Empty, "#ZZZZZZ").await;
        assert_eq!(handle.ok(), Some(ResolvedColor::Token("#ZZZZZZ".to_string())));
        assert_eq!(store.write_count(), 0);
    }
}
