use engine::color::{ColorValue, HexColorValidator};
use engine::customization::{CustomizationAdapter, LiteralChange, MemoryConfiguration};
use engine::inspector::FsInspector;
use engine::validation::Validator;
use engine::DecorationProvider;
use proptest::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("test runtime")
}

#[cfg(test)]
mod classification_property_tests {
    use super::*;

    proptest! {
        #[test]
        fn test_hex_literals_are_literals(
            digits in prop_oneof!["[0-9a-fA-F]{6}", "[0-9a-fA-F]{8}"]
        ) {
            let raw = format!("#{digits}");
            prop_assert_eq!(ColorValue::classify(&raw, "#000000"), ColorValue::Literal(raw.as_str()));
        }

        #[test]
        fn test_wrong_length_hex_is_a_token(
            digits in prop_oneof!["[0-9a-f]{0,5}", "[0-9a-f]{7}", "[0-9a-f]{9,12}"]
        ) {
            let raw = format!("#{digits}");
            prop_assert!(!HexColorValidator.is_valid(raw.as_str()));
            prop_assert_eq!(ColorValue::classify(&raw, "#000000"), ColorValue::Token(raw.as_str()));
        }

        #[test]
        fn test_names_without_hash_are_tokens(raw in "[a-zA-Z][a-zA-Z0-9.]{0,40}") {
            prop_assert_eq!(ColorValue::classify(&raw, "#000000"), ColorValue::Token(raw.as_str()));
        }

        #[test]
        fn test_blank_values_take_the_default(raw in "[ \t]{0,8}") {
            prop_assert_eq!(
                ColorValue::classify(&raw, "charts.blue"),
                ColorValue::Token("charts.blue")
            );
        }
    }
}

#[cfg(test)]
mod provider_property_tests {
    use super::*;

    proptest! {
        #[test]
        fn test_other_file_names_are_never_decorated(
            dirs in prop::collection::vec("[a-z_]{1,10}", 0..4),
            name in "[a-zA-Z0-9_.]{1,20}"
        ) {
            prop_assume!(name != "__init__.py");

            let mut path: PathBuf = dirs.iter().collect();
            path.push(&name);

            let provider = DecorationProvider::new(Arc::new(FsInspector));
            let decoration = runtime().block_on(provider.provide_decoration(&path));
            prop_assert!(decoration.is_none());
        }
    }
}

#[cfg(test)]
mod adapter_property_tests {
    use super::*;

    proptest! {
        #[test]
        fn test_applying_a_literal_twice_writes_once(
            digits in prop_oneof!["[0-9a-f]{6}", "[0-9a-f]{8}"]
        ) {
            let literal = format!("#{digits}");
            let store = Arc::new(MemoryConfiguration::new());
            let adapter = CustomizationAdapter::new(store.clone());

            let (first, second) = runtime().block_on(async {
                let first = adapter.apply_literal("initdeco.emptyInitFile", &literal).await;
                let second = adapter.apply_literal("initdeco.emptyInitFile", &literal).await;
                (first, second)
            });

            prop_assert_eq!(first.ok(), Some(LiteralChange::Applied));
            prop_assert_eq!(second.ok(), Some(LiteralChange::Unchanged));
            prop_assert_eq!(store.write_count(), 1);
        }
    }
}
