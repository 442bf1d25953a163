//! # Color Resolution
//!
//! Turns the two user color settings into [`ResolvedColor`] handles that a
//! renderer can consume uniformly.
//!
//! A setting is either a literal hex color (`#RRGGBB` or `#RRGGBBAA`) or the
//! name of a theme token. Literals are written into the host's customization
//! section under a dedicated token owned by the engine, so the handle always
//! names a token:
//!
//! | Setting value   | Store effect                                 | Handle                                  |
//! |-----------------|----------------------------------------------|-----------------------------------------|
//! | `#ABCDEF99`     | `initdeco.emptyInitFile = "#ABCDEF99"`       | `Dedicated("initdeco.emptyInitFile")`   |
//! | `charts.blue`   | `initdeco.emptyInitFile` removed if present  | `Token("charts.blue")`                  |
//! | blank / unset   | same as the variant's default literal        | `Dedicated(..)`                         |
//!
//! Anything that is not a strict hex literal, including `#fff` or `#ZZZZZZ`,
//! is treated as a token name. Classification never fails.

pub mod resolver;
pub mod validation;

pub use resolver::ColorResolver;
pub use validation::{BadgeValidator, ColorValidationError, HexColorValidator};

use crate::constants::*;
use crate::validation::Validator;
use std::fmt;

/// The two decoration variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorVariant {
    Empty,
    NonEmpty,
}

impl ColorVariant {
    pub const ALL: [ColorVariant; 2] = [ColorVariant::Empty, ColorVariant::NonEmpty];

    pub fn for_emptiness(is_empty: bool) -> Self {
        if is_empty {
            ColorVariant::Empty
        } else {
            ColorVariant::NonEmpty
        }
    }

    pub fn color_setting(self) -> &'static str {
        match self {
            ColorVariant::Empty => EMPTY_COLOR_SETTING,
            ColorVariant::NonEmpty => NON_EMPTY_COLOR_SETTING,
        }
    }

    pub fn badge_setting(self) -> &'static str {
        match self {
            ColorVariant::Empty => EMPTY_BADGE_SETTING,
            ColorVariant::NonEmpty => NON_EMPTY_BADGE_SETTING,
        }
    }

    pub fn dedicated_token(self) -> &'static str {
        match self {
            ColorVariant::Empty => EMPTY_COLOR_TOKEN,
            ColorVariant::NonEmpty => NON_EMPTY_COLOR_TOKEN,
        }
    }

    pub fn default_color(self) -> &'static str {
        match self {
            ColorVariant::Empty => DEFAULT_EMPTY_COLOR,
            ColorVariant::NonEmpty => DEFAULT_NON_EMPTY_COLOR,
        }
    }

    pub fn fallback_token(self) -> &'static str {
        match self {
            ColorVariant::Empty => FALLBACK_EMPTY_TOKEN,
            ColorVariant::NonEmpty => FALLBACK_NON_EMPTY_TOKEN,
        }
    }

    pub fn tooltip(self) -> &'static str {
        match self {
            ColorVariant::Empty => EMPTY_TOOLTIP,
            ColorVariant::NonEmpty => NON_EMPTY_TOOLTIP,
        }
    }
}

impl fmt::Display for ColorVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorVariant::Empty => write!(f, "empty"),
            ColorVariant::NonEmpty => write!(f, "non-empty"),
        }
    }
}

/// Classified setting value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorValue<'a> {
    /// A `#RRGGBB` or `#RRGGBBAA` literal
    Literal(&'a str),
    /// Anything else, used verbatim as a theme token name
    Token(&'a str),
}

impl<'a> ColorValue<'a> {
    /// Trim surrounding whitespace, substitute `default` for blank input,
    /// then classify.
    pub fn classify(raw: &'a str, default: &'a str) -> Self {
        let trimmed = raw.trim();
        let value = if trimmed.is_empty() { default } else { trimmed };

        if HexColorValidator.is_valid(value) {
            ColorValue::Literal(value)
        } else {
            ColorValue::Token(value)
        }
    }
}

/// Which token the renderer should use for a variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResolvedColor {
    /// A theme token configured directly by the user
    Token(String),
    /// The engine's own token, backed by a literal in the customization store
    Dedicated(String),
}

impl ResolvedColor {
    pub fn token_name(&self) -> &str {
        match self {
            ResolvedColor::Token(name) | ResolvedColor::Dedicated(name) => name,
        }
    }

    pub fn is_dedicated(&self) -> bool {
        matches!(self, ResolvedColor::Dedicated(_))
    }
}

impl fmt::Display for ResolvedColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedColor::Token(name) => write!(f, "token {name}"),
            ResolvedColor::Dedicated(name) => write!(f, "dedicated token {name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_blank_uses_default() {
        assert_eq!(ColorValue::classify("", "#112233"), ColorValue::Literal("#112233"));
        assert_eq!(ColorValue::classify("  \t", "#112233"), ColorValue::Literal("#112233"));
        assert_eq!(ColorValue::classify("", "charts.red"), ColorValue::Token("charts.red"));
    }

    #[test]
    fn test_classify_literals_and_tokens() {
        assert_eq!(ColorValue::classify("#ABCDEF99", "#000000"), ColorValue::Literal("#ABCDEF99"));
        assert_eq!(ColorValue::classify("#abcdef", "#000000"), ColorValue::Literal("#abcdef"));
        assert_eq!(ColorValue::classify("charts.blue", "#000000"), ColorValue::Token("charts.blue"));
        assert_eq!(ColorValue::classify("#ZZZZZZ", "#000000"), ColorValue::Token("#ZZZZZZ"));
        assert_eq!(ColorValue::classify("#fff", "#000000"), ColorValue::Token("#fff"));
    }

    #[test]
    fn test_classify_ignores_surrounding_whitespace() {
        assert_eq!(ColorValue::classify(" #abcdef ", "#000000"), ColorValue::Literal("#abcdef"));
        assert_eq!(ColorValue::classify("\tcharts.red\n", "#000000"), ColorValue::Token("charts.red"));
    }

    #[test]
    fn test_variant_names() {
        assert_eq!(ColorVariant::for_emptiness(true), ColorVariant::Empty);
        assert_eq!(ColorVariant::for_emptiness(false), ColorVariant::NonEmpty);
        assert_eq!(ColorVariant::Empty.dedicated_token(), "initdeco.emptyInitFile");
        assert_eq!(ColorVariant::NonEmpty.tooltip(), "Non-empty __init__.py file");
        assert_eq!(ColorVariant::NonEmpty.to_string(), "non-empty");
    }

    #[test]
    fn test_resolved_color_token_name() {
        let dedicated = ResolvedColor::Dedicated("initdeco.emptyInitFile".to_string());
        assert_eq!(dedicated.token_name(), "initdeco.emptyInitFile");
        assert!(dedicated.is_dedicated());
        assert!(!ResolvedColor::Token("charts.blue".to_string()).is_dedicated());
    }
}
