use crate::constants::MAX_BADGE_CHARS;
use crate::validation::Validator;
use once_cell::sync::Lazy;
use regex::Regex;

static HEX_COLOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^#([0-9a-f]{6}|[0-9a-f]{8})$").expect("hex color pattern compiles")
});

/// Validation errors for color and badge settings
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ColorValidationError {
    #[error("'{value}' is not a #RRGGBB or #RRGGBBAA color")]
    NotHexColor { value: String },
    #[error("Badge '{value}' is longer than {limit} characters")]
    BadgeTooLong { value: String, limit: usize },
    #[error("Badge cannot be blank")]
    BlankBadge,
}

/// Accepts exactly `#RRGGBB` or `#RRGGBBAA`, case-insensitive.
///
/// Short forms such as `#fff` and odd lengths are rejected; the resolver then
/// treats them as theme token names.
pub struct HexColorValidator;

impl Validator<str> for HexColorValidator {
    type Error = ColorValidationError;

    fn validate(&self, input: &str) -> Result<(), Self::Error> {
        if HEX_COLOR.is_match(input) {
            Ok(())
        } else {
            Err(ColorValidationError::NotHexColor {
                value: input.to_string(),
            })
        }
    }
}

/// Validator for decoration badges
pub struct BadgeValidator;

impl Validator<str> for BadgeValidator {
    type Error = ColorValidationError;

    fn validate(&self, input: &str) -> Result<(), Self::Error> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ColorValidationError::BlankBadge);
        }

        if trimmed.chars().count() > MAX_BADGE_CHARS {
            return Err(ColorValidationError::BadgeTooLong {
                value: trimmed.to_string(),
                limit: MAX_BADGE_CHARS,
            });
        }

        Ok(())
    }
}
