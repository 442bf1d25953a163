//! Fixed names shared by the engine and every host.

/// The only filename that receives a decoration.
pub const TARGET_FILE_NAME: &str = "__init__.py";

/// Configuration section owned by the engine. Change notifications that
/// affect this section trigger color re-resolution.
pub const SETTINGS_SECTION: &str = "initdeco";

/// Setting holding the color for empty files.
pub const EMPTY_COLOR_SETTING: &str = "initdeco.emptyColor";
/// Setting holding the color for non-empty files.
pub const NON_EMPTY_COLOR_SETTING: &str = "initdeco.nonEmptyColor";
/// Optional badge text for empty files.
pub const EMPTY_BADGE_SETTING: &str = "initdeco.emptyBadge";
/// Optional badge text for non-empty files.
pub const NON_EMPTY_BADGE_SETTING: &str = "initdeco.nonEmptyBadge";

/// Host section mapping token names to literal colors.
pub const COLOR_CUSTOMIZATIONS_SECTION: &str = "workbench.colorCustomizations";

/// Dedicated token for literal empty-file colors.
pub const EMPTY_COLOR_TOKEN: &str = "initdeco.emptyInitFile";
/// Dedicated token for literal non-empty-file colors.
pub const NON_EMPTY_COLOR_TOKEN: &str = "initdeco.nonEmptyInitFile";

pub const DEFAULT_EMPTY_COLOR: &str = "#6E7681";
pub const DEFAULT_NON_EMPTY_COLOR: &str = "#3572A5";

/// Symbolic tokens used until the first successful resolution, and kept for a
/// variant whose literal could not be persisted.
pub const FALLBACK_EMPTY_TOKEN: &str = "disabledForeground";
pub const FALLBACK_NON_EMPTY_TOKEN: &str = "charts.blue";

pub const EMPTY_TOOLTIP: &str = "Empty __init__.py file";
pub const NON_EMPTY_TOOLTIP: &str = "Non-empty __init__.py file";

/// Longest badge the decoration surface accepts, in characters.
pub const MAX_BADGE_CHARS: usize = 2;
