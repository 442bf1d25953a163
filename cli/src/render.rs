//! Terminal rendering of decorations.
//!
//! A terminal has no theme, so token handles are turned into RGB here: user
//! customizations win, then a small built-in dark palette. Unknown tokens are
//! printed without color.

use colored::Colorize;
use engine::customization::CustomizationSection;
use engine::validation::Validator;
use engine::{Decoration, ResolvedColor, color::HexColorValidator};
use serde_json::Value;

pub type Rgb = (u8, u8, u8);

/// Parse `#RRGGBB` or `#RRGGBBAA`. Alpha is ignored.
pub fn parse_hex_color(hex: &str) -> Option<Rgb> {
    if !HexColorValidator.is_valid(hex) {
        return None;
    }
    let hex = hex.trim_start_matches('#');
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

/// Built-in colors for common theme tokens
pub fn palette_color(token: &str) -> Option<Rgb> {
    let rgb = match token {
        "foreground" | "charts.foreground" => (0xCC, 0xCC, 0xCC),
        "descriptionForeground" => (0xA6, 0xA6, 0xA6),
        "disabledForeground" => (0x8C, 0x8C, 0x8C),
        "errorForeground" => (0xF4, 0x87, 0x71),
        "charts.red" | "editorError.foreground" => (0xF1, 0x4C, 0x4C),
        "charts.blue" | "editorInfo.foreground" => (0x37, 0x94, 0xFF),
        "charts.yellow" | "editorWarning.foreground" => (0xCC, 0xA7, 0x00),
        "charts.orange" => (0xD1, 0x86, 0x16),
        "charts.green" => (0x89, 0xD1, 0x85),
        "charts.purple" => (0xB1, 0x80, 0xD7),
        "gitDecoration.addedResourceForeground" => (0x81, 0xB8, 0x8B),
        "gitDecoration.modifiedResourceForeground" => (0xE2, 0xC0, 0x8D),
        "gitDecoration.deletedResourceForeground" => (0xC7, 0x4E, 0x39),
        "gitDecoration.untrackedResourceForeground" => (0x73, 0xC9, 0x91),
        "gitDecoration.ignoredResourceForeground" => (0x8C, 0x8C, 0x8C),
        _ => return None,
    };
    Some(rgb)
}

/// Renders decorated paths against a snapshot of the customization section.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    customizations: CustomizationSection,
}

impl Renderer {
    pub fn new(customizations: CustomizationSection) -> Self {
        Self { customizations }
    }

    /// RGB for a resolved handle, if one can be determined
    pub fn color_of(&self, color: &ResolvedColor) -> Option<Rgb> {
        let customized = self
            .customizations
            .get(color.token_name())
            .and_then(Value::as_str)
            .and_then(parse_hex_color);

        match color {
            ResolvedColor::Dedicated(_) => customized,
            ResolvedColor::Token(name) => customized.or_else(|| palette_color(name)),
        }
    }

    /// One line: optional badge, colored label, dimmed tooltip.
    pub fn render(&self, label: &str, decoration: &Decoration) -> String {
        let badge = match &decoration.badge {
            Some(badge) => format!("[{badge:>2}] "),
            None => String::new(),
        };
        let label = match self.color_of(&decoration.color) {
            Some((r, g, b)) => label.truecolor(r, g, b).to_string(),
            None => label.to_string(),
        };
        format!("{badge}{label}  {}", decoration.tooltip.dimmed())
    }
}
