//! # initdeco
//!
//! Terminal host for the initdeco engine. It plays the part an editor would:
//! settings live in JSON files, decorations are printed as colored lines and
//! file changes come from a polling watcher.
//!
//! ## Modules
//!
//! - [`config`] - `initdeco.toml` and `INITDECO__*` environment overrides
//! - [`logger`] - `fern` dispatcher setup
//! - [`settings_file`] - JSON settings store implementing both engine seams
//! - [`render`] - token handles to terminal colors
//! - [`commands`] - `list`, `watch`, `set` and `show`
//! - [`error`] - host error type

pub mod commands;
pub mod config;
pub mod error;
pub mod logger;
pub mod render;
pub mod settings_file;

pub use error::{AppError, AppResult};
