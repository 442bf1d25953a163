//! # initdeco Engine
//!
//! Core library that decorates `__init__.py` files with a color reflecting
//! whether they are empty. It sits between three host-supplied surfaces (a
//! configuration store, a file watcher and a rendering layer that asks for
//! decorations) and keeps the answers cheap and current.
//!
//! ## Modules
//!
//! - [`color`] - Classification of color settings and resolution into token handles
//! - [`customization`] - Idempotent persistence of literal colors in the host store
//! - [`settings`] - The host configuration seam and the engine's settings snapshot
//! - [`inspector`] - File emptiness checks
//! - [`cache`] - Last known emptiness per file
//! - [`provider`] - Decoration queries and refresh broadcasts
//! - [`watch`] - File-change notifications, including a polling watcher
//! - [`lifecycle`] - Activation, change coordination and teardown
//! - [`error`] - Error types shared by all modules
//!
//! ## Data flow
//!
//! ```text
//! watch events / config changes
//!         │
//!         ▼
//!   Colorizer (lifecycle) ──► ColorResolver ──► CustomizationAdapter ──► host store
//!         │
//!         ▼
//!   DecorationProvider ──► EmptinessCache ──miss──► FileInspector
//!         │
//!         └── RefreshEvent ──► host re-queries decorations
//! ```

pub mod cache;
pub mod color;
pub mod constants;
pub mod customization;
pub mod error;
pub mod inspector;
pub mod lifecycle;
pub mod provider;
pub mod settings;
pub mod validation;
pub mod watch;

pub use color::{ColorResolver, ColorVariant, ResolvedColor};
pub use error::{EngineError, EngineResult, StoreError, WatchError};
pub use lifecycle::{Colorizer, HostServices};
pub use provider::{Decoration, DecorationProvider, DecorationStyle, RefreshEvent};
