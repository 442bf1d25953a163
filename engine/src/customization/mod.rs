//! Persistence of literal colors in the host's color customization section.
//!
//! - [`store`] - the host seam ([`CustomizationStore`]) and scope selection types
//! - [`adapter`] - idempotent read-modify-write of the engine's two dedicated tokens
//! - [`memory`] - an in-memory host used by tests and embedders

pub mod adapter;
pub mod memory;
pub mod store;

pub use adapter::{CustomizationAdapter, LiteralChange};
pub use memory::MemoryConfiguration;
pub use store::{ConfigTarget, CustomizationSection, CustomizationStore};
