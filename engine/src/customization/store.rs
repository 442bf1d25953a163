use crate::error::StoreError;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::fmt;

/// Token name to literal color mapping, as stored by the host.
pub type CustomizationSection = Map<String, Value>;

/// Configuration scope a customization write lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigTarget {
    /// User-level settings, used when no workspace is open.
    Global,
    /// Settings of the currently open workspace.
    Workspace,
}

impl fmt::Display for ConfigTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigTarget::Global => write!(f, "global"),
            ConfigTarget::Workspace => write!(f, "workspace"),
        }
    }
}

/// Host-owned color customization section.
///
/// The section is shared with other consumers. Implementations must store
/// exactly what they are given: the engine performs read-modify-write on the
/// whole section and relies on unrelated keys surviving the round trip.
#[async_trait]
pub trait CustomizationStore: Send + Sync {
    /// Whether any workspace folder is open at the moment of the call.
    fn has_workspace(&self) -> bool;

    /// Current section in `target`, or `None` when the section is absent.
    async fn read_customizations(
        &self,
        target: ConfigTarget,
    ) -> Result<Option<CustomizationSection>, StoreError>;

    /// Replace the section in `target`. `None` clears the section entirely.
    async fn write_customizations(
        &self,
        target: ConfigTarget,
        section: Option<CustomizationSection>,
    ) -> Result<(), StoreError>;
}
