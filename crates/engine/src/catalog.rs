use drillplan_core::ids::DrillId;

use crate::remote::RemoteError;

/// Fallback duration for items added from a catalog entry without a hint.
pub const DEFAULT_ITEM_MINUTES: u32 = 10;

/// A selectable catalog entity. The editor treats it as opaque apart from
/// the duration hint used to seed a new item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub drill_id: DrillId,
    pub name: String,
    pub duration_hint: Option<u32>,
}

impl CatalogEntry {
    /// Default duration for a timeline item built from this entry.
    pub fn default_minutes(&self) -> u32 {
        self.duration_hint.unwrap_or(DEFAULT_ITEM_MINUTES)
    }
}

/// The catalog/search collaborator.
pub trait DrillCatalog {
    fn search(&self, query: &str) -> Result<Vec<CatalogEntry>, RemoteError>;
}
