use drillplan_core::ids::DrillId;
use drillplan_engine::{CatalogEntry, DrillCatalog, RemoteError};

/// In-memory catalog collaborator with case-insensitive substring search.
pub struct FakeCatalog {
    entries: Vec<CatalogEntry>,
}

impl FakeCatalog {
    pub fn with_entries(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// A small library of drills, one of them without a duration hint.
    pub fn seeded() -> Self {
        let entry = |name: &str, hint: Option<u32>| CatalogEntry {
            drill_id: DrillId::new(),
            name: name.to_string(),
            duration_hint: hint,
        };
        Self::with_entries(vec![
            entry("Pepper warmup", Some(10)),
            entry("Serve and receive", Some(15)),
            entry("Block footwork", None),
            entry("Six-on-six scrimmage", Some(30)),
        ])
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }
}

impl DrillCatalog for FakeCatalog {
    fn search(&self, query: &str) -> Result<Vec<CatalogEntry>, RemoteError> {
        let needle = query.to_lowercase();
        Ok(self
            .entries
            .iter()
            .filter(|e| e.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }
}
