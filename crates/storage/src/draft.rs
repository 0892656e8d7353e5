use serde::{Deserialize, Serialize};

use drillplan_core::plan::PlanHeader;
use drillplan_core::timeline::{Item, Section, Timeline};

/// Current draft format version. Stored bodies with any other version are
/// treated as unusable and discarded; there is no migration path.
pub const DRAFT_VERSION: u32 = 1;

/// A whole-value snapshot of in-progress edits: header fields, the timeline,
/// and the moment it was written. Replaced wholesale on every autosave,
/// removed on successful remote save or explicit discard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    /// Missing on legacy or foreign blobs, which defaults to 0 and fails
    /// the version gate.
    #[serde(default)]
    pub version: u32,
    #[serde(flatten)]
    pub header: PlanHeader,
    pub target_session_duration_minutes: u32,
    pub items: Vec<Item>,
    pub sections: Vec<Section>,
    /// Epoch milliseconds at write time.
    pub saved_at: u64,
}

impl Draft {
    pub fn new(header: PlanHeader, timeline: &Timeline, target_minutes: u32, saved_at: u64) -> Self {
        Self {
            version: DRAFT_VERSION,
            header,
            target_session_duration_minutes: target_minutes,
            items: timeline.items.clone(),
            sections: timeline.sections.clone(),
            saved_at,
        }
    }

    pub fn is_current_version(&self) -> bool {
        self.version == DRAFT_VERSION
    }

    pub fn timeline(&self) -> Timeline {
        Timeline {
            items: self.items.clone(),
            sections: self.sections.clone(),
        }
    }
}
