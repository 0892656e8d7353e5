//! Interface to the remote persistence collaborator. The editor only ever
//! fetches one plan at mount and saves one plan on demand; everything else
//! about the service is out of scope.

use thiserror::Error;

use drillplan_core::ids::{DrillId, EventId, ItemId, PlanId, SectionId};
use drillplan_core::palette;
use drillplan_core::plan::{PlanHeader, Visibility};
use drillplan_core::timeline::{Item, Section, Timeline};

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("remote service unavailable: {0}")]
    Unavailable(String),

    #[error("plan not found: {0}")]
    NotFound(String),

    #[error("save rejected: {0}")]
    Rejected(String),
}

#[derive(Debug, Clone)]
pub struct RemoteSection {
    pub id: SectionId,
    pub name: String,
    pub position: u32,
}

#[derive(Debug, Clone)]
pub struct RemoteItem {
    pub id: ItemId,
    pub drill_id: DrillId,
    pub duration_minutes: u32,
    pub notes: Option<String>,
    pub section_id: Option<SectionId>,
    pub position: u32,
}

/// Server-authoritative record of a persisted plan.
#[derive(Debug, Clone)]
pub struct RemotePlan {
    pub id: PlanId,
    pub header: PlanHeader,
    pub sections: Vec<RemoteSection>,
    pub items: Vec<RemoteItem>,
    /// Last-modified timestamp, epoch milliseconds. Compared against a local
    /// draft's `saved_at` during reconciliation.
    pub updated_at_ms: u64,
}

impl RemotePlan {
    /// Builds a timeline from the persisted record: sections ordered by
    /// position with palette colors reassigned round-robin, items ordered by
    /// position. Item section references the record no longer carries a
    /// section for are cleared rather than kept dangling.
    pub fn timeline(&self) -> Timeline {
        let mut remote_sections = self.sections.clone();
        remote_sections.sort_by_key(|s| s.position);
        let sections: Vec<Section> = remote_sections
            .iter()
            .enumerate()
            .map(|(idx, s)| Section {
                id: s.id,
                name: s.name.clone(),
                color: palette::color_at(idx).to_string(),
            })
            .collect();

        let mut remote_items = self.items.clone();
        remote_items.sort_by_key(|i| i.position);
        let items: Vec<Item> = remote_items
            .into_iter()
            .map(|i| Item {
                instance_id: i.id,
                drill_id: i.drill_id,
                duration_minutes: i.duration_minutes.max(1),
                notes: i.notes.unwrap_or_default(),
                section_id: i
                    .section_id
                    .filter(|sid| sections.iter().any(|s| s.id == *sid)),
            })
            .collect();

        Timeline { items, sections }
    }
}

#[derive(Debug, Clone)]
pub struct SaveSection {
    pub id: SectionId,
    pub name: String,
    pub position: u32,
}

#[derive(Debug, Clone)]
pub struct SaveItem {
    /// Present when updating an item the server already knows.
    pub id: Option<ItemId>,
    pub drill_id: DrillId,
    pub section_id: Option<SectionId>,
    pub duration_minutes: u32,
    pub notes: Option<String>,
    pub position: u32,
}

#[derive(Debug, Clone)]
pub struct SavePlanRequest {
    pub name: String,
    pub description: Option<String>,
    pub club_id: Option<drillplan_core::ids::ClubId>,
    /// Absent when saving into an event context, where visibility is owned
    /// by the event.
    pub visibility: Option<Visibility>,
    pub sections: Vec<SaveSection>,
    pub items: Vec<SaveItem>,
}

/// The remote persistence collaborator.
pub trait PlanService {
    fn fetch(&self, id: PlanId) -> Result<RemotePlan, RemoteError>;

    fn create(&mut self, request: SavePlanRequest) -> Result<PlanId, RemoteError>;

    fn update(&mut self, id: PlanId, request: SavePlanRequest) -> Result<PlanId, RemoteError>;

    fn create_event_plan(
        &mut self,
        event_id: EventId,
        request: SavePlanRequest,
    ) -> Result<PlanId, RemoteError>;
}
