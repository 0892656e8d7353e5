use drillplan_core::ids::{EventId, PlanId};

const KEY_NEW: &str = "training-plan-draft-new";
const KEY_EDIT_PREFIX: &str = "training-plan-draft-edit-";
const KEY_EVENT_PREFIX: &str = "training-plan-draft-event-";

/// Selects the store row a draft lives under. One row per editing context:
/// the single new-plan slot, one per plan being edited, one per event a plan
/// is being built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftKey {
    New,
    Edit(PlanId),
    Event(EventId),
}

impl DraftKey {
    pub fn as_store_key(&self) -> String {
        match self {
            Self::New => KEY_NEW.to_string(),
            Self::Edit(id) => format!("{KEY_EDIT_PREFIX}{id}"),
            Self::Event(id) => format!("{KEY_EVENT_PREFIX}{id}"),
        }
    }
}
