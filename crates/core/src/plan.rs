use serde::{Deserialize, Serialize};

use crate::ids::ClubId;

pub const DEFAULT_TARGET_MINUTES: u32 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Visibility {
    #[default]
    Private,
    Public,
}

/// Header fields of a plan, edited alongside the timeline and carried in
/// every draft snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PlanHeader {
    pub name: String,
    pub description: String,
    #[serde(rename = "externalContextId")]
    pub club_id: Option<ClubId>,
    pub visibility: Visibility,
}

/// Suggested target session duration for a loaded plan: the item total
/// rounded up to the next half hour, never below the 90-minute default.
pub fn suggested_target_minutes(total_minutes: u32) -> u32 {
    DEFAULT_TARGET_MINUTES.max(total_minutes.div_ceil(30) * 30)
}
