//! Derived session metrics. Everything here is recomputed from scratch on
//! each call; there is no cached state to go stale.

use crate::ids::{ItemId, SectionId};
use crate::timeline::Timeline;

/// Minutes elapsed before the given item starts: the sum of durations of all
/// items strictly before it in flat order, regardless of grouping.
pub fn cumulative_minutes(timeline: &Timeline, id: ItemId) -> Option<u32> {
    let index = timeline.item_index(id)?;
    Some(
        timeline.items[..index]
            .iter()
            .map(|i| i.duration_minutes)
            .sum(),
    )
}

/// Total minutes of items assigned to the given section.
pub fn section_minutes(timeline: &Timeline, id: SectionId) -> u32 {
    timeline
        .items
        .iter()
        .filter(|i| i.section_id == Some(id))
        .map(|i| i.duration_minutes)
        .sum()
}

/// Total minutes across all items, grouped or not.
pub fn session_minutes(timeline: &Timeline) -> u32 {
    timeline.items.iter().map(|i| i.duration_minutes).sum()
}

pub fn is_overtime(timeline: &Timeline, target_minutes: u32) -> bool {
    session_minutes(timeline) > target_minutes
}

/// Aggregate snapshot for the session overview bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionMetrics {
    pub total_minutes: u32,
    pub target_minutes: u32,
    pub overtime: bool,
    /// Fill level of the progress bar, capped at 100.
    pub progress_percent: u32,
}

impl SessionMetrics {
    pub fn compute(timeline: &Timeline, target_minutes: u32) -> Self {
        let total_minutes = session_minutes(timeline);
        let progress_percent = if target_minutes == 0 {
            100
        } else {
            ((total_minutes * 100) / target_minutes).min(100)
        };
        Self {
            total_minutes,
            target_minutes,
            overtime: total_minutes > target_minutes,
            progress_percent,
        }
    }
}
