use std::collections::BTreeSet;

use drillplan_core::ids::{EventId, ItemId, PlanId, SectionId};
use drillplan_core::metrics::SessionMetrics;
use drillplan_core::palette;
use drillplan_core::plan::{PlanHeader, Visibility};
use drillplan_core::time::Clock;
use drillplan_core::timeline::{Item, Section, Timeline};
use drillplan_storage::{Draft, DraftKey, DraftStore};

use crate::autosave::Debounce;
use crate::catalog::CatalogEntry;
use crate::error::EngineError;
use crate::remote::{PlanService, SaveItem, SavePlanRequest, SaveSection};
use crate::reorder::{self, DragNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    New,
    Edit(PlanId),
    Event(EventId),
}

impl EditorMode {
    pub fn draft_key(&self) -> DraftKey {
        match self {
            Self::New => DraftKey::New,
            Self::Edit(id) => DraftKey::Edit(*id),
            Self::Event(id) => DraftKey::Event(*id),
        }
    }
}

/// Item-level handling when a non-empty section is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadePolicy {
    /// Clear the items' section references, demoting them to ungrouped.
    KeepItems,
    /// Remove the items from the timeline entirely.
    DeleteItems,
}

/// Outcome of asking for a section deletion. Empty sections go immediately;
/// non-empty ones come back for an explicit cascade choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionDelete {
    Removed,
    NeedsChoice { item_count: usize },
}

/// One editing session: the single owner of the timeline model. Every
/// mutation flows through here, restarts the autosave window, and leaves the
/// model in an invariant-preserving state. Collapse state is ephemeral view
/// bookkeeping and never reaches the draft.
#[derive(Debug)]
pub struct EditorSession<S, C> {
    mode: EditorMode,
    key: DraftKey,
    store: S,
    clock: C,
    header: PlanHeader,
    target_minutes: u32,
    timeline: Timeline,
    collapsed: BTreeSet<SectionId>,
    debounce: Debounce,
    last_saved_at: Option<u64>,
    has_unsaved_changes: bool,
    /// Item ids the server already knows, so a save can tell updates from
    /// inserts. Empty outside edit mode.
    persisted_items: BTreeSet<ItemId>,
}

impl<S: DraftStore, C: Clock> EditorSession<S, C> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        mode: EditorMode,
        store: S,
        clock: C,
        header: PlanHeader,
        target_minutes: u32,
        timeline: Timeline,
        last_saved_at: Option<u64>,
        has_unsaved_changes: bool,
        persisted_items: BTreeSet<ItemId>,
    ) -> Self {
        Self {
            key: mode.draft_key(),
            mode,
            store,
            clock,
            header,
            target_minutes,
            timeline,
            collapsed: BTreeSet::new(),
            debounce: Debounce::default(),
            last_saved_at,
            has_unsaved_changes,
            persisted_items,
        }
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn header(&self) -> &PlanHeader {
        &self.header
    }

    pub fn target_minutes(&self) -> u32 {
        self.target_minutes
    }

    pub fn metrics(&self) -> SessionMetrics {
        SessionMetrics::compute(&self.timeline, self.target_minutes)
    }

    pub fn last_saved_at(&self) -> Option<u64> {
        self.last_saved_at
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.has_unsaved_changes
    }

    /// Restarts the autosave quiet period. Called by every model mutation.
    fn touch(&mut self) {
        self.debounce.bump(self.clock.now_ms());
    }

    // ------------------------------------------------------------------
    // Header edits
    // ------------------------------------------------------------------

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.header.name = name.into();
        self.touch();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.header.description = description.into();
        self.touch();
    }

    pub fn set_club(&mut self, club_id: Option<drillplan_core::ids::ClubId>) {
        self.header.club_id = club_id;
        self.touch();
    }

    pub fn set_visibility(&mut self, visibility: Visibility) {
        self.header.visibility = visibility;
        self.touch();
    }

    pub fn set_target_minutes(&mut self, minutes: u32) {
        self.target_minutes = minutes.max(1);
        self.touch();
    }

    // ------------------------------------------------------------------
    // Item edits
    // ------------------------------------------------------------------

    /// Adds a catalog entry to the end of the timeline, ungrouped, seeded
    /// with the entry's duration hint.
    pub fn add_item(&mut self, entry: &CatalogEntry) -> ItemId {
        let item = Item::new(entry.drill_id, entry.default_minutes());
        let id = item.instance_id;
        self.timeline.push_item(item);
        self.touch();
        id
    }

    pub fn remove_item(&mut self, id: ItemId) -> Result<(), EngineError> {
        self.timeline.remove_item(id)?;
        self.persisted_items.remove(&id);
        self.touch();
        Ok(())
    }

    pub fn set_item_duration(&mut self, id: ItemId, minutes: u32) -> Result<(), EngineError> {
        self.timeline.set_item_duration(id, minutes)?;
        self.touch();
        Ok(())
    }

    pub fn set_item_notes(&mut self, id: ItemId, notes: impl Into<String>) -> Result<(), EngineError> {
        self.timeline.set_item_notes(id, notes)?;
        self.touch();
        Ok(())
    }

    /// Keyboard-style move, one slot up or down.
    pub fn move_item_step(&mut self, id: ItemId, delta: isize) -> Result<bool, EngineError> {
        let moved = self.timeline.move_item_step(id, delta)?;
        if moved {
            self.touch();
        }
        Ok(moved)
    }

    /// Applies a drag gesture. Returns whether the model changed.
    pub fn apply_drag(&mut self, dragged: DragNode, target: DragNode) -> bool {
        let next = reorder::apply_drag(&self.timeline, dragged, target);
        if next == self.timeline {
            return false;
        }
        self.timeline = next;
        self.touch();
        true
    }

    // ------------------------------------------------------------------
    // Section lifecycle
    // ------------------------------------------------------------------

    /// Appends a section with an auto-generated name and the next palette
    /// color in round-robin order.
    pub fn add_section(&mut self) -> SectionId {
        let index = self.timeline.sections.len();
        let section = Section {
            id: SectionId::new(),
            name: format!("Section {}", index + 1),
            color: palette::color_at(index).to_string(),
        };
        let id = section.id;
        self.timeline.push_section(section);
        self.touch();
        id
    }

    pub fn rename_section(&mut self, id: SectionId, name: impl Into<String>) -> Result<(), EngineError> {
        self.timeline.rename_section(id, name)?;
        self.touch();
        Ok(())
    }

    /// First half of the two-step delete: empty sections are removed on the
    /// spot; non-empty ones report how many items hang off them so the
    /// caller can ask for a cascade decision.
    pub fn request_remove_section(&mut self, id: SectionId) -> Result<SectionDelete, EngineError> {
        let index = self
            .timeline
            .section_index(id)
            .ok_or_else(|| drillplan_core::CoreError::SectionNotFound(id.to_string()))?;
        let item_count = self.timeline.items_in_section(id).len();
        if item_count > 0 {
            return Ok(SectionDelete::NeedsChoice { item_count });
        }
        self.timeline.sections.remove(index);
        self.collapsed.remove(&id);
        self.touch();
        Ok(SectionDelete::Removed)
    }

    /// Second half: applies the chosen item-level mutation, then removes the
    /// section itself.
    pub fn remove_section(&mut self, id: SectionId, policy: CascadePolicy) -> Result<(), EngineError> {
        let index = self
            .timeline
            .section_index(id)
            .ok_or_else(|| drillplan_core::CoreError::SectionNotFound(id.to_string()))?;

        match policy {
            CascadePolicy::KeepItems => {
                for item in &mut self.timeline.items {
                    if item.section_id == Some(id) {
                        item.section_id = None;
                    }
                }
            }
            CascadePolicy::DeleteItems => {
                let persisted = &mut self.persisted_items;
                self.timeline.items.retain(|i| {
                    let keep = i.section_id != Some(id);
                    if !keep {
                        persisted.remove(&i.instance_id);
                    }
                    keep
                });
            }
        }

        self.timeline.sections.remove(index);
        self.collapsed.remove(&id);
        self.touch();
        Ok(())
    }

    /// View-only collapse toggle. Does not count as a model change and does
    /// not schedule an autosave.
    pub fn toggle_collapsed(&mut self, id: SectionId) {
        if !self.collapsed.remove(&id) {
            self.collapsed.insert(id);
        }
    }

    pub fn is_collapsed(&self, id: SectionId) -> bool {
        self.collapsed.contains(&id)
    }

    /// Wipes items and sections in one stroke.
    pub fn clear_all(&mut self) {
        self.timeline.clear();
        self.collapsed.clear();
        self.persisted_items.clear();
        self.touch();
    }

    // ------------------------------------------------------------------
    // Draft persistence
    // ------------------------------------------------------------------

    /// Pumps the autosave controller. When the quiet period has elapsed the
    /// full current state is written under the session's key and the write
    /// timestamp is returned. A store failure is logged and swallowed; the
    /// session keeps editing with autosave degraded for that change.
    pub fn tick(&mut self) -> Option<u64> {
        let now = self.clock.now_ms();
        if !self.debounce.due(now) {
            return None;
        }
        self.debounce.clear();

        let draft = Draft::new(self.header.clone(), &self.timeline, self.target_minutes, now);
        match self.store.save(&self.key, &draft) {
            Ok(()) => {
                self.last_saved_at = Some(now);
                self.has_unsaved_changes = true;
                tracing::debug!(key = %self.key.as_store_key(), saved_at = now, "draft autosaved");
                Some(now)
            }
            Err(e) => {
                tracing::warn!(
                    key = %self.key.as_store_key(),
                    error = %e,
                    "draft write failed, autosave skipped"
                );
                None
            }
        }
    }

    /// Explicit user-initiated discard of the stored draft.
    pub fn discard_draft(&mut self) {
        if let Err(e) = self.store.remove(&self.key) {
            tracing::warn!(key = %self.key.as_store_key(), error = %e, "failed to remove draft");
        }
        self.debounce.clear();
        self.last_saved_at = None;
        self.has_unsaved_changes = false;
    }

    // ------------------------------------------------------------------
    // Remote save
    // ------------------------------------------------------------------

    /// Persists the plan remotely. On success the local draft is cleared; on
    /// failure the error surfaces and the draft is deliberately kept so a
    /// retry can still recover the work.
    pub fn save(&mut self, service: &mut impl PlanService) -> Result<PlanId, EngineError> {
        let name = self.header.name.trim();
        if name.is_empty() {
            return Err(EngineError::EmptyPlanName);
        }

        let description = self.header.description.trim();
        let request = SavePlanRequest {
            name: name.to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            club_id: self.header.club_id,
            visibility: match self.mode {
                EditorMode::Event(_) => None,
                _ => Some(self.header.visibility),
            },
            sections: self
                .timeline
                .sections
                .iter()
                .enumerate()
                .map(|(idx, s)| SaveSection {
                    id: s.id,
                    name: s.name.clone(),
                    position: idx as u32,
                })
                .collect(),
            items: self
                .timeline
                .items
                .iter()
                .enumerate()
                .map(|(idx, i)| SaveItem {
                    id: self
                        .persisted_items
                        .contains(&i.instance_id)
                        .then_some(i.instance_id),
                    drill_id: i.drill_id,
                    section_id: i.section_id,
                    duration_minutes: i.duration_minutes,
                    notes: (!i.notes.is_empty()).then(|| i.notes.clone()),
                    position: idx as u32,
                })
                .collect(),
        };

        let plan_id = match self.mode {
            EditorMode::New => service.create(request)?,
            EditorMode::Edit(id) => service.update(id, request)?,
            EditorMode::Event(event_id) => service.create_event_plan(event_id, request)?,
        };

        self.discard_draft();
        Ok(plan_id)
    }
}

/// Human-readable age of the last draft write, for the autosave indicator.
pub fn saved_ago_label(saved_at_ms: u64, now_ms: u64) -> String {
    let seconds = now_ms.saturating_sub(saved_at_ms) / 1000;
    if seconds < 5 {
        return "just now".to_string();
    }
    if seconds < 60 {
        return format!("{seconds}s ago");
    }
    let minutes = seconds / 60;
    if minutes < 60 {
        return format!("{minutes}m ago");
    }
    format!("{}h ago", minutes / 60)
}
