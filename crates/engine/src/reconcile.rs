//! Editor-mount reconciliation: the one-time decision between resuming a
//! local draft and loading server truth. No draft write can happen before
//! the decision, since a session only exists once initialization is settled.

use std::collections::BTreeSet;

use drillplan_core::ids::ItemId;
use drillplan_core::metrics::session_minutes;
use drillplan_core::plan::{DEFAULT_TARGET_MINUTES, PlanHeader, suggested_target_minutes};
use drillplan_core::time::Clock;
use drillplan_core::timeline::Timeline;
use drillplan_storage::{Draft, DraftKey, DraftStore};

use crate::editor::{EditorMode, EditorSession};
use crate::error::EngineError;
use crate::remote::{PlanService, RemotePlan};

/// The user's answer to the restore prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileDecision {
    RestoreDraft,
    UseSaved,
}

/// Result of starting an editor: either the session is ready, or a local
/// draft is newer than the server record and the user must pick one.
#[derive(Debug)]
pub enum Bootstrap<S, C> {
    Ready(EditorSession<S, C>),
    Prompt(RestorePrompt<S, C>),
}

/// A pending restore decision. Holds everything needed to finish mounting
/// either way; no edits and no autosaves are possible until resolved.
#[derive(Debug)]
pub struct RestorePrompt<S, C> {
    mode: EditorMode,
    store: S,
    clock: C,
    draft: Draft,
    remote: RemotePlan,
}

impl<S: DraftStore, C: Clock> Bootstrap<S, C> {
    /// Runs reconciliation for the given editing mode. Remote fetch failures
    /// propagate to the caller; draft read problems never do.
    pub fn start(
        mode: EditorMode,
        store: S,
        clock: C,
        service: &impl PlanService,
    ) -> Result<Self, EngineError> {
        let key = mode.draft_key();
        match mode {
            EditorMode::Edit(plan_id) => {
                let remote = service.fetch(plan_id)?;
                match load_draft_lenient(&store, &key) {
                    Some(draft) if draft.saved_at > remote.updated_at_ms => {
                        Ok(Self::Prompt(RestorePrompt {
                            mode,
                            store,
                            clock,
                            draft,
                            remote,
                        }))
                    }
                    _ => {
                        // A draft no newer than the record is stale; drop it
                        // without asking.
                        let mut store = store;
                        remove_lenient(&mut store, &key);
                        Ok(Self::Ready(session_from_remote(mode, store, clock, &remote)))
                    }
                }
            }
            EditorMode::New | EditorMode::Event(_) => {
                // No remote record to compare against: a draft under the key
                // is resumed unconditionally.
                match load_draft_lenient(&store, &key) {
                    Some(draft) => Ok(Self::Ready(session_from_draft(
                        mode,
                        store,
                        clock,
                        &draft,
                        false,
                        BTreeSet::new(),
                    ))),
                    None => Ok(Self::Ready(EditorSession::from_parts(
                        mode,
                        store,
                        clock,
                        PlanHeader::default(),
                        DEFAULT_TARGET_MINUTES,
                        Timeline::new(),
                        None,
                        false,
                        BTreeSet::new(),
                    ))),
                }
            }
        }
    }
}

impl<S: DraftStore, C: Clock> RestorePrompt<S, C> {
    pub fn draft_saved_at(&self) -> u64 {
        self.draft.saved_at
    }

    pub fn remote_updated_at_ms(&self) -> u64 {
        self.remote.updated_at_ms
    }

    /// Finishes mounting with the user's choice.
    pub fn resolve(self, decision: ReconcileDecision) -> EditorSession<S, C> {
        let Self {
            mode,
            mut store,
            clock,
            draft,
            remote,
        } = self;
        match decision {
            ReconcileDecision::RestoreDraft => {
                // Items the draft shares with the server record are still
                // known server-side, so saves treat them as updates.
                let remote_ids: BTreeSet<ItemId> = remote.items.iter().map(|i| i.id).collect();
                let persisted = draft
                    .items
                    .iter()
                    .map(|i| i.instance_id)
                    .filter(|id| remote_ids.contains(id))
                    .collect();
                session_from_draft(mode, store, clock, &draft, true, persisted)
            }
            ReconcileDecision::UseSaved => {
                remove_lenient(&mut store, &mode.draft_key());
                session_from_remote(mode, store, clock, &remote)
            }
        }
    }
}

fn session_from_remote<S: DraftStore, C: Clock>(
    mode: EditorMode,
    store: S,
    clock: C,
    remote: &RemotePlan,
) -> EditorSession<S, C> {
    let timeline = remote.timeline();
    let target = suggested_target_minutes(session_minutes(&timeline));
    let persisted: BTreeSet<ItemId> = timeline.items.iter().map(|i| i.instance_id).collect();
    EditorSession::from_parts(
        mode,
        store,
        clock,
        remote.header.clone(),
        target,
        timeline,
        None,
        false,
        persisted,
    )
}

fn session_from_draft<S: DraftStore, C: Clock>(
    mode: EditorMode,
    store: S,
    clock: C,
    draft: &Draft,
    has_unsaved_changes: bool,
    persisted: BTreeSet<ItemId>,
) -> EditorSession<S, C> {
    EditorSession::from_parts(
        mode,
        store,
        clock,
        draft.header.clone(),
        draft.target_session_duration_minutes.max(1),
        draft.timeline(),
        Some(draft.saved_at),
        has_unsaved_changes,
        persisted,
    )
}

/// Reads the draft under `key`, treating every failure mode (store error,
/// parse error, unknown version) as "no draft present".
fn load_draft_lenient<S: DraftStore>(store: &S, key: &DraftKey) -> Option<Draft> {
    match store.load(key) {
        Ok(Some(draft)) if draft.is_current_version() => Some(draft),
        Ok(Some(draft)) => {
            tracing::warn!(
                key = %key.as_store_key(),
                version = draft.version,
                "draft version mismatch, ignoring"
            );
            None
        }
        Ok(None) => None,
        Err(e) => {
            tracing::warn!(key = %key.as_store_key(), error = %e, "failed to read draft, treating as absent");
            None
        }
    }
}

fn remove_lenient<S: DraftStore>(store: &mut S, key: &DraftKey) {
    if let Err(e) = store.remove(key) {
        tracing::warn!(key = %key.as_store_key(), error = %e, "failed to remove stale draft");
    }
}
