use std::collections::BTreeMap;

use drillplan_core::ids::{EventId, ItemId, PlanId};
use drillplan_core::plan::PlanHeader;
use drillplan_engine::{
    PlanService, RemoteError, RemoteItem, RemotePlan, RemoteSection, SavePlanRequest,
};

/// In-memory stand-in for the server. Accepted saves become fetchable
/// records; outages are injected by flipping `fail_saves`.
pub struct FakePlanService {
    plans: BTreeMap<PlanId, RemotePlan>,
    event_plans: BTreeMap<EventId, PlanId>,
    fail_saves: bool,
    /// `updated_at_ms` stamped onto accepted saves.
    stamp_ms: u64,
}

impl FakePlanService {
    pub fn new() -> Self {
        Self {
            plans: BTreeMap::new(),
            event_plans: BTreeMap::new(),
            fail_saves: false,
            stamp_ms: 0,
        }
    }

    pub fn with_plan(plan: RemotePlan) -> Self {
        let mut service = Self::new();
        service.insert(plan);
        service
    }

    pub fn insert(&mut self, plan: RemotePlan) {
        self.plans.insert(plan.id, plan);
    }

    pub fn set_fail_saves(&mut self, fail: bool) {
        self.fail_saves = fail;
    }

    pub fn set_stamp_ms(&mut self, ms: u64) {
        self.stamp_ms = ms;
    }

    pub fn plan(&self, id: PlanId) -> Option<&RemotePlan> {
        self.plans.get(&id)
    }

    pub fn plan_count(&self) -> usize {
        self.plans.len()
    }

    pub fn event_plan(&self, event_id: EventId) -> Option<PlanId> {
        self.event_plans.get(&event_id).copied()
    }

    fn record(&self, id: PlanId, request: SavePlanRequest) -> RemotePlan {
        RemotePlan {
            id,
            header: PlanHeader {
                name: request.name,
                description: request.description.unwrap_or_default(),
                club_id: request.club_id,
                visibility: request.visibility.unwrap_or_default(),
            },
            sections: request
                .sections
                .into_iter()
                .map(|s| RemoteSection {
                    id: s.id,
                    name: s.name,
                    position: s.position,
                })
                .collect(),
            items: request
                .items
                .into_iter()
                .map(|i| RemoteItem {
                    // New items get server-assigned ids, just like a real insert.
                    id: i.id.unwrap_or_else(ItemId::new),
                    drill_id: i.drill_id,
                    duration_minutes: i.duration_minutes,
                    notes: i.notes,
                    section_id: i.section_id,
                    position: i.position,
                })
                .collect(),
            updated_at_ms: self.stamp_ms,
        }
    }
}

impl Default for FakePlanService {
    fn default() -> Self {
        Self::new()
    }
}

impl PlanService for FakePlanService {
    fn fetch(&self, id: PlanId) -> Result<RemotePlan, RemoteError> {
        self.plans
            .get(&id)
            .cloned()
            .ok_or_else(|| RemoteError::NotFound(id.to_string()))
    }

    fn create(&mut self, request: SavePlanRequest) -> Result<PlanId, RemoteError> {
        if self.fail_saves {
            return Err(RemoteError::Unavailable("injected outage".into()));
        }
        let id = PlanId::new();
        let plan = self.record(id, request);
        self.plans.insert(id, plan);
        Ok(id)
    }

    fn update(&mut self, id: PlanId, request: SavePlanRequest) -> Result<PlanId, RemoteError> {
        if self.fail_saves {
            return Err(RemoteError::Unavailable("injected outage".into()));
        }
        if !self.plans.contains_key(&id) {
            return Err(RemoteError::NotFound(id.to_string()));
        }
        let plan = self.record(id, request);
        self.plans.insert(id, plan);
        Ok(id)
    }

    fn create_event_plan(
        &mut self,
        event_id: EventId,
        request: SavePlanRequest,
    ) -> Result<PlanId, RemoteError> {
        if self.fail_saves {
            return Err(RemoteError::Unavailable("injected outage".into()));
        }
        let id = PlanId::new();
        let plan = self.record(id, request);
        self.plans.insert(id, plan);
        self.event_plans.insert(event_id, id);
        Ok(id)
    }
}
