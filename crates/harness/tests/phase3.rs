use drillplan_core::ids::{DrillId, EventId, ItemId, PlanId, SectionId};
use drillplan_core::metrics::section_minutes;
use drillplan_core::plan::{PlanHeader, Visibility};
use drillplan_core::timeline::{Item, Timeline};
use drillplan_engine::{
    AUTOSAVE_DEBOUNCE_MS, Bootstrap, DragNode, DrillCatalog, EditorMode, EngineError,
    ReconcileDecision, RemoteError, RemoteItem, RemotePlan, RemoteSection,
};
use drillplan_harness::{FakeCatalog, FakePlanService, ManualClock, SharedDraftStore};
use drillplan_storage::{Draft, DraftKey, DraftStore};

fn server_plan(updated_at_ms: u64) -> RemotePlan {
    let warmup = SectionId::new();
    RemotePlan {
        id: PlanId::new(),
        header: PlanHeader {
            name: "Tuesday session".into(),
            description: "league prep".into(),
            club_id: None,
            visibility: Visibility::Private,
        },
        sections: vec![RemoteSection {
            id: warmup,
            name: "Warmup".into(),
            position: 0,
        }],
        items: vec![
            RemoteItem {
                id: ItemId::new(),
                drill_id: DrillId::new(),
                duration_minutes: 40,
                notes: None,
                section_id: Some(warmup),
                position: 0,
            },
            RemoteItem {
                id: ItemId::new(),
                drill_id: DrillId::new(),
                duration_minutes: 60,
                notes: Some("full court".into()),
                section_id: None,
                position: 1,
            },
        ],
        updated_at_ms,
    }
}

// ============================================================================
// Mount reconciliation
// ============================================================================

#[test]
fn edit_mode_without_a_draft_loads_server_state() -> Result<(), Box<dyn std::error::Error>> {
    let plan = server_plan(5_000);
    let plan_id = plan.id;
    let service = FakePlanService::with_plan(plan);
    let store = SharedDraftStore::in_memory()?;

    let bootstrap = Bootstrap::start(
        EditorMode::Edit(plan_id),
        store,
        ManualClock::new(10_000),
        &service,
    )?;
    let Bootstrap::Ready(session) = bootstrap else {
        panic!("no draft, no prompt");
    };

    assert_eq!(session.header().name, "Tuesday session");
    assert_eq!(session.timeline().items.len(), 2);
    assert_eq!(session.timeline().sections.len(), 1);
    // 100 minutes of content rounds the target up to the next half hour.
    assert_eq!(session.target_minutes(), 120);
    assert_eq!(session.last_saved_at(), None);
    assert!(!session.has_unsaved_changes());
    Ok(())
}

#[test]
fn restoring_a_newer_draft_keeps_server_item_identity() -> Result<(), Box<dyn std::error::Error>> {
    let plan = server_plan(5_000);
    let plan_id = plan.id;
    let known_item = plan.items[0].id;
    let known_drill = plan.items[0].drill_id;
    let mut service = FakePlanService::with_plan(plan);

    // The draft keeps one server item and adds one of its own.
    let mut timeline = Timeline::new();
    timeline.push_item(Item {
        instance_id: known_item,
        drill_id: known_drill,
        duration_minutes: 45,
        notes: String::new(),
        section_id: None,
    });
    let local_item = Item::new(DrillId::new(), 20);
    let local_id = local_item.instance_id;
    timeline.push_item(local_item);
    let draft = Draft::new(
        PlanHeader {
            name: "Tuesday session".into(),
            ..PlanHeader::default()
        },
        &timeline,
        90,
        6_000,
    );
    let mut store = SharedDraftStore::in_memory()?;
    store.save(&DraftKey::Edit(plan_id), &draft)?;

    let bootstrap = Bootstrap::start(
        EditorMode::Edit(plan_id),
        store.clone(),
        ManualClock::new(10_000),
        &service,
    )?;
    let Bootstrap::Prompt(prompt) = bootstrap else {
        panic!("newer draft must prompt");
    };
    assert_eq!(prompt.draft_saved_at(), 6_000);
    assert_eq!(prompt.remote_updated_at_ms(), 5_000);

    let mut session = prompt.resolve(ReconcileDecision::RestoreDraft);
    assert!(session.has_unsaved_changes());
    assert_eq!(session.timeline().items.len(), 2);

    session.save(&mut service)?;
    let saved = service.plan(plan_id).expect("update stored");
    assert_eq!(saved.items.len(), 2);
    // The retained server item updated in place; the local one was inserted
    // fresh under a server-assigned id.
    assert!(saved.items.iter().any(|i| i.id == known_item));
    assert_eq!(
        saved.items.iter().find(|i| i.id == known_item).unwrap().duration_minutes,
        45
    );
    assert!(saved.items.iter().all(|i| i.id != local_id));
    Ok(())
}

#[test]
fn choosing_server_state_drops_the_draft() -> Result<(), Box<dyn std::error::Error>> {
    let plan = server_plan(5_000);
    let plan_id = plan.id;
    let service = FakePlanService::with_plan(plan);

    let mut timeline = Timeline::new();
    timeline.push_item(Item::new(DrillId::new(), 10));
    let draft = Draft::new(PlanHeader::default(), &timeline, 90, 6_000);
    let mut store = SharedDraftStore::in_memory()?;
    store.save(&DraftKey::Edit(plan_id), &draft)?;

    let bootstrap = Bootstrap::start(
        EditorMode::Edit(plan_id),
        store.clone(),
        ManualClock::new(10_000),
        &service,
    )?;
    let Bootstrap::Prompt(prompt) = bootstrap else {
        panic!("newer draft must prompt");
    };
    let session = prompt.resolve(ReconcileDecision::UseSaved);

    assert_eq!(session.header().name, "Tuesday session");
    assert!(store.load(&DraftKey::Edit(plan_id))?.is_none());
    Ok(())
}

#[test]
fn unusable_drafts_are_treated_as_absent() -> Result<(), Box<dyn std::error::Error>> {
    let service = FakePlanService::new();

    // Unknown format version.
    let mut store = SharedDraftStore::in_memory()?;
    let mut draft = Draft::new(PlanHeader::default(), &Timeline::new(), 90, 1_000);
    draft.version = 0;
    store.save(&DraftKey::New, &draft)?;
    let bootstrap = Bootstrap::start(EditorMode::New, store, ManualClock::new(0), &service)?;
    let Bootstrap::Ready(session) = bootstrap else {
        panic!("new mode never prompts");
    };
    assert!(session.timeline().is_empty());
    assert_eq!(session.last_saved_at(), None);

    // Body that does not parse at all.
    let store = SharedDraftStore::in_memory()?;
    store.insert_raw(&DraftKey::New, "{definitely not json")?;
    let bootstrap = Bootstrap::start(EditorMode::New, store, ManualClock::new(0), &service)?;
    let Bootstrap::Ready(session) = bootstrap else {
        panic!("new mode never prompts");
    };
    assert!(session.timeline().is_empty());
    Ok(())
}

#[test]
fn same_key_writes_are_last_writer_wins() -> Result<(), Box<dyn std::error::Error>> {
    let store = SharedDraftStore::in_memory()?;
    let service = FakePlanService::new();

    let clock_a = ManualClock::new(0);
    let Bootstrap::Ready(mut a) =
        Bootstrap::start(EditorMode::New, store.clone(), clock_a.clone(), &service)?
    else {
        panic!("empty store never prompts");
    };
    let clock_b = ManualClock::new(0);
    let Bootstrap::Ready(mut b) =
        Bootstrap::start(EditorMode::New, store.clone(), clock_b.clone(), &service)?
    else {
        panic!("empty store never prompts");
    };

    a.set_name("first tab");
    clock_a.advance(AUTOSAVE_DEBOUNCE_MS);
    assert!(a.tick().is_some());

    b.set_name("second tab");
    clock_b.set(5_000);
    assert!(b.tick().is_some());

    // No merge, the later write owns the row.
    assert_eq!(store.load(&DraftKey::New)?.unwrap().header.name, "second tab");

    a.set_name("first tab again");
    clock_a.set(9_000);
    assert!(a.tick().is_some());
    assert_eq!(
        store.load(&DraftKey::New)?.unwrap().header.name,
        "first tab again"
    );
    Ok(())
}

// ============================================================================
// Remote save
// ============================================================================

#[test]
fn successful_save_clears_the_draft_and_numbers_positions()
-> Result<(), Box<dyn std::error::Error>> {
    let catalog = FakeCatalog::seeded();
    let mut service = FakePlanService::new();
    let store = SharedDraftStore::in_memory()?;
    let clock = ManualClock::new(0);
    let Bootstrap::Ready(mut session) =
        Bootstrap::start(EditorMode::New, store.clone(), clock.clone(), &service)?
    else {
        panic!("empty store never prompts");
    };

    session.set_name("Tuesday session");
    let warmup = session.add_section();
    session.rename_section(warmup, "Warmup")?;
    let pepper = session.add_item(&catalog.search("pepper")?[0]);
    session.add_item(&catalog.search("serve")?[0]);
    session.apply_drag(DragNode::Item(pepper), DragNode::Section(warmup));
    clock.advance(AUTOSAVE_DEBOUNCE_MS);
    assert!(session.tick().is_some());

    let plan_id = session.save(&mut service)?;

    let saved = service.plan(plan_id).expect("plan created");
    assert_eq!(saved.header.name, "Tuesday session");
    assert_eq!(saved.header.visibility, Visibility::Private);
    assert_eq!(saved.sections.len(), 1);
    assert_eq!(saved.sections[0].position, 0);
    assert_eq!(saved.sections[0].name, "Warmup");
    let positions: Vec<u32> = saved.items.iter().map(|i| i.position).collect();
    assert_eq!(positions, vec![0, 1]);
    assert_eq!(saved.items[0].section_id, Some(warmup));

    // The local safety net is gone once the server owns the state.
    assert!(store.load(&DraftKey::New)?.is_none());
    assert!(!session.has_unsaved_changes());
    Ok(())
}

#[test]
fn failed_save_keeps_the_draft_for_retry() -> Result<(), Box<dyn std::error::Error>> {
    let catalog = FakeCatalog::seeded();
    let mut service = FakePlanService::new();
    service.set_fail_saves(true);
    let store = SharedDraftStore::in_memory()?;
    let clock = ManualClock::new(0);
    let Bootstrap::Ready(mut session) =
        Bootstrap::start(EditorMode::New, store.clone(), clock.clone(), &service)?
    else {
        panic!("empty store never prompts");
    };

    session.set_name("Tuesday session");
    session.add_item(&catalog.search("pepper")?[0]);
    clock.advance(AUTOSAVE_DEBOUNCE_MS);
    assert!(session.tick().is_some());

    let err = session.save(&mut service).unwrap_err();
    assert!(matches!(
        err,
        EngineError::Remote(RemoteError::Unavailable(_))
    ));
    assert!(store.load(&DraftKey::New)?.is_some());

    service.set_fail_saves(false);
    let plan_id = session.save(&mut service)?;
    assert!(service.plan(plan_id).is_some());
    assert!(store.load(&DraftKey::New)?.is_none());
    Ok(())
}

#[test]
fn event_mode_saves_through_the_event_and_omits_visibility()
-> Result<(), Box<dyn std::error::Error>> {
    let catalog = FakeCatalog::seeded();
    let mut service = FakePlanService::new();
    let store = SharedDraftStore::in_memory()?;
    let event_id = EventId::new();
    let Bootstrap::Ready(mut session) = Bootstrap::start(
        EditorMode::Event(event_id),
        store.clone(),
        ManualClock::new(0),
        &service,
    )?
    else {
        panic!("empty store never prompts");
    };

    session.set_name("Match prep");
    session.set_visibility(Visibility::Public);
    session.add_item(&catalog.search("scrimmage")?[0]);

    let plan_id = session.save(&mut service)?;
    assert_eq!(service.event_plan(event_id), Some(plan_id));
    // The event owns visibility; the session's setting never travels.
    assert_eq!(
        service.plan(plan_id).unwrap().header.visibility,
        Visibility::Private
    );
    assert!(store.load(&DraftKey::Event(event_id))?.is_none());
    Ok(())
}

#[test]
fn wizard_flow_from_empty_plan_to_saved_record() -> Result<(), Box<dyn std::error::Error>> {
    let catalog = FakeCatalog::seeded();
    let mut service = FakePlanService::new();
    service.set_stamp_ms(30_000);
    let store = SharedDraftStore::in_memory()?;
    let clock = ManualClock::new(0);
    let Bootstrap::Ready(mut session) =
        Bootstrap::start(EditorMode::New, store.clone(), clock.clone(), &service)?
    else {
        panic!("empty store never prompts");
    };

    // Build the timeline the way the wizard does.
    session.set_name("Beginners Tuesday");
    let pepper = session.add_item(&catalog.search("pepper")?[0]);
    session.add_item(&catalog.search("serve")?[0]);
    assert_eq!(session.metrics().total_minutes, 25);

    let warmup = session.add_section();
    session.rename_section(warmup, "Warmup")?;
    session.apply_drag(DragNode::Item(pepper), DragNode::Section(warmup));
    assert_eq!(section_minutes(session.timeline(), warmup), 10);

    // One quiet second later the whole state is in the draft store.
    clock.advance(AUTOSAVE_DEBOUNCE_MS);
    let saved_at = session.tick().expect("autosave due");
    let draft = store.load(&DraftKey::New)?.expect("draft written");
    assert_eq!(draft.items.len(), 2);
    assert_eq!(draft.sections.len(), 1);
    assert_eq!(draft.saved_at, saved_at);

    // Committing to the server clears the safety net and the record is
    // editable afterwards.
    let plan_id = session.save(&mut service)?;
    assert!(store.load(&DraftKey::New)?.is_none());

    let bootstrap = Bootstrap::start(
        EditorMode::Edit(plan_id),
        store,
        ManualClock::new(60_000),
        &service,
    )?;
    let Bootstrap::Ready(reopened) = bootstrap else {
        panic!("no draft remains, no prompt");
    };
    assert_eq!(reopened.header().name, "Beginners Tuesday");
    assert_eq!(reopened.metrics().total_minutes, 25);
    assert_eq!(reopened.timeline().sections[0].name, "Warmup");
    assert_eq!(reopened.target_minutes(), 90);
    Ok(())
}
