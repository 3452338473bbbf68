//! End-to-end processing passes against a whole campaign document.

use std::sync::Arc;

use campaign_events::{
    ActionOutcome, CampaignEvent, CampaignEventEngine, Clock, EngineConfig, EnqueueOutcome, EventAction,
    EventTrigger, ManualClock, TriggerOutcome, DEFAULT_TIMELINE_NAME, WILDCARD_EVENT_TYPE,
};
use campaign_model::{
    Act, CampaignDocument, CampaignStore, InMemoryCampaignStore, Npc, Plotline, SessionState,
    TimelineEventType,
};
use chrono::{Duration, TimeZone, Utc};
use serde_json::json;

fn campaign() -> CampaignDocument {
    let mut doc = CampaignDocument::new("phandelver", "Lost Mine of Phandelver");
    doc.add_npc(Npc::new("Sildar Hallwinter").with_id("npc_sildar").with_status("captive"));
    doc.add_npc(Npc::new("Gundren Rockseeker").with_id("npc_gundren"));
    doc
}

fn bare_engine(clock: Arc<ManualClock>) -> CampaignEventEngine {
    let config = EngineConfig::parse("[engine]\nseed_default_triggers = false").unwrap();
    CampaignEventEngine::with_clock(config, clock)
}

fn start_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2024, 6, 1, 19, 0, 0).unwrap()))
}

#[test]
fn empty_queue_returns_document_unchanged() {
    let mut engine = CampaignEventEngine::with_defaults();
    let doc = campaign();

    let out = engine.process_events(doc.clone(), &SessionState::new());
    assert_eq!(out, doc);
}

#[test]
fn disabled_updates_return_document_unchanged() {
    let mut engine = CampaignEventEngine::new(EngineConfig::disabled());
    engine.enqueue(CampaignEvent::new("plot_update", json!({})));
    engine.enqueue(CampaignEvent::new("npc_update", json!({ "status": "free" })));
    let doc = campaign();

    let out = engine.process_events(doc.clone(), &SessionState::new());
    assert_eq!(out, doc);
}

#[test]
fn higher_priority_trigger_acts_first() {
    let mut engine = bare_engine(start_clock());
    // Registered low first so ordering cannot come from registration
    engine.register_trigger(
        EventTrigger::new("five", "Priority five")
            .on_event("tally")
            .with_priority(5)
            .with_action(EventAction::update_entity("npc_gundren", json!({ "notes": "five" }))),
    );
    engine.register_trigger(
        EventTrigger::new("eight", "Priority eight")
            .on_event("tally")
            .with_priority(8)
            .with_action(EventAction::update_entity("npc_gundren", json!({ "notes": "eight" }))),
    );
    engine.enqueue(CampaignEvent::new("tally", json!({})));

    let (doc, report) = engine.process_events_with_report(campaign(), &SessionState::new());

    assert_eq!(report.fired_trigger_ids(), vec!["eight", "five"]);
    assert_eq!(doc.get_npc("npc_gundren").unwrap().notes, "five");
}

#[test]
fn cooldown_blocks_refire_until_elapsed() {
    let clock = start_clock();
    let mut engine = bare_engine(clock.clone());
    engine.register_trigger(
        EventTrigger::new("rumour", "Rumour mill")
            .on_event("tavern_visit")
            .with_cooldown(10)
            .with_action(EventAction::create_event(json!({ "name": "Rumour", "type": "social" }))),
    );
    let session = SessionState::new();

    engine.enqueue(CampaignEvent::new("tavern_visit", json!({})));
    let doc = engine.process_events(campaign(), &session);
    assert_eq!(doc.timeline().len(), 1);

    clock.advance(Duration::minutes(5));
    engine.enqueue(CampaignEvent::new("tavern_visit", json!({})));
    let (doc, report) = engine.process_events_with_report(doc, &session);
    assert_eq!(doc.timeline().len(), 1);
    assert!(matches!(report.events[0].triggers[0].outcome, TriggerOutcome::Gated(_)));

    clock.advance(Duration::minutes(6));
    engine.enqueue(CampaignEvent::new("tavern_visit", json!({})));
    let doc = engine.process_events(doc, &session);
    assert_eq!(doc.timeline().len(), 2);
}

#[test]
fn cooldown_applies_within_one_pass() {
    let mut engine = bare_engine(start_clock());
    engine.register_trigger(
        EventTrigger::new("once", "Once per ten minutes")
            .on_event("ping")
            .with_cooldown(10)
            .with_action(EventAction::create_event(json!({}))),
    );
    engine.enqueue(CampaignEvent::new("ping", json!({})));
    engine.enqueue(CampaignEvent::new("ping", json!({})));

    let doc = engine.process_events(campaign(), &SessionState::new());
    assert_eq!(doc.timeline().len(), 1);
}

#[test]
fn wildcard_trigger_matches_unregistered_type() {
    let mut engine = CampaignEventEngine::with_defaults();
    engine.register_trigger(
        EventTrigger::new("chronicle", "Chronicle everything")
            .on_event(WILDCARD_EVENT_TYPE)
            .with_action(EventAction::create_event(json!({ "type": "world" }))),
    );
    engine.enqueue(CampaignEvent::new("eclipse_begins", json!({})));

    let (doc, report) = engine.process_events_with_report(campaign(), &SessionState::new());

    assert_eq!(report.fired_trigger_ids(), vec!["chronicle"]);
    assert_eq!(doc.timeline()[0].event_type, TimelineEventType::World);
}

#[test]
fn create_event_with_empty_changes_uses_defaults() {
    let mut engine = bare_engine(start_clock());
    engine.register_trigger(
        EventTrigger::new("blank", "Blank entry")
            .on_event("note")
            .with_action(EventAction::create_event(json!({}))),
    );
    engine.enqueue(CampaignEvent::new("note", json!({})));

    let doc = engine.process_events(campaign(), &SessionState::new());

    let entry = &doc.timeline()[0];
    assert!(!entry.id.is_empty());
    assert!(entry.id.starts_with("event_"));
    assert_eq!(entry.event_type, TimelineEventType::Story);
    assert_eq!(entry.name, DEFAULT_TIMELINE_NAME);
}

#[test]
fn advance_plot_on_last_act_is_clamped() {
    let mut engine = bare_engine(start_clock());
    engine.register_trigger(
        EventTrigger::new("push", "Push the plot")
            .on_event("plot_update")
            .with_action(EventAction::advance_plot("mine")),
    );
    let mut doc = campaign();
    let mut plot = Plotline::new("mine", "Wave Echo Cave", vec![Act::new("Goblin Arrows"), Act::new("Phandalin")]);
    plot.current_act = plot.acts.len() - 1;
    doc.progression_mut().plotlines.push(plot);
    engine.enqueue(CampaignEvent::new("plot_update", json!({})));

    let (out, report) = engine.process_events_with_report(doc, &SessionState::new());

    assert_eq!(out.progression.as_ref().unwrap().plotlines[0].current_act, 1);
    let TriggerOutcome::Fired { actions } = &report.events[0].triggers[0].outcome else {
        panic!("trigger should have fired");
    };
    assert!(matches!(actions[0], Ok(ActionOutcome::Unchanged)));
}

#[test]
fn npc_status_update_appends_character_entry_only() {
    let mut engine = CampaignEventEngine::with_defaults();
    let doc = campaign();
    engine.enqueue(CampaignEvent::new("npc_update", json!({ "status": "wounded" })));

    let out = engine.process_events(doc.clone(), &SessionState::new());

    let timeline = out.timeline();
    assert_eq!(timeline.len(), 1);
    assert_eq!(timeline[0].event_type, TimelineEventType::Character);
    assert_eq!(out.npcs, doc.npcs);
}

#[test]
fn later_actions_observe_earlier_ones() {
    let mut engine = bare_engine(start_clock());
    engine.register_trigger(
        EventTrigger::new("chain", "Chain")
            .on_event("session_start")
            .with_action(EventAction::create_event(json!({ "name": "Session opened" })))
            .with_action(EventAction::advance_plot("main")),
    );
    engine.enqueue(CampaignEvent::new("session_start", json!({})));

    let (doc, report) = engine.process_events_with_report(campaign(), &SessionState::new());

    // The main plotline only exists because the first action created it
    let TriggerOutcome::Fired { actions } = &report.events[0].triggers[0].outcome else {
        panic!("trigger should have fired");
    };
    assert!(matches!(actions[1], Ok(ActionOutcome::Unchanged)));
    assert_eq!(doc.progression.as_ref().unwrap().main_plotline.current_act, 0);
}

#[test]
fn events_fold_in_enqueue_order() {
    let mut engine = bare_engine(start_clock());
    engine.register_trigger(
        EventTrigger::new("mood", "Mood from payload")
            .on_event("mood")
            .with_action(EventAction::update_entity("npc_sildar", json!({ "notes": "first" }))),
    );
    engine.register_trigger(
        EventTrigger::new("mood_late", "Mood overwrite")
            .on_event("mood_late")
            .with_action(EventAction::update_entity("npc_sildar", json!({ "notes": "second" }))),
    );
    engine.enqueue(CampaignEvent::new("mood", json!({})));
    engine.enqueue(CampaignEvent::new("mood_late", json!({})));

    let doc = engine.process_events(campaign(), &SessionState::new());
    assert_eq!(doc.get_npc("npc_sildar").unwrap().notes, "second");
}

#[test]
fn overflow_is_dropped_silently() {
    let mut engine = CampaignEventEngine::new(EngineConfig::default().with_max_events(1));

    assert_eq!(engine.enqueue(CampaignEvent::new("plot_update", json!({}))), EnqueueOutcome::Accepted);
    assert_eq!(engine.enqueue(CampaignEvent::new("plot_update", json!({}))), EnqueueOutcome::Dropped);

    let doc = engine.process_events(campaign(), &SessionState::new());
    assert_eq!(doc.timeline().len(), 1);
    assert_eq!(engine.queue().dropped(), 1);
}

#[test]
fn re_registering_resets_cooldown() {
    let clock = start_clock();
    let mut engine = bare_engine(clock.clone());
    let trigger = EventTrigger::new("bell", "Bell")
        .on_event("ring")
        .with_cooldown(60)
        .with_action(EventAction::create_event(json!({})));
    engine.register_trigger(trigger.clone());

    engine.enqueue(CampaignEvent::new("ring", json!({})));
    let doc = engine.process_events(campaign(), &SessionState::new());

    clock.advance(Duration::minutes(1));
    engine.register_trigger(trigger);
    engine.enqueue(CampaignEvent::new("ring", json!({})));
    let doc = engine.process_events(doc, &SessionState::new());

    assert_eq!(doc.timeline().len(), 2);
    assert_eq!(engine.registry().get("bell").unwrap().last_triggered, Some(clock.now()));
}

#[test]
fn process_stored_round_trips_through_store() {
    let mut store = InMemoryCampaignStore::new();
    store.create(campaign()).unwrap();
    let mut engine = CampaignEventEngine::with_defaults();
    engine.enqueue(CampaignEvent::new("plot_update", json!({ "beat": "Cragmaw Castle found" })));

    let doc = engine
        .process_stored(&mut store, "phandelver", &SessionState::new())
        .unwrap();

    assert_eq!(doc.timeline().len(), 1);
    assert_eq!(store.load("phandelver").unwrap().timeline().len(), 1);

    let missing = engine.process_stored(&mut store, "nope", &SessionState::new());
    assert!(missing.is_err());

    engine.dispose();
}
