//! Built-in triggers every engine starts with.

use serde_json::{json, Value};

use super::{ConditionOperator, EventAction, EventCondition, EventTrigger};

pub const NPC_STATUS_CHANGE: &str = "npc_status_change";
pub const PLOT_PROGRESS: &str = "plot_progress";

/// Record a minor character beat whenever an NPC update carries a status.
pub fn npc_status_change() -> EventTrigger {
    EventTrigger::new(NPC_STATUS_CHANGE, "NPC Status Change")
        .with_description("Adds a timeline entry when an NPC's status changes")
        .on_event("npc_update")
        .for_entity("npc")
        .with_condition(EventCondition::entity_property(
            "status",
            ConditionOperator::Changed,
            Value::Null,
        ))
        .with_action(EventAction::create_event(json!({
            "name": "NPC Status Changed",
            "type": "character",
            "description": "An NPC's circumstances changed",
            "significance": "minor",
        })))
        .with_priority(5)
}

/// Record a major story beat for every plot update.
pub fn plot_progress() -> EventTrigger {
    EventTrigger::new(PLOT_PROGRESS, "Plot Progress")
        .with_description("Adds a timeline entry when the story moves forward")
        .on_event("plot_update")
        .for_entity("plotline")
        .with_action(EventAction::create_event(json!({
            "name": "Plot Progress",
            "type": "story",
            "description": "The story moved forward",
            "significance": "major",
        })))
        .with_priority(8)
}

/// All built-in triggers, in registration order.
pub fn default_triggers() -> Vec<EventTrigger> {
    vec![npc_status_change(), plot_progress()]
}
