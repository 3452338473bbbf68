//! Trigger definitions - declarative rules pairing event gates with actions.
//!
//! A trigger is made of:
//! - **Event types**: which event tags it listens to (`"*"` listens to all)
//! - **Conditions**: clauses that must all hold for it to fire
//! - **Actions**: ordered mutations applied to the campaign document

mod defaults;
mod registry;

pub use defaults::*;
pub use registry::*;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Event type that matches every event.
pub const WILDCARD_EVENT_TYPE: &str = "*";

/// Where a condition reads its left-hand operand from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionKind {
    /// A top-level key of the event payload.
    EntityProperty,
    /// A dot-path into the session-state snapshot.
    SessionState,
    /// The current wall-clock time against a timestamp.
    TimeBased,
    /// Reserved; always satisfied.
    Complex,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionOperator {
    Equals,
    Contains,
    GreaterThan,
    LessThan,
    /// Holds when the operand differs from `value`. Rules usually pass
    /// `value = null`, which turns this into a presence test.
    Changed,
    /// Holds when the operand differs from the same field of the event's
    /// `previous` snapshot.
    ChangedFromPrevious,
    #[serde(other)]
    Unknown,
}

/// A single boolean clause of a trigger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventCondition {
    pub kind: ConditionKind,
    pub target: String,
    pub operator: ConditionOperator,
    /// Omitted when null, which TOML has no literal for.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub value: Value,
    #[serde(default)]
    pub negate: bool,
}

impl EventCondition {
    pub fn new(
        kind: ConditionKind,
        target: impl Into<String>,
        operator: ConditionOperator,
        value: Value,
    ) -> Self {
        Self {
            kind,
            target: target.into(),
            operator,
            value,
            negate: false,
        }
    }

    pub fn entity_property(target: impl Into<String>, operator: ConditionOperator, value: Value) -> Self {
        Self::new(ConditionKind::EntityProperty, target, operator, value)
    }

    pub fn session_state(target: impl Into<String>, operator: ConditionOperator, value: Value) -> Self {
        Self::new(ConditionKind::SessionState, target, operator, value)
    }

    pub fn time_based(operator: ConditionOperator, value: Value) -> Self {
        Self::new(ConditionKind::TimeBased, "now", operator, value)
    }

    /// Invert the clause.
    pub fn negated(mut self) -> Self {
        self.negate = !self.negate;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    UpdateEntity,
    CreateEvent,
    /// Reserved; no executor behavior yet.
    ModifyRelationship,
    /// Reserved; no executor behavior yet.
    TriggerDialogue,
    AdvancePlot,
    #[serde(other)]
    Unknown,
}

/// A declarative mutation of the campaign document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventAction {
    pub kind: ActionKind,
    /// Entity id or plotline reference, depending on the kind.
    #[serde(default)]
    pub target: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub changes: Value,
    /// Extra clauses checked right before this action runs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<EventCondition>,
}

impl EventAction {
    pub fn new(kind: ActionKind, target: impl Into<String>, changes: Value) -> Self {
        Self {
            kind,
            target: target.into(),
            changes,
            conditions: Vec::new(),
        }
    }

    pub fn update_entity(target: impl Into<String>, changes: Value) -> Self {
        Self::new(ActionKind::UpdateEntity, target, changes)
    }

    pub fn create_event(changes: Value) -> Self {
        Self::new(ActionKind::CreateEvent, "timeline", changes)
    }

    pub fn advance_plot(plotline: impl Into<String>) -> Self {
        Self::new(
            ActionKind::AdvancePlot,
            plotline,
            serde_json::json!({ "advance": true }),
        )
    }

    pub fn with_condition(mut self, condition: EventCondition) -> Self {
        self.conditions.push(condition);
        self
    }
}

/// A named rule: event-type and condition gates plus ordered actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventTrigger {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub event_types: Vec<String>,
    /// Entity categories this rule is about. Informational only.
    #[serde(default)]
    pub entity_types: Vec<String>,
    #[serde(default)]
    pub conditions: Vec<EventCondition>,
    #[serde(default)]
    pub actions: Vec<EventAction>,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    /// Higher fires first.
    #[serde(default)]
    pub priority: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooldown_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_triggered: Option<DateTime<Utc>>,
}

fn enabled_by_default() -> bool {
    true
}

impl EventTrigger {
    /// Create an enabled trigger with no gates and no actions.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            event_types: Vec::new(),
            entity_types: Vec::new(),
            conditions: Vec::new(),
            actions: Vec::new(),
            enabled: true,
            priority: 0,
            cooldown_minutes: None,
            last_triggered: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn on_event(mut self, event_type: impl Into<String>) -> Self {
        self.event_types.push(event_type.into());
        self
    }

    pub fn for_entity(mut self, entity_type: impl Into<String>) -> Self {
        self.entity_types.push(entity_type.into());
        self
    }

    pub fn with_condition(mut self, condition: EventCondition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn with_action(mut self, action: EventAction) -> Self {
        self.actions.push(action);
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_cooldown(mut self, minutes: u32) -> Self {
        self.cooldown_minutes = Some(minutes);
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Whether this trigger listens to `event_type`.
    pub fn listens_to(&self, event_type: &str) -> bool {
        self.event_types
            .iter()
            .any(|t| t == event_type || t == WILDCARD_EVENT_TYPE)
    }
}
