//! Campaign events - discrete things that happened during play.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Who produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EventSource {
    #[default]
    User,
    Ai,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EventPriority {
    Low,
    #[default]
    Medium,
    High,
}

/// A single event waiting to be folded into the campaign document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignEvent {
    pub id: String,

    /// Free-form tag such as `npc_update` or `plot_update`.
    #[serde(rename = "type")]
    pub event_type: String,

    pub timestamp: DateTime<Utc>,

    /// Event data; conditions of kind `entity_property` read its top-level keys.
    #[serde(default)]
    pub payload: Value,

    #[serde(default)]
    pub source: EventSource,

    #[serde(default)]
    pub priority: EventPriority,

    #[serde(default)]
    pub processed: bool,

    /// Snapshot of the payload before the change, for change detection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<Value>,
}

impl CampaignEvent {
    /// Create an event stamped with the current time.
    pub fn new(event_type: impl Into<String>, payload: Value) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            event_type: event_type.into(),
            timestamp: Utc::now(),
            payload,
            source: EventSource::default(),
            priority: EventPriority::default(),
            processed: false,
            previous: None,
        }
    }

    pub fn with_source(mut self, source: EventSource) -> Self {
        self.source = source;
        self
    }

    pub fn with_priority(mut self, priority: EventPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_previous(mut self, previous: Value) -> Self {
        self.previous = Some(previous);
        self
    }

    /// The payload as an object, if it is one.
    pub fn payload_fields(&self) -> Option<&Map<String, Value>> {
        self.payload.as_object()
    }
}
