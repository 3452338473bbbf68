//! Timeline entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category of a timeline entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimelineEventType {
    #[default]
    Story,
    Character,
    World,
    Combat,
    Discovery,
    Social,
}

/// How much an entry matters to the campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Significance {
    #[default]
    Minor,
    Moderate,
    Major,
}

/// Something that happened in the campaign, in story order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub event_type: TimelineEventType,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    pub participants: Vec<String>,
    pub location: Option<String>,
    pub significance: Significance,
    pub plot_relevance: String,
    pub consequences: Vec<String>,
}

impl TimelineEvent {
    pub fn new(id: impl Into<String>, name: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            event_type: TimelineEventType::default(),
            description: String::new(),
            timestamp,
            participants: Vec::new(),
            location: None,
            significance: Significance::default(),
            plot_relevance: String::new(),
            consequences: Vec::new(),
        }
    }
}
