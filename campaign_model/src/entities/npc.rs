//! Non-player character records.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use super::EntityId;

/// An NPC on the campaign roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Npc {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
    /// Free-form status such as "alive", "wounded" or "missing".
    #[serde(default)]
    pub status: Option<String>,
    /// Id of the location the NPC is currently at.
    #[serde(default)]
    pub location: Option<EntityId>,
    /// Attitude towards the party, -100 (hostile) to 100 (devoted).
    #[serde(default)]
    pub disposition: i32,
    #[serde(default)]
    pub notes: String,

    // GM-defined fields kept verbatim
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl Npc {
    /// Create a new NPC with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            role: None,
            status: None,
            location: None,
            disposition: 0,
            notes: String::new(),
            extra: HashMap::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<EntityId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Check if the NPC has been marked dead.
    pub fn is_dead(&self) -> bool {
        self.status.as_deref() == Some("dead")
    }
}
