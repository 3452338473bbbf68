//! Entity definitions for the campaign document.

mod npc;

pub use npc::*;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use uuid::Uuid;

/// Unique identifier for every entity tracked by a campaign.
///
/// Ids are plain strings so that hand-written campaign files and rule
/// targets can name entities directly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub String);

impl EntityId {
    /// Create a new random entity ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl PartialEq<str> for EntityId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

/// The collections of a campaign that hold addressable entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Npc,
    Location,
    Faction,
}

/// A place in the campaign world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl Location {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            description: String::new(),
            extra: HashMap::new(),
        }
    }
}

/// A faction or organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Faction {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl Faction {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            description: String::new(),
            extra: HashMap::new(),
        }
    }
}

/// Shallow-merge `changes` into an entity.
///
/// Top-level keys of `changes` overwrite the entity's fields; keys the entity
/// does not declare land in its flattened `extra` map. The entity is only
/// replaced when the merged value still deserializes.
pub fn merge_fields<T>(entity: &mut T, changes: &Map<String, Value>) -> Result<(), serde_json::Error>
where
    T: Serialize + DeserializeOwned,
{
    let mut value = serde_json::to_value(&*entity)?;
    if let Value::Object(fields) = &mut value {
        for (key, change) in changes {
            fields.insert(key.clone(), change.clone());
        }
    }
    *entity = serde_json::from_value(value)?;
    Ok(())
}
