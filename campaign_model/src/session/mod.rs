//! Session state - the ephemeral context of one sitting at the table.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Read-only view of session state, addressed by dot-path.
pub trait SessionSnapshot {
    /// Resolve a dot-separated path such as `scene.mood` or
    /// `active_characters.0`. Missing segments yield `None`.
    fn resolve(&self, path: &str) -> Option<Value>;
}

impl SessionSnapshot for Value {
    fn resolve(&self, path: &str) -> Option<Value> {
        resolve_path(self, path).cloned()
    }
}

/// Walk `path` through nested objects and arrays.
pub fn resolve_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(root, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// What is happening at the table right now.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SessionState {
    #[serde(default)]
    pub active_characters: Vec<String>,
    #[serde(default)]
    pub current_location: Option<String>,
    /// Short descriptions of what just happened, newest last.
    #[serde(default)]
    pub recent_events: Vec<String>,
    #[serde(default)]
    pub scene: HashMap<String, Value>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl SessionSnapshot for SessionState {
    fn resolve(&self, path: &str) -> Option<Value> {
        let root = self.to_value();
        resolve_path(&root, path).cloned()
    }
}
