//! World state - the campaign-wide conditions outside any single entity.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Seasons of the in-game year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    #[default]
    Spring,
    Summer,
    Autumn,
    Winter,
}

/// Weather conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Weather {
    #[default]
    Clear,
    Cloudy,
    Rainy,
    Stormy,
    Snowy,
    Foggy,
}

/// The state of the campaign world as the GM last recorded it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WorldState {
    /// In-game calendar date, kept in whatever notation the campaign uses.
    #[serde(default)]
    pub current_date: Option<String>,

    #[serde(default)]
    pub season: Season,

    #[serde(default)]
    pub weather: Weather,

    /// Global flags and variables.
    #[serde(default)]
    pub flags: HashMap<String, Value>,

    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl WorldState {
    /// Create a new empty world state.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flag(&self, name: &str) -> Option<&Value> {
        self.flags.get(name)
    }

    pub fn set_flag(&mut self, name: impl Into<String>, value: Value) {
        self.flags.insert(name.into(), value);
    }
}
