//! Trigger registry - triggers keyed by id, kept in registration order.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use super::{default_triggers, EventTrigger};

/// Keyed collection of triggers.
///
/// Iteration follows registration order, which the matcher relies on to
/// break priority ties.
#[derive(Debug, Clone, Default)]
pub struct TriggerRegistry {
    triggers: Vec<EventTrigger>,
    index: HashMap<String, usize>,
}

impl TriggerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry seeded with the built-in triggers.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for trigger in default_triggers() {
            registry.register(trigger);
        }
        registry
    }

    /// Insert or replace a trigger by id.
    ///
    /// A replaced trigger keeps its registration slot and starts with a fresh
    /// cooldown. Returns the previous definition.
    pub fn register(&mut self, mut trigger: EventTrigger) -> Option<EventTrigger> {
        trigger.last_triggered = None;
        match self.index.get(&trigger.id) {
            Some(&slot) => {
                tracing::debug!(trigger_id = %trigger.id, "trigger replaced");
                Some(std::mem::replace(&mut self.triggers[slot], trigger))
            }
            None => {
                self.index.insert(trigger.id.clone(), self.triggers.len());
                self.triggers.push(trigger);
                None
            }
        }
    }

    /// Remove a trigger by id.
    pub fn unregister(&mut self, id: &str) -> Option<EventTrigger> {
        let slot = self.index.remove(id)?;
        let removed = self.triggers.remove(slot);
        for position in self.index.values_mut() {
            if *position > slot {
                *position -= 1;
            }
        }
        Some(removed)
    }

    pub fn get(&self, id: &str) -> Option<&EventTrigger> {
        self.index.get(id).map(|&slot| &self.triggers[slot])
    }

    /// Enable or disable a trigger. Returns `false` if the id is unknown.
    pub fn set_enabled(&mut self, id: &str, enabled: bool) -> bool {
        match self.index.get(id) {
            Some(&slot) => {
                self.triggers[slot].enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// Trigger at a registration slot.
    pub fn at(&self, slot: usize) -> Option<&EventTrigger> {
        self.triggers.get(slot)
    }

    /// Stamp a firing on the trigger at `slot`.
    pub(crate) fn mark_triggered(&mut self, slot: usize, at: DateTime<Utc>) {
        if let Some(trigger) = self.triggers.get_mut(slot) {
            trigger.last_triggered = Some(at);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &EventTrigger> {
        self.triggers.iter()
    }

    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }
}
