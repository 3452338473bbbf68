//! Selects the triggers an event wakes up, in firing order.

use crate::events::CampaignEvent;
use crate::triggers::TriggerRegistry;

/// A trigger selected for an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerMatch {
    /// Registration slot in the registry.
    pub slot: usize,
    pub trigger_id: String,
    pub priority: i32,
}

/// Enabled triggers listening to the event's type, highest priority first.
///
/// The sort is stable, so equal priorities keep registration order.
pub fn match_triggers(registry: &TriggerRegistry, event: &CampaignEvent) -> Vec<TriggerMatch> {
    let mut matches: Vec<_> = registry
        .iter()
        .enumerate()
        .filter(|(_, trigger)| trigger.enabled && trigger.listens_to(&event.event_type))
        .map(|(slot, trigger)| TriggerMatch {
            slot,
            trigger_id: trigger.id.clone(),
            priority: trigger.priority,
        })
        .collect();

    matches.sort_by(|a, b| b.priority.cmp(&a.priority));
    matches
}
