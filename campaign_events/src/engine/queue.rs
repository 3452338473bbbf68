//! Bounded FIFO intake for events produced elsewhere.

use std::collections::VecDeque;

use crate::events::CampaignEvent;

/// Result of offering an event to the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueOutcome {
    Accepted,
    /// The queue was full; the event was discarded.
    Dropped,
}

/// In-memory queue holding at most `capacity` events.
///
/// Overflow is a silent drop: the event is discarded, nothing is returned as
/// an error, and the drop is only counted and logged.
#[derive(Debug, Clone)]
pub struct EventQueue {
    events: VecDeque<CampaignEvent>,
    capacity: usize,
    dropped: u64,
}

impl EventQueue {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: VecDeque::new(),
            capacity,
            dropped: 0,
        }
    }

    pub fn enqueue(&mut self, event: CampaignEvent) -> EnqueueOutcome {
        if self.events.len() >= self.capacity {
            self.dropped += 1;
            tracing::warn!(
                event_id = %event.id,
                event_type = %event.event_type,
                capacity = self.capacity,
                "event queue full, dropping event"
            );
            return EnqueueOutcome::Dropped;
        }
        self.events.push_back(event);
        EnqueueOutcome::Accepted
    }

    /// Take every queued event, oldest first, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<CampaignEvent> {
        self.events.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of events discarded because the queue was full.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}
