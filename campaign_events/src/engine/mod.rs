//! The campaign event engine - folds queued events into the campaign document.
//!
//! One processing pass works as follows:
//! 1. **Drain**: take every queued event, oldest first
//! 2. **Match**: pick enabled triggers listening to the event type, by priority
//! 3. **Gate**: check cooldown, then AND the trigger's conditions
//! 4. **Execute**: apply the trigger's actions in order to the working document
//! 5. **Stamp**: record the firing time on the trigger
//!
//! Failures inside a pass never reach the caller. They are logged and kept in
//! the [`ProcessReport`] so a live session is never interrupted.

mod evaluator;
mod executor;
mod matcher;
mod queue;

pub use evaluator::*;
pub use executor::*;
pub use matcher::*;
pub use queue::*;

use std::sync::Arc;

use campaign_model::{CampaignDocument, CampaignStore, SessionSnapshot, StoreError};

use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::events::CampaignEvent;
use crate::triggers::{EventAction, EventTrigger, TriggerRegistry};

/// Result of running one action.
pub type ActionResult = Result<ActionOutcome, ActionError>;

/// What happened to one matched trigger.
#[derive(Debug)]
pub enum TriggerOutcome {
    /// Gates passed; one result per action, in order.
    Fired { actions: Vec<ActionResult> },
    /// Matched but held back by cooldown or conditions.
    Gated(GateRejection),
}

#[derive(Debug)]
pub struct TriggerReport {
    pub trigger_id: String,
    pub outcome: TriggerOutcome,
}

/// Everything one event caused. `triggers` is empty when nothing matched.
#[derive(Debug)]
pub struct EventReport {
    /// The drained event, marked processed.
    pub event: CampaignEvent,
    pub triggers: Vec<TriggerReport>,
}

impl EventReport {
    pub fn fired(&self) -> impl Iterator<Item = &TriggerReport> {
        self.triggers
            .iter()
            .filter(|t| matches!(t.outcome, TriggerOutcome::Fired { .. }))
    }
}

/// Record of a processing pass.
#[derive(Debug, Default)]
pub struct ProcessReport {
    pub events: Vec<EventReport>,
    /// Set when the pass returned early without draining the queue.
    pub skipped: bool,
}

impl ProcessReport {
    fn skipped() -> Self {
        Self {
            events: Vec::new(),
            skipped: true,
        }
    }

    /// Ids of triggers that fired, in firing order.
    pub fn fired_trigger_ids(&self) -> Vec<&str> {
        self.events
            .iter()
            .flat_map(|e| e.fired())
            .map(|t| t.trigger_id.as_str())
            .collect()
    }
}

/// Rules engine for one play session.
///
/// Owns the event queue, the trigger registry and the cooldown state. Create
/// one when a session starts and [`dispose`](Self::dispose) it when it ends.
pub struct CampaignEventEngine {
    config: EngineConfig,
    queue: EventQueue,
    registry: TriggerRegistry,
    clock: Arc<dyn Clock>,
}

impl CampaignEventEngine {
    /// Create an engine using the system clock.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: EngineConfig, clock: Arc<dyn Clock>) -> Self {
        let mut registry = if config.engine.seed_default_triggers {
            TriggerRegistry::with_defaults()
        } else {
            TriggerRegistry::new()
        };
        for trigger in &config.triggers {
            registry.register(trigger.clone());
        }

        Self {
            queue: EventQueue::with_capacity(config.engine.max_events_per_session),
            registry,
            clock,
            config,
        }
    }

    /// Create an engine with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(EngineConfig::default())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Queue an event for the next processing pass.
    pub fn enqueue(&mut self, event: CampaignEvent) -> EnqueueOutcome {
        self.queue.enqueue(event)
    }

    /// Add or replace a trigger.
    pub fn register_trigger(&mut self, trigger: EventTrigger) -> Option<EventTrigger> {
        self.registry.register(trigger)
    }

    pub fn registry(&self) -> &TriggerRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut TriggerRegistry {
        &mut self.registry
    }

    pub fn queue(&self) -> &EventQueue {
        &self.queue
    }

    /// Fold every queued event into `document` and return the result.
    pub fn process_events(
        &mut self,
        document: CampaignDocument,
        session: &dyn SessionSnapshot,
    ) -> CampaignDocument {
        self.process_events_with_report(document, session).0
    }

    /// Like [`process_events`](Self::process_events), also returning what
    /// each event matched, what was gated, and what every action did.
    pub fn process_events_with_report(
        &mut self,
        document: CampaignDocument,
        session: &dyn SessionSnapshot,
    ) -> (CampaignDocument, ProcessReport) {
        if !self.config.engine.auto_updates {
            tracing::trace!("automatic updates disabled, skipping pass");
            return (document, ProcessReport::skipped());
        }
        if self.queue.is_empty() {
            return (document, ProcessReport::skipped());
        }

        let mut document = document;
        let mut report = ProcessReport::default();

        for mut event in self.queue.drain() {
            let triggers = self.process_event(&event, &mut document, session);
            event.processed = true;
            report.events.push(EventReport { event, triggers });
        }

        tracing::debug!(
            events = report.events.len(),
            fired = report.fired_trigger_ids().len(),
            "processing pass complete"
        );
        (document, report)
    }

    fn process_event(
        &mut self,
        event: &CampaignEvent,
        document: &mut CampaignDocument,
        session: &dyn SessionSnapshot,
    ) -> Vec<TriggerReport> {
        let mut reports = Vec::new();

        for matched in match_triggers(&self.registry, event) {
            let Some(trigger) = self.registry.at(matched.slot) else {
                continue;
            };
            let now = self.clock.now();
            let ctx = EvaluationContext::new(event, session, now);

            if let Err(rejection) = gate(trigger, &ctx) {
                tracing::debug!(
                    trigger_id = %trigger.id,
                    event_id = %event.id,
                    %rejection,
                    "trigger gated"
                );
                reports.push(TriggerReport {
                    trigger_id: matched.trigger_id,
                    outcome: TriggerOutcome::Gated(rejection),
                });
                continue;
            }

            let actions = trigger
                .actions
                .iter()
                .map(|action| run_action(action, document, &ctx, &trigger.id))
                .collect();

            tracing::info!(trigger_id = %trigger.id, event_id = %event.id, "trigger fired");
            self.registry.mark_triggered(matched.slot, now);
            reports.push(TriggerReport {
                trigger_id: matched.trigger_id,
                outcome: TriggerOutcome::Fired { actions },
            });
        }

        reports
    }

    /// Load a campaign from `store`, run a processing pass, and save it back.
    ///
    /// Store errors are the only errors this engine surfaces.
    pub fn process_stored(
        &mut self,
        store: &mut dyn CampaignStore,
        campaign_id: &str,
        session: &dyn SessionSnapshot,
    ) -> Result<CampaignDocument, StoreError> {
        let document = store.load(campaign_id)?;
        let (document, report) = self.process_events_with_report(document, session);
        if !report.skipped {
            store.save(document.clone())?;
        }
        Ok(document)
    }

    /// End the session, discarding queued events and cooldown state.
    pub fn dispose(self) {
        if !self.queue.is_empty() {
            tracing::debug!(pending = self.queue.len(), "engine disposed with queued events");
        }
    }
}

fn run_action(
    action: &EventAction,
    document: &mut CampaignDocument,
    ctx: &EvaluationContext<'_>,
    trigger_id: &str,
) -> ActionResult {
    if let Err(condition) = evaluate_all(&action.conditions, ctx) {
        return Ok(ActionOutcome::Skipped { condition });
    }

    let result = apply(action, document, ctx.now);
    if let Err(error) = &result {
        tracing::debug!(trigger_id, kind = ?action.kind, %error, "action not applied");
    }
    result
}
