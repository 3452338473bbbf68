//! Applies trigger actions to a working copy of the campaign document.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use campaign_model::{
    CampaignDocument, EntityKind, Progression, Significance, TimelineEvent, TimelineEventType,
};

use crate::triggers::{ActionKind, EventAction};

/// What an action did to the document.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    EntityUpdated { entity_id: String, kind: EntityKind },
    PlotAdvanced { plotline_id: String, act: usize },
    TimelineAppended { entry_id: String },
    /// The action ran but had nothing to change.
    Unchanged,
    /// A valid kind with no behavior yet.
    Reserved(ActionKind),
    /// Unrecognized kind.
    Ignored,
    /// The action's own conditions did not hold.
    Skipped { condition: usize },
}

/// Why an action could not be applied. The document is left as it was.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("no entity with id '{0}'")]
    EntityNotFound(String),

    #[error("no plotline named '{0}'")]
    PlotlineNotFound(String),

    #[error("changes must be an object, got {0}")]
    ChangesNotAnObject(&'static str),

    #[error("malformed changes: {0}")]
    MalformedChanges(#[from] serde_json::Error),
}

/// Field defaults for a `create_event` action.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TimelineDraft {
    name: Option<String>,
    #[serde(rename = "type")]
    event_type: Option<TimelineEventType>,
    description: Option<String>,
    participants: Vec<String>,
    location: Option<String>,
    significance: Option<Significance>,
    plot_relevance: Option<String>,
    consequences: Vec<String>,
    /// Plotline the entry should also be filed under.
    plotline: Option<String>,
}

pub const DEFAULT_TIMELINE_NAME: &str = "Auto-generated Event";

/// Apply one action to `document`.
pub fn apply(
    action: &EventAction,
    document: &mut CampaignDocument,
    now: DateTime<Utc>,
) -> Result<ActionOutcome, ActionError> {
    match action.kind {
        ActionKind::UpdateEntity => update_entity(&action.target, &action.changes, document),
        ActionKind::AdvancePlot => advance_plot(&action.target, &action.changes, document),
        ActionKind::CreateEvent => create_event(&action.changes, document, now),
        ActionKind::ModifyRelationship | ActionKind::TriggerDialogue => {
            Ok(ActionOutcome::Reserved(action.kind))
        }
        ActionKind::Unknown => Ok(ActionOutcome::Ignored),
    }
}

fn update_entity(
    target: &str,
    changes: &Value,
    document: &mut CampaignDocument,
) -> Result<ActionOutcome, ActionError> {
    let fields = match changes {
        Value::Object(fields) => fields,
        Value::Null => {
            return match document.locate_entity(target) {
                Some(_) => Ok(ActionOutcome::Unchanged),
                None => Err(ActionError::EntityNotFound(target.to_string())),
            };
        }
        other => return Err(ActionError::ChangesNotAnObject(json_type(other))),
    };

    match document.merge_into_entity(target, fields)? {
        Some(kind) => Ok(ActionOutcome::EntityUpdated {
            entity_id: target.to_string(),
            kind,
        }),
        None => Err(ActionError::EntityNotFound(target.to_string())),
    }
}

fn advance_plot(
    target: &str,
    changes: &Value,
    document: &mut CampaignDocument,
) -> Result<ActionOutcome, ActionError> {
    let plotline = document
        .progression
        .as_mut()
        .and_then(|p| p.plotline_mut(target))
        .ok_or_else(|| ActionError::PlotlineNotFound(target.to_string()))?;

    let requested = changes.get("advance").and_then(Value::as_bool) == Some(true);
    if requested && plotline.advance() {
        return Ok(ActionOutcome::PlotAdvanced {
            plotline_id: plotline.id.clone(),
            act: plotline.current_act,
        });
    }
    Ok(ActionOutcome::Unchanged)
}

fn create_event(
    changes: &Value,
    document: &mut CampaignDocument,
    now: DateTime<Utc>,
) -> Result<ActionOutcome, ActionError> {
    let draft: TimelineDraft = match changes {
        Value::Null => TimelineDraft::default(),
        Value::Object(_) => TimelineDraft::deserialize(changes)?,
        other => return Err(ActionError::ChangesNotAnObject(json_type(other))),
    };

    let progression = document.progression_mut();
    let id = unique_entry_id(progression, now);

    let entry = TimelineEvent {
        id: id.clone(),
        name: draft.name.unwrap_or_else(|| DEFAULT_TIMELINE_NAME.to_string()),
        event_type: draft.event_type.unwrap_or_default(),
        description: draft.description.unwrap_or_default(),
        timestamp: now,
        participants: draft.participants,
        location: draft.location,
        significance: draft.significance.unwrap_or_default(),
        plot_relevance: draft.plot_relevance.unwrap_or_default(),
        consequences: draft.consequences,
    };

    if let Some(plot) = draft.plotline.as_deref() {
        if let Some(plotline) = progression.plotline_mut(plot) {
            plotline.timeline.push(id.clone());
        }
    }
    progression.timeline.push(entry);

    Ok(ActionOutcome::TimelineAppended { entry_id: id })
}

/// `event_<epoch millis>`, suffixed when several entries share a millisecond.
fn unique_entry_id(progression: &Progression, now: DateTime<Utc>) -> String {
    let base = format!("event_{}", now.timestamp_millis());
    if !progression.has_timeline_event(&base) {
        return base;
    }
    (1u32..)
        .map(|n| format!("{}_{}", base, n))
        .find(|candidate| !progression.has_timeline_event(candidate))
        .unwrap_or(base)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
