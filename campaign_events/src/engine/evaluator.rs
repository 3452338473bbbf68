//! Condition evaluation - the cooldown and AND-of-clauses gate in front of
//! every trigger firing.
//!
//! Operators follow loose scripting semantics so that rules written for
//! hand-edited campaign files behave predictably:
//! - `equals`: strict equality, numbers compared by value
//! - `contains`: substring test on string-coerced operands
//! - `greater_than` / `less_than`: numeric or lexicographic ordering
//! - `changed`: operand differs from `value`, a missing operand counts as null

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use std::cmp::Ordering;
use thiserror::Error;

use campaign_model::{resolve_path, SessionSnapshot};

use crate::events::CampaignEvent;
use crate::triggers::{ConditionKind, ConditionOperator, EventCondition, EventTrigger};

/// Why a matched trigger did not fire.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GateRejection {
    #[error("cooling down, {remaining_minutes:.1} minutes left")]
    CoolingDown { remaining_minutes: f64 },

    #[error("condition {index} not satisfied")]
    ConditionFailed { index: usize },
}

/// Everything a condition may read.
#[derive(Clone, Copy)]
pub struct EvaluationContext<'a> {
    pub event: &'a CampaignEvent,
    pub session: &'a dyn SessionSnapshot,
    pub now: DateTime<Utc>,
}

impl<'a> EvaluationContext<'a> {
    pub fn new(event: &'a CampaignEvent, session: &'a dyn SessionSnapshot, now: DateTime<Utc>) -> Self {
        Self { event, session, now }
    }
}

/// Decide whether a matched trigger may fire.
pub fn gate(trigger: &EventTrigger, ctx: &EvaluationContext<'_>) -> Result<(), GateRejection> {
    check_cooldown(trigger, ctx.now)?;
    evaluate_all(&trigger.conditions, ctx).map_err(|index| GateRejection::ConditionFailed { index })
}

/// Reject while fewer than `cooldown_minutes` have passed since the last firing.
pub fn check_cooldown(trigger: &EventTrigger, now: DateTime<Utc>) -> Result<(), GateRejection> {
    let (Some(cooldown), Some(last)) = (trigger.cooldown_minutes, trigger.last_triggered) else {
        return Ok(());
    };

    let elapsed_minutes = (now - last).num_milliseconds() as f64 / 60_000.0;
    let cooldown = f64::from(cooldown);
    if elapsed_minutes < cooldown {
        return Err(GateRejection::CoolingDown {
            remaining_minutes: cooldown - elapsed_minutes,
        });
    }
    Ok(())
}

/// AND over `conditions`; yields the index of the first clause that fails.
pub fn evaluate_all(conditions: &[EventCondition], ctx: &EvaluationContext<'_>) -> Result<(), usize> {
    match conditions.iter().position(|c| !evaluate(c, ctx)) {
        Some(index) => Err(index),
        None => Ok(()),
    }
}

/// Evaluate one clause, applying its `negate` flag.
pub fn evaluate(condition: &EventCondition, ctx: &EvaluationContext<'_>) -> bool {
    let result = match condition.kind {
        ConditionKind::EntityProperty | ConditionKind::SessionState => {
            let actual = operand(condition.kind, &condition.target, ctx);
            match condition.operator {
                ConditionOperator::ChangedFromPrevious => {
                    changed_from_previous(condition, actual.as_ref(), ctx.event)
                }
                operator => compare(operator, actual.as_ref(), &condition.value),
            }
        }
        ConditionKind::TimeBased => time_condition(condition, ctx.now),
        ConditionKind::Complex | ConditionKind::Unknown => true,
    };

    result != condition.negate
}

fn operand(kind: ConditionKind, target: &str, ctx: &EvaluationContext<'_>) -> Option<Value> {
    match kind {
        ConditionKind::EntityProperty => ctx
            .event
            .payload_fields()
            .and_then(|fields| fields.get(target))
            .cloned(),
        ConditionKind::SessionState => ctx.session.resolve(target),
        ConditionKind::TimeBased | ConditionKind::Complex | ConditionKind::Unknown => None,
    }
}

fn changed_from_previous(condition: &EventCondition, actual: Option<&Value>, event: &CampaignEvent) -> bool {
    let Some(previous) = &event.previous else {
        return false;
    };
    let before = match condition.kind {
        ConditionKind::EntityProperty => previous.as_object().and_then(|f| f.get(&condition.target)),
        _ => resolve_path(previous, &condition.target),
    };

    match (actual, before) {
        (None, None) => false,
        (Some(a), Some(b)) => !strict_equals(a, b),
        _ => true,
    }
}

fn time_condition(condition: &EventCondition, now: DateTime<Utc>) -> bool {
    let wanted = match condition.operator {
        ConditionOperator::GreaterThan => Ordering::Greater,
        ConditionOperator::LessThan => Ordering::Less,
        _ => return true,
    };
    match parse_timestamp(&condition.value) {
        Some(at) => now.cmp(&at) == wanted,
        None => false,
    }
}

/// Accepts RFC 3339 strings, `YYYY-MM-DD` dates and epoch milliseconds.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .map(|t| t.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
                    .map(|t| t.and_utc())
            }),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .and_then(DateTime::<Utc>::from_timestamp_millis),
        _ => None,
    }
}

/// Apply a value operator. `actual` is `None` when the operand is missing.
pub fn compare(operator: ConditionOperator, actual: Option<&Value>, expected: &Value) -> bool {
    match operator {
        ConditionOperator::Equals => actual.is_some_and(|a| strict_equals(a, expected)),
        ConditionOperator::Contains => coerce_string(actual).contains(&coerce_string(Some(expected))),
        ConditionOperator::GreaterThan => loose_cmp(actual, expected) == Some(Ordering::Greater),
        ConditionOperator::LessThan => loose_cmp(actual, expected) == Some(Ordering::Less),
        ConditionOperator::Changed => !strict_equals(actual.unwrap_or(&Value::Null), expected),
        // Needs the event's previous snapshot; see `changed_from_previous`.
        ConditionOperator::ChangedFromPrevious => false,
        ConditionOperator::Unknown => true,
    }
}

fn strict_equals(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

fn loose_cmp(actual: Option<&Value>, expected: &Value) -> Option<Ordering> {
    match (actual, expected) {
        (Some(Value::String(a)), Value::String(b)) => Some(a.cmp(b)),
        _ => coerce_number(actual).partial_cmp(&coerce_number(Some(expected))),
    }
}

fn coerce_number(value: Option<&Value>) -> f64 {
    match value {
        None => f64::NAN,
        Some(Value::Null) => 0.0,
        Some(Value::Bool(b)) => f64::from(u8::from(*b)),
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(s)) if s.trim().is_empty() => 0.0,
        Some(Value::String(s)) => s.trim().parse().unwrap_or(f64::NAN),
        Some(Value::Array(_)) | Some(Value::Object(_)) => f64::NAN,
    }
}

fn coerce_string(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(Value::Null) => "null".to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => coerce_string(Some(other)),
            })
            .collect::<Vec<_>>()
            .join(","),
        Some(Value::Object(_)) => "[object Object]".to_string(),
    }
}
