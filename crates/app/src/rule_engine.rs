//! Rule engine — evaluates rules against the reading cache and drives
//! actuators through the device registry.
//!
//! The engine is stateless between ticks: every enabled rule is fully
//! re-evaluated on each call to [`RuleEngine::evaluate`]. Rules are never
//! mutated once loaded.

use chrono::{NaiveTime, Timelike};
use domotik_domain::error::DomotikError;
use domotik_domain::id::RuleId;
use domotik_domain::rule::{Action, ActionKind, Condition, Logic, Rule, Schedule};
use domotik_domain::time::Millis;

use crate::cache::ReadingCache;
use crate::registry::DeviceRegistry;

/// Rules that fired during one evaluation pass, in rule order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvaluationReport {
    /// Rules whose conditions or schedule held; their actions ran.
    pub activated: Vec<RuleId>,
    /// Rules whose deactivation conditions held; their actuators were
    /// switched off.
    pub deactivated: Vec<RuleId>,
}

/// The loaded rule set.
#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    rules: Vec<Rule>,
}

impl RuleEngine {
    /// Load a rule set.
    ///
    /// # Errors
    ///
    /// Returns a validation error if any rule is invalid.
    pub fn new(rules: Vec<Rule>) -> Result<Self, DomotikError> {
        for rule in &rules {
            rule.validate()?;
        }
        tracing::info!(
            rules = rules.len(),
            enabled = rules.iter().filter(|r| r.enabled).count(),
            "rule set loaded"
        );
        Ok(Self { rules })
    }

    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Evaluate every enabled rule once.
    ///
    /// A rule whose conditions (or schedule) hold executes its actions.
    /// Otherwise, if its deactivation conditions hold, every actuator its
    /// actions reference is switched off.
    pub fn evaluate(
        &self,
        cache: &ReadingCache,
        registry: &mut DeviceRegistry,
        now: Millis,
    ) -> EvaluationReport {
        let mut report = EvaluationReport::default();

        for rule in self.rules.iter().filter(|r| r.enabled) {
            let activate = if rule.trigger.uses_schedule() {
                evaluate_schedule(&rule.schedule, now)
            } else {
                evaluate_conditions(&rule.conditions, cache)
            };

            if activate {
                tracing::debug!(rule_id = %rule.id, rule_name = %rule.name, "rule activated");
                execute_actions(&rule.actions, registry, now);
                report.activated.push(rule.id.clone());
            } else if !rule.deactivation_conditions.is_empty()
                && evaluate_conditions(&rule.deactivation_conditions, cache)
            {
                tracing::debug!(rule_id = %rule.id, rule_name = %rule.name, "rule deactivated");
                for actuator_id in rule.actuator_ids() {
                    if let Some(actuator) = registry.actuator_mut(actuator_id.as_str()) {
                        actuator.turn_off(now);
                    }
                }
                report.deactivated.push(rule.id.clone());
            }
        }

        report
    }
}

/// Fold a condition list into one boolean.
///
/// Conditions whose sensor has no cached reading are skipped. The first
/// evaluated condition sets the result; each later one is joined with the
/// logic of the previously *evaluated* condition. An empty list is false;
/// a list where every condition was skipped is true.
#[must_use]
pub fn evaluate_conditions(conditions: &[Condition], cache: &ReadingCache) -> bool {
    if conditions.is_empty() {
        return false;
    }

    let mut result = true;
    let mut pending_logic: Option<Logic> = None;

    for condition in conditions {
        let Some(reading) = cache.get(condition.sensor_id.as_str()) else {
            tracing::trace!(%condition, "sensor unavailable, condition skipped");
            continue;
        };
        if !reading.is_valid() {
            tracing::trace!(%condition, "invalid reading, condition skipped");
            continue;
        }

        let value = reading.value(condition.parameter).unwrap_or(0.0);
        let holds = condition.holds_for(value);
        tracing::trace!(%condition, value, holds, "condition evaluated");

        result = match pending_logic {
            None => holds,
            Some(logic) => logic.combine(result, holds),
        };
        pending_logic = Some(condition.logic());
    }

    result
}

/// Uptime-based stand-in for time-of-day scheduling.
///
/// Only the `13:00`–`16:00` window is recognised: it is active while the
/// process uptime lies between 13 h and 16 h, both inclusive. Any other
/// window is never active.
#[must_use]
pub fn evaluate_schedule(schedule: &Schedule, uptime: Millis) -> bool {
    let Some((start, end)) = schedule.window() else {
        if !schedule.is_blank() {
            tracing::debug!(%schedule, "unparseable schedule bounds");
        }
        return false;
    };

    if !is_afternoon_window(start, end) {
        tracing::debug!(%schedule, "schedule window not supported without a wall clock");
        return false;
    }

    (millis_since_midnight(start)..=millis_since_midnight(end)).contains(&uptime)
}

fn is_afternoon_window(start: NaiveTime, end: NaiveTime) -> bool {
    (start.hour(), start.minute(), end.hour(), end.minute()) == (13, 0, 16, 0)
}

fn millis_since_midnight(time: NaiveTime) -> Millis {
    Millis::from(time.num_seconds_from_midnight()) * 1_000
}

/// Execute actions in order. Unknown actuators are skipped.
pub fn execute_actions(actions: &[Action], registry: &mut DeviceRegistry, now: Millis) {
    for action in actions {
        let Some(actuator) = registry.actuator_mut(action.actuator_id.as_str()) else {
            tracing::warn!(actuator_id = %action.actuator_id, %action, "unknown actuator, action skipped");
            continue;
        };

        actuator.apply(action.kind, now);
        if action.kind != ActionKind::TurnOn {
            continue;
        }

        if let Some(duration) = action.duration_ms.filter(|d| *d > 0)
            && !actuator.arm_timer(duration, now)
        {
            tracing::debug!(actuator_id = %action.actuator_id, duration, "duration dropped");
        }
        if let Some(pattern) = action.pattern
            && !actuator.play_pattern(pattern, now)
        {
            tracing::debug!(actuator_id = %action.actuator_id, %pattern, "pattern dropped");
        }
    }
}
