//! Rule — condition / schedule → action bindings.
//!
//! Each [`Rule`] has a [`TriggerType`] that selects what is evaluated
//! (its [`Condition`] list or its [`Schedule`]), the [`Action`]s to execute
//! when that evaluation holds, and optional deactivation conditions that
//! switch the referenced actuators off again.

mod action;
mod condition;
mod schedule;

pub use action::{Action, ActionKind, BuzzerPattern};
pub use condition::{Condition, EQUALITY_TOLERANCE, Logic, Operator};
pub use schedule::Schedule;

use serde::{Deserialize, Serialize};

use crate::error::{DomotikError, ValidationError};
use crate::id::{DeviceId, RuleId};

/// What a rule evaluates each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerType {
    /// A single sensor threshold.
    #[default]
    SensorThreshold,
    /// Several conditions combined with `AND` / `OR`.
    SensorCombination,
    /// A safety-critical threshold (gas, over-current).
    CriticalEvent,
    /// The rule's schedule window.
    Schedule,
}

impl TriggerType {
    /// Whether this trigger evaluates the schedule rather than conditions.
    #[must_use]
    pub fn uses_schedule(self) -> bool {
        matches!(self, Self::Schedule)
    }
}

/// An automation rule, read-only once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub id: RuleId,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default, alias = "trigger_type")]
    pub trigger: TriggerType,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub actions: Vec<Action>,
    #[serde(default)]
    pub deactivation_conditions: Vec<Condition>,
    #[serde(default)]
    pub schedule: Schedule,
}

fn default_enabled() -> bool {
    true
}

impl Rule {
    /// Create a builder for constructing a [`Rule`].
    #[must_use]
    pub fn builder() -> RuleBuilder {
        RuleBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyId`] when `id` is empty.
    pub fn validate(&self) -> Result<(), DomotikError> {
        if self.id.is_empty() {
            return Err(ValidationError::EmptyId.into());
        }
        Ok(())
    }

    /// Actuators referenced by this rule's actions, in action order.
    pub fn actuator_ids(&self) -> impl Iterator<Item = &DeviceId> {
        self.actions.iter().map(|action| &action.actuator_id)
    }
}

/// Step-by-step builder for [`Rule`].
#[derive(Debug, Default)]
pub struct RuleBuilder {
    id: Option<RuleId>,
    name: Option<String>,
    enabled: Option<bool>,
    trigger: Option<TriggerType>,
    conditions: Vec<Condition>,
    actions: Vec<Action>,
    deactivation_conditions: Vec<Condition>,
    schedule: Option<Schedule>,
}

impl RuleBuilder {
    #[must_use]
    pub fn id(mut self, id: impl Into<RuleId>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    #[must_use]
    pub fn trigger(mut self, trigger: TriggerType) -> Self {
        self.trigger = Some(trigger);
        self
    }

    #[must_use]
    pub fn condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    #[must_use]
    pub fn action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    #[must_use]
    pub fn deactivation_condition(mut self, condition: Condition) -> Self {
        self.deactivation_conditions.push(condition);
        self
    }

    #[must_use]
    pub fn schedule(mut self, schedule: Schedule) -> Self {
        self.schedule = Some(schedule);
        self
    }

    /// Consume the builder, validate, and return a [`Rule`].
    ///
    /// # Errors
    ///
    /// Returns [`DomotikError::Validation`] if the id is missing or empty.
    pub fn build(self) -> Result<Rule, DomotikError> {
        let id = self.id.unwrap_or_else(|| RuleId::new(""));
        let rule = Rule {
            name: self.name.unwrap_or_else(|| id.to_string()),
            id,
            enabled: self.enabled.unwrap_or(true),
            trigger: self.trigger.unwrap_or_default(),
            conditions: self.conditions,
            actions: self.actions,
            deactivation_conditions: self.deactivation_conditions,
            schedule: self.schedule.unwrap_or_default(),
        };
        rule.validate()?;
        Ok(rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::Parameter;

    fn gas_alarm() -> Rule {
        Rule::builder()
            .id("gas_alarm")
            .name("Gas alarm")
            .trigger(TriggerType::CriticalEvent)
            .condition(Condition::new("gas1", Parameter::Gas, Operator::GreaterThan, 400.0))
            .action(Action::new("buzz", ActionKind::TurnOn).with_pattern(BuzzerPattern::Alarm))
            .action(Action::new("fan", ActionKind::TurnOn))
            .deactivation_condition(Condition::new(
                "gas1",
                Parameter::Gas,
                Operator::LessThan,
                200.0,
            ))
            .build()
            .unwrap()
    }

    #[test]
    fn should_build_rule_with_defaults() {
        let rule = Rule::builder().id("r").build().unwrap();
        assert!(rule.enabled);
        assert_eq!(rule.name, "r");
        assert_eq!(rule.trigger, TriggerType::SensorThreshold);
        assert!(rule.conditions.is_empty());
        assert!(rule.schedule.is_blank());
    }

    #[test]
    fn should_return_validation_error_when_id_is_missing() {
        let result = Rule::builder().name("anonymous").build();
        assert!(matches!(
            result,
            Err(DomotikError::Validation(ValidationError::EmptyId))
        ));
    }

    #[test]
    fn should_accumulate_conditions_and_actions() {
        let rule = gas_alarm();
        assert_eq!(rule.conditions.len(), 1);
        assert_eq!(rule.actions.len(), 2);
        assert_eq!(rule.deactivation_conditions.len(), 1);
    }

    #[test]
    fn should_list_referenced_actuators_in_order() {
        let rule = gas_alarm();
        let ids: Vec<&str> = rule.actuator_ids().map(DeviceId::as_str).collect();
        assert_eq!(ids, vec!["buzz", "fan"]);
    }

    #[test]
    fn should_only_use_schedule_for_schedule_trigger() {
        assert!(TriggerType::Schedule.uses_schedule());
        assert!(!TriggerType::SensorCombination.uses_schedule());
    }

    #[test]
    fn should_deserialize_rule_from_config_json() {
        let json = serde_json::json!({
            "id": "rule_3",
            "name": "Afternoon watering",
            "enabled": true,
            "trigger_type": "schedule",
            "actions": [
                { "actuator_id": "pump", "action": "turn_on", "duration": 60000 }
            ],
            "schedule": { "start_time": "13:00", "end_time": "16:00", "days": ["mon"] }
        });
        let rule: Rule = serde_json::from_value(json).unwrap();
        assert_eq!(rule.trigger, TriggerType::Schedule);
        assert_eq!(rule.actions[0].duration_ms, Some(60_000));
        assert!(rule.conditions.is_empty());
        assert_eq!(rule.schedule.start_time, "13:00");
    }
}
