//! Condition — a threshold comparison against one sensor parameter.

use serde::{Deserialize, Serialize};

use crate::id::DeviceId;
use crate::reading::Parameter;

/// Absolute tolerance used by [`Operator::Equal`].
pub const EQUALITY_TOLERANCE: f32 = 0.1;

/// Comparison operator, resolved once when the rule is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = "<")]
    LessThan,
    /// Equal within [`EQUALITY_TOLERANCE`].
    #[serde(rename = "==")]
    Equal,
    #[serde(rename = ">=")]
    GreaterOrEqual,
    #[serde(rename = "<=")]
    LessOrEqual,
}

impl Operator {
    /// Compare `value` against `threshold`.
    #[must_use]
    pub fn apply(self, value: f32, threshold: f32) -> bool {
        match self {
            Self::GreaterThan => value > threshold,
            Self::LessThan => value < threshold,
            Self::Equal => (value - threshold).abs() < EQUALITY_TOLERANCE,
            Self::GreaterOrEqual => value >= threshold,
            Self::LessOrEqual => value <= threshold,
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::GreaterThan => ">",
            Self::LessThan => "<",
            Self::Equal => "==",
            Self::GreaterOrEqual => ">=",
            Self::LessOrEqual => "<=",
        };
        f.write_str(s)
    }
}

/// How a condition joins the *next* condition of the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Logic {
    #[default]
    #[serde(rename = "AND", alias = "and")]
    And,
    #[serde(rename = "OR", alias = "or")]
    Or,
}

impl Logic {
    /// Combine the running result with the next condition's result.
    #[must_use]
    pub fn combine(self, running: bool, next: bool) -> bool {
        match self {
            Self::And => running && next,
            Self::Or => running || next,
        }
    }
}

/// A predicate on one sensor parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub sensor_id: DeviceId,
    pub parameter: Parameter,
    pub operator: Operator,
    #[serde(alias = "value")]
    pub threshold: f32,
    /// Joins this condition to the next one; `AND` when absent.
    #[serde(default)]
    pub logic: Option<Logic>,
}

impl Condition {
    #[must_use]
    pub fn new(
        sensor_id: impl Into<DeviceId>,
        parameter: Parameter,
        operator: Operator,
        threshold: f32,
    ) -> Self {
        Self {
            sensor_id: sensor_id.into(),
            parameter,
            operator,
            threshold,
            logic: None,
        }
    }

    /// Set how this condition joins the next one.
    #[must_use]
    pub fn then(mut self, logic: Logic) -> Self {
        self.logic = Some(logic);
        self
    }

    /// The effective joining logic.
    #[must_use]
    pub fn logic(&self) -> Logic {
        self.logic.unwrap_or_default()
    }

    /// Apply the operator to a sensor value.
    #[must_use]
    pub fn holds_for(&self, value: f32) -> bool {
        self.operator.apply(value, self.threshold)
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{} {} {}",
            self.sensor_id, self.parameter, self.operator, self.threshold
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_compare_with_strict_and_inclusive_operators() {
        assert!(Operator::GreaterThan.apply(31.0, 30.0));
        assert!(!Operator::GreaterThan.apply(30.0, 30.0));
        assert!(Operator::GreaterOrEqual.apply(30.0, 30.0));
        assert!(Operator::LessThan.apply(79.9, 80.0));
        assert!(Operator::LessOrEqual.apply(80.0, 80.0));
    }

    #[test]
    fn should_treat_equal_as_within_tolerance() {
        assert!(Operator::Equal.apply(1.0, 1.05));
        assert!(Operator::Equal.apply(0.0, 0.0));
        assert!(!Operator::Equal.apply(1.0, 1.2));
    }

    #[test]
    fn should_default_logic_to_and() {
        let c = Condition::new("temp1", Parameter::Temperature, Operator::GreaterThan, 30.0);
        assert_eq!(c.logic(), Logic::And);
        assert_eq!(c.then(Logic::Or).logic(), Logic::Or);
    }

    #[test]
    fn should_combine_running_result() {
        assert!(!Logic::And.combine(true, false));
        assert!(Logic::Or.combine(false, true));
    }

    #[test]
    fn should_display_condition() {
        let c = Condition::new("hum1", Parameter::Humidity, Operator::LessThan, 80.0);
        assert_eq!(c.to_string(), "hum1.humidity < 80");
    }

    #[test]
    fn should_deserialize_from_config_json() {
        let json = serde_json::json!({
            "sensor_id": "temp1",
            "parameter": "temperature",
            "operator": ">=",
            "value": 30,
            "logic": "OR"
        });
        let c: Condition = serde_json::from_value(json).unwrap();
        assert_eq!(c.operator, Operator::GreaterOrEqual);
        assert_eq!(c.logic(), Logic::Or);
        assert!(c.holds_for(30.0));
    }

    #[test]
    fn should_reject_unknown_operator_at_load_time() {
        let json = serde_json::json!({
            "sensor_id": "temp1",
            "parameter": "temperature",
            "operator": "!=",
            "value": 30
        });
        assert!(serde_json::from_value::<Condition>(json).is_err());
    }
}
