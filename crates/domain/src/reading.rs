//! Reading — a timestamped, validity-tagged measurement from one sensor.
//!
//! A valid reading always carries a [`Measurement`]; an invalid one never
//! does. The two constructors are the only way to build a [`Reading`], so
//! callers cannot observe measurement data on a reading that failed its
//! validation.

use serde::{Deserialize, Serialize};

use crate::id::DeviceId;
use crate::time::Millis;

/// The six reference sensor types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    /// Combined humidity/temperature probe (DHT11 class).
    #[serde(alias = "DHT11")]
    HumidityTemperature,
    /// Analog gas sensor (MQ-2 class).
    #[serde(alias = "MQ2")]
    Gas,
    /// Analog hall-effect current sensor (ACS class).
    #[serde(alias = "ASC")]
    Current,
    /// Light-dependent resistor on an analog input.
    #[serde(alias = "LDR")]
    Light,
    /// Passive-infrared motion detector on a digital input.
    #[serde(alias = "PIR")]
    Motion,
    /// Momentary push button, active low.
    #[serde(alias = "BUTTON")]
    Button,
}

impl SensorKind {
    /// Stable snake_case name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HumidityTemperature => "humidity_temperature",
            Self::Gas => "gas",
            Self::Current => "current",
            Self::Light => "light",
            Self::Motion => "motion",
            Self::Button => "button",
        }
    }
}

impl std::fmt::Display for SensorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scalar that a rule condition can compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parameter {
    Temperature,
    Humidity,
    Gas,
    Current,
    Light,
    /// Motion flag, mapped to `1.0` / `0.0`.
    Motion,
    /// Button pressed flag, mapped to `1.0` / `0.0`.
    Pressed,
}

impl std::fmt::Display for Parameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Temperature => "temperature",
            Self::Humidity => "humidity",
            Self::Gas => "gas",
            Self::Current => "current",
            Self::Light => "light",
            Self::Motion => "motion",
            Self::Pressed => "pressed",
        };
        f.write_str(s)
    }
}

/// Kind-tagged measurement payload of a valid reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Measurement {
    /// Degrees Celsius and relative humidity percent.
    Climate { temperature: f32, humidity: f32 },
    /// Gas level on a 0–1000 scale.
    Gas { level: f32 },
    /// Current in amperes, 0–30.
    Current { amps: f32 },
    /// Light level on a 0–1023 scale.
    Light { level: f32 },
    Motion { detected: bool },
    Button { pressed: bool },
}

impl Measurement {
    /// The sensor kind that produces this measurement.
    #[must_use]
    pub fn kind(&self) -> SensorKind {
        match self {
            Self::Climate { .. } => SensorKind::HumidityTemperature,
            Self::Gas { .. } => SensorKind::Gas,
            Self::Current { .. } => SensorKind::Current,
            Self::Light { .. } => SensorKind::Light,
            Self::Motion { .. } => SensorKind::Motion,
            Self::Button { .. } => SensorKind::Button,
        }
    }

    /// Extract `parameter` as a scalar, if this measurement carries it.
    #[must_use]
    pub fn value(&self, parameter: Parameter) -> Option<f32> {
        match (self, parameter) {
            (Self::Climate { temperature, .. }, Parameter::Temperature) => Some(*temperature),
            (Self::Climate { humidity, .. }, Parameter::Humidity) => Some(*humidity),
            (Self::Gas { level }, Parameter::Gas) | (Self::Light { level }, Parameter::Light) => {
                Some(*level)
            }
            (Self::Current { amps }, Parameter::Current) => Some(*amps),
            (Self::Motion { detected }, Parameter::Motion) => Some(flag(*detected)),
            (Self::Button { pressed }, Parameter::Pressed) => Some(flag(*pressed)),
            _ => None,
        }
    }
}

fn flag(value: bool) -> f32 {
    if value { 1.0 } else { 0.0 }
}

/// The result of one sensor read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub sensor_id: DeviceId,
    pub kind: SensorKind,
    pub timestamp: Millis,
    measurement: Option<Measurement>,
}

impl Reading {
    /// A reading that passed every validation check.
    #[must_use]
    pub fn valid(sensor_id: DeviceId, timestamp: Millis, measurement: Measurement) -> Self {
        Self {
            sensor_id,
            kind: measurement.kind(),
            timestamp,
            measurement: Some(measurement),
        }
    }

    /// A reading from a disconnected or implausible sensor. Carries no data.
    #[must_use]
    pub fn invalid(sensor_id: DeviceId, kind: SensorKind, timestamp: Millis) -> Self {
        Self {
            sensor_id,
            kind,
            timestamp,
            measurement: None,
        }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.measurement.is_some()
    }

    /// The measurement of a valid reading; `None` when invalid.
    #[must_use]
    pub fn measurement(&self) -> Option<&Measurement> {
        self.measurement.as_ref()
    }

    /// Extract `parameter` as a scalar.
    ///
    /// Returns `None` when the reading is invalid or its measurement does
    /// not carry that parameter.
    #[must_use]
    pub fn value(&self, parameter: Parameter) -> Option<f32> {
        self.measurement.and_then(|m| m.value(parameter))
    }

    /// Flat JSON export: identity fields plus only the fields of this
    /// reading's kind.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        let mut obj = serde_json::json!({
            "id": self.sensor_id,
            "type": self.kind,
            "timestamp": self.timestamp,
            "is_valid": self.is_valid(),
        });
        let fields = match self.measurement {
            Some(Measurement::Climate {
                temperature,
                humidity,
            }) => serde_json::json!({ "temperature": temperature, "humidity": humidity }),
            Some(Measurement::Gas { level }) => serde_json::json!({ "gas": level }),
            Some(Measurement::Current { amps }) => serde_json::json!({ "current": amps }),
            Some(Measurement::Light { level }) => serde_json::json!({ "light": level }),
            Some(Measurement::Motion { detected }) => serde_json::json!({ "motion": detected }),
            Some(Measurement::Button { pressed }) => serde_json::json!({ "pressed": pressed }),
            None => serde_json::json!({}),
        };
        if let (Some(target), serde_json::Value::Object(extra)) = (obj.as_object_mut(), fields) {
            target.extend(extra);
        }
        obj
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn climate(temperature: f32, humidity: f32) -> Reading {
        Reading::valid(
            DeviceId::new("temp1"),
            1_000,
            Measurement::Climate {
                temperature,
                humidity,
            },
        )
    }

    #[test]
    fn should_derive_kind_from_measurement() {
        let reading = Reading::valid(DeviceId::new("g"), 0, Measurement::Gas { level: 10.0 });
        assert_eq!(reading.kind, SensorKind::Gas);
        assert!(reading.is_valid());
    }

    #[test]
    fn should_carry_no_measurement_when_invalid() {
        let reading = Reading::invalid(DeviceId::new("g"), SensorKind::Gas, 5);
        assert!(!reading.is_valid());
        assert!(reading.measurement().is_none());
        assert_eq!(reading.value(Parameter::Gas), None);
    }

    #[test]
    fn should_extract_temperature_and_humidity_from_climate() {
        let reading = climate(32.0, 55.0);
        assert_eq!(reading.value(Parameter::Temperature), Some(32.0));
        assert_eq!(reading.value(Parameter::Humidity), Some(55.0));
        assert_eq!(reading.value(Parameter::Gas), None);
    }

    #[test]
    fn should_map_boolean_flags_to_one_and_zero() {
        let motion = Reading::valid(
            DeviceId::new("pir"),
            0,
            Measurement::Motion { detected: true },
        );
        let button = Reading::valid(
            DeviceId::new("b"),
            0,
            Measurement::Button { pressed: false },
        );
        assert_eq!(motion.value(Parameter::Motion), Some(1.0));
        assert_eq!(button.value(Parameter::Pressed), Some(0.0));
    }

    #[test]
    fn should_export_only_kind_fields_to_json() {
        let json = climate(21.5, 40.0).to_json();
        assert_eq!(json["id"], "temp1");
        assert_eq!(json["type"], "humidity_temperature");
        assert_eq!(json["is_valid"], true);
        assert_eq!(json["temperature"], 21.5);
        assert_eq!(json["humidity"], 40.0);
        assert!(json.get("gas").is_none());
    }

    #[test]
    fn should_export_invalid_reading_without_measurement_fields() {
        let json = Reading::invalid(DeviceId::new("l1"), SensorKind::Light, 7).to_json();
        assert_eq!(json["is_valid"], false);
        assert!(json.get("light").is_none());
    }

    #[test]
    fn should_accept_legacy_sensor_type_names() {
        let kind: SensorKind = serde_json::from_str("\"MQ2\"").unwrap();
        assert_eq!(kind, SensorKind::Gas);
        let kind: SensorKind = serde_json::from_str("\"humidity_temperature\"").unwrap();
        assert_eq!(kind, SensorKind::HumidityTemperature);
    }
}
