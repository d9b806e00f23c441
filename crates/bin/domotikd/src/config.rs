//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `domotik.toml` in the working directory, or the file named by
//! `DOMOTIK_CONFIG`. Every field has a default so the file is optional.
//! Environment variables take precedence over file values.

use std::time::Duration;

use domotik_adapter_virtual::PinSimulation;
use domotik_domain::device::DeviceDescriptor;
use domotik_domain::rule::Rule;
use serde::Deserialize;

const DEFAULT_PATH: &str = "domotik.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tick loop settings.
    pub runtime: RuntimeConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Sensors and actuators, in build order.
    pub devices: Vec<DeviceDescriptor>,
    /// Automation rules, in evaluation order.
    pub rules: Vec<Rule>,
    /// Initial values of the virtual board's pins.
    pub simulation: Vec<PinSimulation>,
}

/// Tick loop configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Period of the control tick.
    pub tick_interval_ms: u64,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `domotik.toml` (or `DOMOTIK_CONFIG`), if
    /// present, then apply environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or
    /// if the result is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("DOMOTIK_CONFIG").unwrap_or_else(|_| DEFAULT_PATH.to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("DOMOTIK_TICK_MS")
            && let Ok(ms) = val.parse()
        {
            self.runtime.tick_interval_ms = ms;
        }
        if let Ok(val) = std::env::var("DOMOTIK_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.runtime.tick_interval_ms == 0 {
            return Err(ConfigError::Validation(
                "tick interval must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Period of the control tick.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.runtime.tick_interval_ms)
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 50,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "domotikd=info,domotik_app=info,domotik_adapter_virtual=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use domotik_adapter_virtual::PinSignal;
    use domotik_domain::device::{ActuatorKind, DeviceKind};
    use domotik_domain::reading::SensorKind;
    use domotik_domain::rule::{ActionKind, BuzzerPattern, Operator, TriggerType};

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.runtime.tick_interval_ms, 50);
        assert!(config.devices.is_empty());
        assert!(config.rules.is_empty());
        assert!(config.logging.filter.contains("domotikd=info"));
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.tick_interval(), Duration::from_millis(50));
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [runtime]
            tick_interval_ms = 20

            [logging]
            filter = 'debug'

            [[devices]]
            id = 'gas1'
            name = 'Kitchen gas'
            pin = 34
            type = 'sensor'
            sensor_type = 'gas'
            read_interval_ms = 500

            [[devices]]
            id = 'buzz'
            pin = 25
            type = 'actuator'
            actuator_type = 'buzzer'

            [[devices]]
            id = 'fan'
            pin = 26
            type = 'actuator'
            actuator_type = 'RELAY'
            normally_open = false
            enabled = false

            [[rules]]
            id = 'gas_alarm'
            name = 'Gas alarm'
            trigger = 'critical_event'

            [[rules.conditions]]
            sensor_id = 'gas1'
            parameter = 'gas'
            operator = '>'
            threshold = 400.0

            [[rules.actions]]
            actuator_id = 'buzz'
            action = 'turn_on'
            pattern = 'alarm'

            [[rules.deactivation_conditions]]
            sensor_id = 'gas1'
            parameter = 'gas'
            operator = '<'
            threshold = 200.0

            [[simulation]]
            pin = 34
            signal = 'analog'
            value = 2001
        ";
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.runtime.tick_interval_ms, 20);
        assert_eq!(config.logging.filter, "debug");

        assert_eq!(config.devices.len(), 3);
        let gas = &config.devices[0];
        assert_eq!(gas.sensor_kind(), Some(SensorKind::Gas));
        assert_eq!(gas.read_interval_ms, 500);
        assert!(gas.enabled);
        let fan = &config.devices[2];
        assert_eq!(
            fan.kind,
            DeviceKind::Actuator {
                actuator_type: ActuatorKind::Relay
            }
        );
        assert!(!fan.normally_open);
        assert!(!fan.enabled);

        let rule = &config.rules[0];
        assert_eq!(rule.trigger, TriggerType::CriticalEvent);
        assert_eq!(rule.conditions[0].operator, Operator::GreaterThan);
        assert_eq!(rule.actions[0].kind, ActionKind::TurnOn);
        assert_eq!(rule.actions[0].pattern, Some(BuzzerPattern::Alarm));
        assert_eq!(rule.deactivation_conditions.len(), 1);

        assert_eq!(config.simulation[0].signal, PinSignal::Analog { value: 2001 });
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.runtime.tick_interval_ms, 50);
    }

    #[test]
    fn should_reject_zero_tick_interval() {
        let mut config = Config::default();
        config.runtime.tick_interval_ms = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn should_accept_default_tick_interval() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn should_load_action_with_blank_pattern() {
        let toml = "
            [[rules]]
            id = 'watering'
            [[rules.actions]]
            actuator_id = 'pump'
            action = 'turn_on'
            duration = 5000
            pattern = ''
        ";
        let config: Config = toml::from_str(toml).unwrap();
        let action = &config.rules[0].actions[0];
        assert_eq!(action.pattern, None);
        assert_eq!(action.duration_ms, Some(5_000));
    }

    #[test]
    fn should_report_parse_error_for_unknown_operator() {
        let toml = "
            [[rules]]
            id = 'bad'
            [[rules.conditions]]
            sensor_id = 'gas1'
            parameter = 'gas'
            operator = '!='
            threshold = 1.0
        ";
        assert!(toml::from_str::<Config>(toml).is_err());
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }
}
