//! Humidity/temperature probe with a non-blocking single retry.

use std::ops::RangeInclusive;

use domotik_domain::device::DEFAULT_READ_INTERVAL_MS;
use domotik_domain::error::ReadFailure;
use domotik_domain::id::DeviceId;
use domotik_domain::reading::{Measurement, Reading, SensorKind};
use domotik_domain::time::Millis;

use super::{PollGate, Sensor};
use crate::ports::ClimateProbe;

/// Delay between a failed read and its retry.
pub const RETRY_DELAY_MS: Millis = 150;
/// Plausible temperatures, °C.
pub const TEMPERATURE_RANGE: RangeInclusive<f32> = -40.0..=80.0;
/// Plausible relative humidity, %.
pub const HUMIDITY_RANGE: RangeInclusive<f32> = 0.0..=100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Retry {
    Idle,
    Pending { due: Millis },
}

/// DHT-class probe.
pub struct ClimateSensor {
    id: DeviceId,
    probe: Box<dyn ClimateProbe>,
    gate: PollGate,
    retry: Retry,
}

impl ClimateSensor {
    #[must_use]
    pub fn new(id: DeviceId, probe: Box<dyn ClimateProbe>) -> Self {
        Self {
            id,
            probe,
            gate: PollGate::new(DEFAULT_READ_INTERVAL_MS),
            retry: Retry::Idle,
        }
    }

    /// Whether a retry is scheduled.
    #[must_use]
    pub fn retry_pending(&self) -> bool {
        matches!(self.retry, Retry::Pending { .. })
    }

    fn invalid(&self, now: Millis) -> Reading {
        Reading::invalid(self.id.clone(), SensorKind::HumidityTemperature, now)
    }
}

impl Sensor for ClimateSensor {
    fn id(&self) -> &DeviceId {
        &self.id
    }

    fn kind(&self) -> SensorKind {
        SensorKind::HumidityTemperature
    }

    fn init(&mut self, _now: Millis) {
        self.probe.begin();
        self.retry = Retry::Idle;
        tracing::debug!(sensor_id = %self.id, "climate probe initialised");
    }

    fn is_ready(&self, now: Millis) -> bool {
        match self.retry {
            Retry::Pending { due } => now >= due,
            Retry::Idle => self.gate.is_due(now),
        }
    }

    fn read(&mut self, now: Millis) -> Option<Reading> {
        self.gate.mark(now);
        let temperature = self.probe.read_temperature();
        let humidity = self.probe.read_humidity();
        let answered = !temperature.is_nan() && !humidity.is_nan();

        match (self.retry, answered) {
            (Retry::Idle, false) => {
                self.probe.begin();
                let due = now.saturating_add(RETRY_DELAY_MS);
                self.retry = Retry::Pending { due };
                tracing::warn!(
                    sensor_id = %self.id,
                    failure = %ReadFailure::Transient,
                    due,
                    "climate probe did not answer, retry scheduled"
                );
                return None;
            }
            (Retry::Pending { .. }, false) => {
                self.retry = Retry::Idle;
                tracing::warn!(
                    sensor_id = %self.id,
                    failure = %ReadFailure::Disconnected,
                    "climate probe still silent after retry"
                );
                return Some(self.invalid(now));
            }
            (Retry::Pending { .. }, true) => {
                self.retry = Retry::Idle;
                tracing::info!(sensor_id = %self.id, "climate probe answered on retry");
            }
            (Retry::Idle, true) => {}
        }

        if !TEMPERATURE_RANGE.contains(&temperature) || !HUMIDITY_RANGE.contains(&humidity) {
            tracing::warn!(
                sensor_id = %self.id,
                failure = %ReadFailure::OutOfRange,
                temperature,
                humidity,
                "climate reading outside plausible range"
            );
            return Some(self.invalid(now));
        }

        Some(Reading::valid(
            self.id.clone(),
            now,
            Measurement::Climate {
                temperature,
                humidity,
            },
        ))
    }

    fn read_interval(&self) -> Millis {
        self.gate.interval()
    }

    fn set_read_interval(&mut self, interval: Millis) {
        self.gate.set_interval(interval);
    }
}
