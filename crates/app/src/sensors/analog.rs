//! Analog sensors (gas, current, light) — three-sample stability check,
//! averaging and range scaling.

use std::time::Duration;

use domotik_domain::device::DEFAULT_READ_INTERVAL_MS;
use domotik_domain::error::ReadFailure;
use domotik_domain::id::DeviceId;
use domotik_domain::reading::{Measurement, Reading, SensorKind};
use domotik_domain::time::Millis;

use super::{PollGate, Sensor};
use crate::ports::AnalogInput;

/// 12-bit converter full scale.
pub const ADC_FULL_SCALE: u16 = 4095;
/// Samples taken per read.
pub const SAMPLE_COUNT: usize = 3;
/// Pause between two samples.
pub const SAMPLE_SPACING: Duration = Duration::from_millis(2);
/// Samples spread wider than this mean a floating input.
pub const MAX_DEVIATION: u16 = 50;
/// Exclusive lower rail; a sample at or under it means an open circuit.
pub const LOW_RAIL: u16 = 10;
/// Exclusive upper rail.
pub const HIGH_RAIL: u16 = 4080;

const SUPPLY_VOLTS: f32 = 3.3;
const CURRENT_ZERO_VOLTS: f32 = 1.65;
const CURRENT_VOLTS_PER_AMP: f32 = 0.1;
const MAX_AMPS: f32 = 30.0;

/// How an averaged raw value maps to the sensor's output range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalogScale {
    /// 0–1000.
    Gas,
    /// 0–30 A around a mid-supply zero point.
    Current,
    /// 0–1023.
    Light,
}

impl AnalogScale {
    #[must_use]
    pub fn sensor_kind(self) -> SensorKind {
        match self {
            Self::Gas => SensorKind::Gas,
            Self::Current => SensorKind::Current,
            Self::Light => SensorKind::Light,
        }
    }

    /// Upper bound of the scaled output.
    #[must_use]
    pub fn max(self) -> f32 {
        match self {
            Self::Gas => 1000.0,
            Self::Current => MAX_AMPS,
            Self::Light => 1023.0,
        }
    }

    /// Scale an averaged raw value, clamped to `0..=max()`.
    #[must_use]
    pub fn convert(self, average: u16) -> f32 {
        match self {
            Self::Gas => integer_map(average, 1000),
            Self::Light => integer_map(average, 1023),
            Self::Current => {
                let volts = f32::from(average) / f32::from(ADC_FULL_SCALE) * SUPPLY_VOLTS;
                ((volts - CURRENT_ZERO_VOLTS) / CURRENT_VOLTS_PER_AMP).clamp(0.0, MAX_AMPS)
            }
        }
    }

    fn measurement(self, value: f32) -> Measurement {
        match self {
            Self::Gas => Measurement::Gas { level: value },
            Self::Current => Measurement::Current { amps: value },
            Self::Light => Measurement::Light { level: value },
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn integer_map(average: u16, out_max: u32) -> f32 {
    let scaled = (u32::from(average) * out_max / u32::from(ADC_FULL_SCALE)).min(out_max);
    scaled as f32
}

/// Stability check over one batch of samples.
///
/// Returns the integer average when the input looks connected: all samples
/// strictly inside the rails and spread by less than [`MAX_DEVIATION`].
#[must_use]
pub fn assess_samples(samples: [u16; SAMPLE_COUNT]) -> Option<u16> {
    let min = samples.iter().copied().min()?;
    let max = samples.iter().copied().max()?;
    let in_rails = min > LOW_RAIL && max < HIGH_RAIL;
    if !in_rails || max - min >= MAX_DEVIATION {
        return None;
    }
    let sum: u32 = samples.iter().copied().map(u32::from).sum();
    // `SAMPLE_COUNT` samples below 4080 average below 4080.
    u16::try_from(sum / 3).ok()
}

/// Gas, current or light sensor on an analog input.
pub struct AnalogSensor {
    id: DeviceId,
    scale: AnalogScale,
    input: Box<dyn AnalogInput>,
    gate: PollGate,
    connected: bool,
}

impl AnalogSensor {
    #[must_use]
    pub fn new(id: DeviceId, scale: AnalogScale, input: Box<dyn AnalogInput>) -> Self {
        Self {
            id,
            scale,
            input,
            gate: PollGate::new(DEFAULT_READ_INTERVAL_MS),
            connected: true,
        }
    }

    fn sample(&mut self) -> [u16; SAMPLE_COUNT] {
        let mut samples = [0; SAMPLE_COUNT];
        for (i, slot) in samples.iter_mut().enumerate() {
            if i > 0 {
                self.input.settle(SAMPLE_SPACING);
            }
            *slot = self.input.read_raw();
        }
        samples
    }
}

impl Sensor for AnalogSensor {
    fn id(&self) -> &DeviceId {
        &self.id
    }

    fn kind(&self) -> SensorKind {
        self.scale.sensor_kind()
    }

    fn init(&mut self, _now: Millis) {
        tracing::debug!(sensor_id = %self.id, kind = %self.kind(), "analog sensor initialised");
    }

    fn is_ready(&self, now: Millis) -> bool {
        self.gate.is_due(now)
    }

    fn read(&mut self, now: Millis) -> Option<Reading> {
        self.gate.mark(now);
        let samples = self.sample();

        let Some(average) = assess_samples(samples) else {
            if self.connected {
                tracing::warn!(
                    sensor_id = %self.id,
                    failure = %ReadFailure::Disconnected,
                    ?samples,
                    "analog sensor unstable or out of rails"
                );
                self.connected = false;
            }
            return Some(Reading::invalid(self.id.clone(), self.kind(), now));
        };

        if !self.connected {
            tracing::info!(sensor_id = %self.id, "analog sensor reconnected");
            self.connected = true;
        }
        let value = self.scale.convert(average);
        Some(Reading::valid(
            self.id.clone(),
            now,
            self.scale.measurement(value),
        ))
    }

    fn read_interval(&self) -> Millis {
        self.gate.interval()
    }

    fn set_read_interval(&mut self, interval: Millis) {
        self.gate.set_interval(interval);
    }
}
