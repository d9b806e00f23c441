//! Sensors — read-and-validate pipelines for the six reference types.
//!
//! Every sensor owns its hardware channel, rate-limits itself through a
//! [`PollGate`] and reports failures as invalid [`Reading`]s rather than
//! errors. Time is always passed in as `now`.

mod analog;
mod button;
mod climate;
mod motion;

pub use analog::{AnalogScale, AnalogSensor, assess_samples};
pub use button::{ButtonSensor, DEBOUNCE_MS};
pub use climate::{ClimateSensor, HUMIDITY_RANGE, RETRY_DELAY_MS, TEMPERATURE_RANGE};
pub use motion::MotionSensor;

use domotik_domain::device::DeviceDescriptor;
use domotik_domain::error::{DomotikError, ValidationError};
use domotik_domain::id::DeviceId;
use domotik_domain::reading::{Reading, SensorKind};
use domotik_domain::time::{Millis, elapsed};

use crate::ports::Board;

/// A polled sensor.
pub trait Sensor {
    fn id(&self) -> &DeviceId;

    fn kind(&self) -> SensorKind;

    /// Configure the underlying peripheral.
    fn init(&mut self, now: Millis);

    /// Whether the sensor should be read on this tick.
    fn is_ready(&self, now: Millis) -> bool;

    /// Read and validate.
    ///
    /// Returns `None` when the sensor has nothing to report this tick
    /// (a retry is pending); the cache entry is then left untouched. A
    /// climate probe that stops answering therefore keeps its last valid
    /// reading in the cache until the retry resolves, up to
    /// [`RETRY_DELAY_MS`] later, instead of blocking the tick.
    fn read(&mut self, now: Millis) -> Option<Reading>;

    fn read_interval(&self) -> Millis;

    fn set_read_interval(&mut self, interval: Millis);
}

/// Per-sensor rate limiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollGate {
    interval: Millis,
    last_read: Option<Millis>,
}

impl PollGate {
    #[must_use]
    pub fn new(interval: Millis) -> Self {
        Self {
            interval,
            last_read: None,
        }
    }

    /// `true` before the first read, then once `interval` has elapsed.
    #[must_use]
    pub fn is_due(&self, now: Millis) -> bool {
        self.last_read
            .is_none_or(|last| elapsed(now, last) >= self.interval)
    }

    /// Record a read at `now`.
    pub fn mark(&mut self, now: Millis) {
        self.last_read = Some(now);
    }

    #[must_use]
    pub fn interval(&self) -> Millis {
        self.interval
    }

    pub fn set_interval(&mut self, interval: Millis) {
        self.interval = interval;
    }

    #[must_use]
    pub fn last_read(&self) -> Option<Millis> {
        self.last_read
    }
}

/// Open the hardware for `descriptor` and build the matching sensor.
///
/// # Errors
///
/// Returns [`ValidationError::MissingKind`] if the descriptor is not a
/// sensor, or the board's error if the pin cannot be opened.
pub fn open<B>(descriptor: &DeviceDescriptor, board: &mut B) -> Result<Box<dyn Sensor>, DomotikError>
where
    B: Board + ?Sized,
{
    let kind = descriptor
        .sensor_kind()
        .ok_or_else(|| ValidationError::MissingKind(descriptor.id.to_string()))?;
    let id = descriptor.id.clone();
    let pin = descriptor.pin;

    let mut sensor: Box<dyn Sensor> = match kind {
        SensorKind::HumidityTemperature => {
            Box::new(ClimateSensor::new(id, board.climate_probe(pin)?))
        }
        SensorKind::Gas => Box::new(AnalogSensor::new(
            id,
            AnalogScale::Gas,
            board.analog_input(pin)?,
        )),
        SensorKind::Current => Box::new(AnalogSensor::new(
            id,
            AnalogScale::Current,
            board.analog_input(pin)?,
        )),
        SensorKind::Light => Box::new(AnalogSensor::new(
            id,
            AnalogScale::Light,
            board.analog_input(pin)?,
        )),
        SensorKind::Motion => Box::new(MotionSensor::new(id, board.digital_input(pin, false)?)),
        SensorKind::Button => Box::new(ButtonSensor::new(id, board.digital_input(pin, true)?)),
    };
    sensor.set_read_interval(descriptor.read_interval_ms);
    Ok(sensor)
}
