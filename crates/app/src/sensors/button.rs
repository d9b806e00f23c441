//! Push button on a pulled-up input, debounced in software.

use domotik_domain::device::DEFAULT_READ_INTERVAL_MS;
use domotik_domain::id::DeviceId;
use domotik_domain::reading::{Measurement, Reading, SensorKind};
use domotik_domain::time::{Millis, elapsed};

use super::{PollGate, Sensor};
use crate::ports::DigitalInput;

/// Time a new level must hold before it is believed.
pub const DEBOUNCE_MS: Millis = 50;

/// Active-low button. The line idles high through the pull-up.
pub struct ButtonSensor {
    id: DeviceId,
    input: Box<dyn DigitalInput>,
    gate: PollGate,
    last_level: bool,
    changed_at: Option<Millis>,
    stable_level: bool,
}

impl ButtonSensor {
    #[must_use]
    pub fn new(id: DeviceId, input: Box<dyn DigitalInput>) -> Self {
        Self {
            id,
            input,
            gate: PollGate::new(DEFAULT_READ_INTERVAL_MS),
            last_level: true,
            changed_at: None,
            stable_level: true,
        }
    }

    /// Sample the line and return whether the button counts as pressed.
    fn debounce(&mut self, now: Millis) -> bool {
        let level = self.input.is_high();
        if level != self.last_level {
            self.last_level = level;
            self.changed_at = Some(now);
        }

        let settled = self
            .changed_at
            .is_none_or(|at| elapsed(now, at) >= DEBOUNCE_MS);
        if !settled {
            return false;
        }
        if self.stable_level != self.last_level {
            self.stable_level = self.last_level;
            tracing::debug!(sensor_id = %self.id, pressed = !self.stable_level, "button settled");
        }
        self.changed_at = None;
        !self.stable_level
    }
}

impl Sensor for ButtonSensor {
    fn id(&self) -> &DeviceId {
        &self.id
    }

    fn kind(&self) -> SensorKind {
        SensorKind::Button
    }

    fn init(&mut self, _now: Millis) {
        let level = self.input.is_high();
        self.last_level = level;
        self.stable_level = level;
        self.changed_at = None;
    }

    fn is_ready(&self, now: Millis) -> bool {
        self.gate.is_due(now)
    }

    fn read(&mut self, now: Millis) -> Option<Reading> {
        self.gate.mark(now);
        let pressed = self.debounce(now);
        Some(Reading::valid(
            self.id.clone(),
            now,
            Measurement::Button { pressed },
        ))
    }

    fn read_interval(&self) -> Millis {
        self.gate.interval()
    }

    fn set_read_interval(&mut self, interval: Millis) {
        self.gate.set_interval(interval);
    }
}
