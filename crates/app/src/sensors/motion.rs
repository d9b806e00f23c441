//! PIR motion detector: the digital level is the reading.

use domotik_domain::device::DEFAULT_READ_INTERVAL_MS;
use domotik_domain::id::DeviceId;
use domotik_domain::reading::{Measurement, Reading, SensorKind};
use domotik_domain::time::Millis;

use super::{PollGate, Sensor};
use crate::ports::DigitalInput;

pub struct MotionSensor {
    id: DeviceId,
    input: Box<dyn DigitalInput>,
    gate: PollGate,
    last_level: bool,
}

impl MotionSensor {
    #[must_use]
    pub fn new(id: DeviceId, input: Box<dyn DigitalInput>) -> Self {
        Self {
            id,
            input,
            gate: PollGate::new(DEFAULT_READ_INTERVAL_MS),
            last_level: false,
        }
    }
}

impl Sensor for MotionSensor {
    fn id(&self) -> &DeviceId {
        &self.id
    }

    fn kind(&self) -> SensorKind {
        SensorKind::Motion
    }

    fn init(&mut self, _now: Millis) {
        self.last_level = self.input.is_high();
    }

    fn is_ready(&self, now: Millis) -> bool {
        self.gate.is_due(now)
    }

    fn read(&mut self, now: Millis) -> Option<Reading> {
        self.gate.mark(now);
        let detected = self.input.is_high();
        if detected != self.last_level {
            tracing::debug!(sensor_id = %self.id, detected, "motion level changed");
            self.last_level = detected;
        }
        Some(Reading::valid(
            self.id.clone(),
            now,
            Measurement::Motion { detected },
        ))
    }

    fn read_interval(&self) -> Millis {
        self.gate.interval()
    }

    fn set_read_interval(&mut self, interval: Millis) {
        self.gate.set_interval(interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::Board;
    use crate::testing::FakeBoard;
    use domotik_domain::reading::Parameter;

    #[test]
    fn should_always_report_current_level() {
        let mut board = FakeBoard::default();
        let mut sensor = MotionSensor::new(DeviceId::new("pir1"), board.digital_input(5, false).unwrap());
        sensor.init(0);

        let idle = sensor.read(0).unwrap();
        board.set_digital(5, true);
        let moving = sensor.read(1_000).unwrap();

        assert!(idle.is_valid());
        assert_eq!(idle.value(Parameter::Motion), Some(0.0));
        assert_eq!(moving.value(Parameter::Motion), Some(1.0));
    }
}
