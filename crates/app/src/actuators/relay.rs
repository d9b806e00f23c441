//! Relay with an optional auto-off countdown.

use domotik_domain::device::ActuatorKind;
use domotik_domain::id::DeviceId;
use domotik_domain::time::Millis;

use super::{Actuator, ActuatorState};
use crate::ports::DigitalOutput;

pub struct Relay {
    id: DeviceId,
    output: Box<dyn DigitalOutput>,
    normally_open: bool,
    state: ActuatorState,
    /// Countdown length, re-armed on every `turn_on` until `turn_off`.
    duration: Option<Millis>,
    output_high: bool,
}

impl Relay {
    #[must_use]
    pub fn new(id: DeviceId, output: Box<dyn DigitalOutput>, normally_open: bool) -> Self {
        Self {
            id,
            output,
            normally_open,
            state: ActuatorState::default(),
            duration: None,
            output_high: !normally_open,
        }
    }

    fn drive(&mut self, energised: bool) {
        let level = energised == self.normally_open;
        self.output.set_level(level);
        self.output_high = level;
    }
}

impl Actuator for Relay {
    fn id(&self) -> &DeviceId {
        &self.id
    }

    fn kind(&self) -> ActuatorKind {
        ActuatorKind::Relay
    }

    fn init(&mut self, _now: Millis) {
        self.state = ActuatorState::default();
        self.duration = None;
        self.drive(false);
        tracing::debug!(actuator_id = %self.id, normally_open = self.normally_open, "relay initialised");
    }

    fn turn_on(&mut self, now: Millis) {
        let was_on = self.state.commanded_on;
        self.state.commanded_on = true;
        self.state.last_action = Some(now);
        if let Some(duration) = self.duration {
            self.state.armed_deadline = Some(now.saturating_add(duration));
        }
        self.drive(true);
        if !was_on {
            tracing::info!(actuator_id = %self.id, "relay on");
        }
    }

    fn turn_off(&mut self, now: Millis) {
        let was_on = self.state.commanded_on;
        self.state.commanded_on = false;
        self.state.armed_deadline = None;
        self.state.last_action = Some(now);
        self.duration = None;
        self.drive(false);
        if was_on {
            tracing::info!(actuator_id = %self.id, "relay off");
        }
    }

    fn state(&self) -> &ActuatorState {
        &self.state
    }

    fn output_high(&self) -> bool {
        self.output_high
    }

    fn update(&mut self, now: Millis) {
        if let Some(deadline) = self.state.armed_deadline
            && now >= deadline
        {
            tracing::info!(actuator_id = %self.id, deadline, "relay auto-off timer elapsed");
            self.turn_off(now);
        }
    }

    fn arm_timer(&mut self, duration: Millis, now: Millis) -> bool {
        if !self.state.commanded_on || duration == 0 {
            return false;
        }
        self.duration = Some(duration);
        self.state.armed_deadline = Some(now.saturating_add(duration));
        tracing::debug!(actuator_id = %self.id, duration, "relay auto-off timer armed");
        true
    }
}
