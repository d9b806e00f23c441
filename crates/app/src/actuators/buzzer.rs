//! Buzzer with phase-locked pattern playback.

use domotik_domain::device::ActuatorKind;
use domotik_domain::id::DeviceId;
use domotik_domain::rule::BuzzerPattern;
use domotik_domain::time::{Millis, elapsed};

use super::{ActivePattern, Actuator, ActuatorState};
use crate::ports::DigitalOutput;

/// A buzzer that sounds continuously when on, or modulated by a pattern.
///
/// [`Actuator::is_on`] reports the commanded state; the pattern only
/// shapes the physical output.
pub struct Buzzer {
    id: DeviceId,
    output: Box<dyn DigitalOutput>,
    state: ActuatorState,
    output_high: bool,
}

impl Buzzer {
    #[must_use]
    pub fn new(id: DeviceId, output: Box<dyn DigitalOutput>) -> Self {
        Self {
            id,
            output,
            state: ActuatorState::default(),
            output_high: false,
        }
    }

    fn write(&mut self, level: bool) {
        if level != self.output_high {
            self.output.set_level(level);
            self.output_high = level;
        }
    }
}

impl Actuator for Buzzer {
    fn id(&self) -> &DeviceId {
        &self.id
    }

    fn kind(&self) -> ActuatorKind {
        ActuatorKind::Buzzer
    }

    fn init(&mut self, _now: Millis) {
        self.state = ActuatorState::default();
        self.output.set_level(false);
        self.output_high = false;
        tracing::debug!(actuator_id = %self.id, "buzzer initialised");
    }

    fn turn_on(&mut self, now: Millis) {
        let was_on = self.state.commanded_on;
        self.state.commanded_on = true;
        self.state.last_action = Some(now);
        if self.state.active_pattern.is_none() {
            self.write(true);
        }
        if !was_on {
            tracing::info!(actuator_id = %self.id, "buzzer on");
        }
    }

    fn turn_off(&mut self, now: Millis) {
        let was_on = self.state.commanded_on;
        self.state.commanded_on = false;
        self.state.active_pattern = None;
        self.state.last_action = Some(now);
        self.write(false);
        if was_on {
            tracing::info!(actuator_id = %self.id, "buzzer off");
        }
    }

    fn state(&self) -> &ActuatorState {
        &self.state
    }

    fn output_high(&self) -> bool {
        self.output_high
    }

    fn update(&mut self, now: Millis) {
        if let Some(active) = self.state.active_pattern {
            let level = active.pattern.is_on_at(elapsed(now, active.started_at));
            self.write(level);
        }
    }

    /// Re-arming the pattern that is already playing keeps its phase.
    fn play_pattern(&mut self, pattern: BuzzerPattern, now: Millis) -> bool {
        let already_playing = self
            .state
            .active_pattern
            .is_some_and(|active| active.pattern == pattern);
        if !already_playing {
            self.state.active_pattern = Some(ActivePattern {
                pattern,
                started_at: now,
            });
            tracing::info!(actuator_id = %self.id, %pattern, "buzzer pattern started");
        }
        self.state.commanded_on = true;
        self.state.last_action = Some(now);
        self.update(now);
        true
    }
}
