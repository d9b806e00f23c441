//! Actuators — relay and buzzer state machines.
//!
//! Commands are synchronous and always succeed. Time-driven behaviour (the
//! relay auto-off countdown, buzzer pattern playback) advances only through
//! [`Actuator::update`], called once per tick.

mod buzzer;
mod relay;

pub use buzzer::Buzzer;
pub use relay::Relay;

use domotik_domain::device::{ActuatorKind, DeviceDescriptor};
use domotik_domain::error::{DomotikError, ValidationError};
use domotik_domain::id::DeviceId;
use domotik_domain::rule::{ActionKind, BuzzerPattern};
use domotik_domain::time::Millis;

use crate::ports::Board;

/// A buzzer pattern together with its phase origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivePattern {
    pub pattern: BuzzerPattern,
    pub started_at: Millis,
}

/// Observable state shared by every actuator.
///
/// `armed_deadline` is only ever set while `commanded_on` is true.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActuatorState {
    pub commanded_on: bool,
    pub armed_deadline: Option<Millis>,
    pub active_pattern: Option<ActivePattern>,
    pub last_action: Option<Millis>,
}

/// A commandable output device.
pub trait Actuator {
    fn id(&self) -> &DeviceId;

    fn kind(&self) -> ActuatorKind;

    /// Configure the output and drive it to the off level.
    fn init(&mut self, now: Millis);

    fn turn_on(&mut self, now: Millis);

    /// Switch off, cancelling any armed timer or pattern.
    fn turn_off(&mut self, now: Millis);

    fn state(&self) -> &ActuatorState;

    /// Level currently written to the output pin.
    fn output_high(&self) -> bool;

    /// Advance timers and patterns to `now`.
    fn update(&mut self, now: Millis);

    /// Arm an auto-off countdown. Returns `false` if unsupported.
    fn arm_timer(&mut self, _duration: Millis, _now: Millis) -> bool {
        false
    }

    /// Start a buzzer pattern. Returns `false` if unsupported.
    ///
    /// Playback is timed from `now`, except when the same pattern is
    /// already playing: it then keeps its original start time so a rule
    /// that fires on every tick does not restart the cycle.
    fn play_pattern(&mut self, _pattern: BuzzerPattern, _now: Millis) -> bool {
        false
    }

    fn is_on(&self) -> bool {
        self.state().commanded_on
    }

    fn toggle(&mut self, now: Millis) {
        if self.is_on() {
            self.turn_off(now);
        } else {
            self.turn_on(now);
        }
    }

    fn set_state(&mut self, on: bool, now: Millis) {
        if on {
            self.turn_on(now);
        } else {
            self.turn_off(now);
        }
    }

    /// Apply a command and return the resulting state.
    fn apply(&mut self, kind: ActionKind, now: Millis) -> bool {
        match kind {
            ActionKind::TurnOn => self.turn_on(now),
            ActionKind::TurnOff => self.turn_off(now),
            ActionKind::Toggle => self.toggle(now),
        }
        self.is_on()
    }
}

/// Open the output pin for `descriptor` and build the matching actuator.
///
/// # Errors
///
/// Returns [`ValidationError::MissingKind`] if the descriptor is not an
/// actuator, or the board's error if the pin cannot be opened.
pub fn open<B>(
    descriptor: &DeviceDescriptor,
    board: &mut B,
) -> Result<Box<dyn Actuator>, DomotikError>
where
    B: Board + ?Sized,
{
    let kind = descriptor
        .actuator_kind()
        .ok_or_else(|| ValidationError::MissingKind(descriptor.id.to_string()))?;
    let output = board.digital_output(descriptor.pin)?;
    let id = descriptor.id.clone();

    let actuator: Box<dyn Actuator> = match kind {
        ActuatorKind::Relay => Box::new(Relay::new(id, output, descriptor.normally_open)),
        ActuatorKind::Buzzer => Box::new(Buzzer::new(id, output)),
    };
    Ok(actuator)
}
