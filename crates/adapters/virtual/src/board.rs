//! Virtual board — pins backed by shared in-memory state.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use domotik_app::ports::{AnalogInput, Board, ClimateProbe, DigitalInput, DigitalOutput};
use domotik_domain::error::DomotikError;

use crate::error::VirtualBoardError;
use crate::simulation::{PinSignal, PinSimulation};

/// Highest pin number the simulated board exposes.
pub const MAX_PIN: u8 = 48;

#[derive(Debug, Clone, Copy)]
struct Climate {
    temperature: f32,
    humidity: f32,
    responsive: bool,
}

#[derive(Debug, Default)]
struct BoardState {
    analog: HashMap<u8, u16>,
    analog_queue: HashMap<u8, VecDeque<u16>>,
    digital: HashMap<u8, bool>,
    outputs: HashMap<u8, bool>,
    output_writes: HashMap<u8, usize>,
    climate: HashMap<u8, Climate>,
    climate_begins: HashMap<u8, usize>,
}

/// A simulated board.
///
/// Unset analog pins read `0` (an open circuit), unset digital inputs read
/// their pull-up level, and a probe with no values set never answers.
#[derive(Debug, Clone, Default)]
pub struct VirtualBoard {
    state: Arc<Mutex<BoardState>>,
}

impl VirtualBoard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A board with the given pin values applied.
    #[must_use]
    pub fn with_simulation(simulation: &[PinSimulation]) -> Self {
        let board = Self::new();
        for entry in simulation {
            board.apply(entry);
        }
        board
    }

    pub fn apply(&self, entry: &PinSimulation) {
        match entry.signal {
            PinSignal::Analog { value } => self.set_analog(entry.pin, value),
            PinSignal::Digital { high } => self.set_digital(entry.pin, high),
            PinSignal::Climate {
                temperature,
                humidity,
            } => self.set_climate(entry.pin, temperature, humidity),
        }
    }

    /// Steady raw value of an analog pin.
    pub fn set_analog(&self, pin: u8, value: u16) {
        self.lock().analog.insert(pin, value);
    }

    /// Queue raw samples returned, in order, before the steady value.
    pub fn push_analog_samples(&self, pin: u8, samples: &[u16]) {
        self.lock()
            .analog_queue
            .entry(pin)
            .or_default()
            .extend(samples.iter().copied());
    }

    pub fn set_digital(&self, pin: u8, high: bool) {
        self.lock().digital.insert(pin, high);
    }

    pub fn set_climate(&self, pin: u8, temperature: f32, humidity: f32) {
        self.lock().climate.insert(
            pin,
            Climate {
                temperature,
                humidity,
                responsive: true,
            },
        );
    }

    /// Make the probe on `pin` stop answering until values are set again.
    pub fn disconnect_climate(&self, pin: u8) {
        if let Some(climate) = self.lock().climate.get_mut(&pin) {
            climate.responsive = false;
        }
    }

    /// Last level written to an output pin.
    #[must_use]
    pub fn output_level(&self, pin: u8) -> Option<bool> {
        self.lock().outputs.get(&pin).copied()
    }

    /// Number of writes to an output pin.
    #[must_use]
    pub fn output_writes(&self, pin: u8) -> usize {
        self.lock().output_writes.get(&pin).copied().unwrap_or(0)
    }

    /// Number of times the probe on `pin` was (re)initialised.
    #[must_use]
    pub fn climate_begins(&self, pin: u8) -> usize {
        self.lock().climate_begins.get(&pin).copied().unwrap_or(0)
    }

    fn lock(&self) -> MutexGuard<'_, BoardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn claim(&self, pin: u8) -> Result<VirtualPin, VirtualBoardError> {
        if pin > MAX_PIN {
            return Err(VirtualBoardError::UnknownPin { pin, max: MAX_PIN });
        }
        tracing::trace!(pin, "virtual pin opened");
        Ok(VirtualPin {
            pin,
            state: Arc::clone(&self.state),
        })
    }
}

impl Board for VirtualBoard {
    fn analog_input(&mut self, pin: u8) -> Result<Box<dyn AnalogInput>, DomotikError> {
        Ok(Box::new(self.claim(pin)?))
    }

    fn digital_input(
        &mut self,
        pin: u8,
        pull_up: bool,
    ) -> Result<Box<dyn DigitalInput>, DomotikError> {
        let input = self.claim(pin)?;
        self.lock().digital.entry(pin).or_insert(pull_up);
        Ok(Box::new(input))
    }

    fn digital_output(&mut self, pin: u8) -> Result<Box<dyn DigitalOutput>, DomotikError> {
        Ok(Box::new(self.claim(pin)?))
    }

    fn climate_probe(&mut self, pin: u8) -> Result<Box<dyn ClimateProbe>, DomotikError> {
        Ok(Box::new(self.claim(pin)?))
    }
}

/// One opened pin.
struct VirtualPin {
    pin: u8,
    state: Arc<Mutex<BoardState>>,
}

impl VirtualPin {
    fn lock(&self) -> MutexGuard<'_, BoardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn climate(&self) -> Option<Climate> {
        self.lock()
            .climate
            .get(&self.pin)
            .copied()
            .filter(|c| c.responsive)
    }
}

impl AnalogInput for VirtualPin {
    fn read_raw(&mut self) -> u16 {
        let mut state = self.lock();
        if let Some(sample) = state
            .analog_queue
            .get_mut(&self.pin)
            .and_then(VecDeque::pop_front)
        {
            return sample;
        }
        state.analog.get(&self.pin).copied().unwrap_or(0)
    }
}

impl DigitalInput for VirtualPin {
    fn is_high(&mut self) -> bool {
        self.lock().digital.get(&self.pin).copied().unwrap_or(false)
    }
}

impl DigitalOutput for VirtualPin {
    fn set_level(&mut self, high: bool) {
        let mut state = self.lock();
        state.outputs.insert(self.pin, high);
        *state.output_writes.entry(self.pin).or_default() += 1;
    }
}

impl ClimateProbe for VirtualPin {
    fn begin(&mut self) {
        *self.lock().climate_begins.entry(self.pin).or_default() += 1;
    }

    fn read_temperature(&mut self) -> f32 {
        self.climate().map_or(f32::NAN, |c| c.temperature)
    }

    fn read_humidity(&mut self) -> f32 {
        self.climate().map_or(f32::NAN, |c| c.humidity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_reject_pins_beyond_the_board() {
        let mut board = VirtualBoard::new();
        assert!(board.analog_input(MAX_PIN).is_ok());
        assert!(matches!(
            board.digital_output(MAX_PIN + 1),
            Err(DomotikError::Hardware(_))
        ));
    }

    #[test]
    fn should_read_queued_samples_before_steady_value() {
        let mut board = VirtualBoard::new();
        board.set_analog(34, 1_500);
        board.push_analog_samples(34, &[2000, 2005]);
        let mut input = board.analog_input(34).unwrap();

        assert_eq!(input.read_raw(), 2000);
        assert_eq!(input.read_raw(), 2005);
        assert_eq!(input.read_raw(), 1_500);
    }

    #[test]
    fn should_read_floating_analog_pin_as_zero() {
        let mut board = VirtualBoard::new();
        let mut input = board.analog_input(35).unwrap();
        assert_eq!(input.read_raw(), 0);
    }

    #[test]
    fn should_default_digital_input_to_pull_up_level() {
        let mut board = VirtualBoard::new();
        let mut button = board.digital_input(0, true).unwrap();
        let mut pir = board.digital_input(27, false).unwrap();
        assert!(button.is_high());
        assert!(!pir.is_high());

        board.set_digital(0, false);
        assert!(!button.is_high());
    }

    #[test]
    fn should_record_output_writes() {
        let mut board = VirtualBoard::new();
        let mut output = board.digital_output(26).unwrap();
        output.set_level(true);
        output.set_level(false);
        assert_eq!(board.output_level(26), Some(false));
        assert_eq!(board.output_writes(26), 2);
        assert_eq!(board.output_level(25), None);
    }

    #[test]
    fn should_answer_climate_until_disconnected() {
        let mut board = VirtualBoard::new();
        let mut probe = board.climate_probe(4).unwrap();
        assert!(probe.read_temperature().is_nan());

        board.set_climate(4, 23.0, 45.0);
        assert_eq!(probe.read_temperature(), 23.0);
        assert_eq!(probe.read_humidity(), 45.0);

        board.disconnect_climate(4);
        assert!(probe.read_humidity().is_nan());
        probe.begin();
        assert_eq!(board.climate_begins(4), 1);
    }

    #[test]
    fn should_apply_simulation_entries() {
        let board = VirtualBoard::with_simulation(&[
            PinSimulation {
                pin: 34,
                signal: PinSignal::Analog { value: 2001 },
            },
            PinSimulation {
                pin: 27,
                signal: PinSignal::Digital { high: true },
            },
        ]);
        let mut clone = board.clone();
        assert_eq!(clone.analog_input(34).unwrap().read_raw(), 2001);
        assert!(clone.digital_input(27, false).unwrap().is_high());
    }
}
