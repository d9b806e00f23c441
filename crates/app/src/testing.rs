//! Hand-written hardware and clock doubles shared by the unit tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use domotik_domain::error::DomotikError;
use domotik_domain::time::Millis;

use crate::ports::{AnalogInput, Board, ClimateProbe, Clock, DigitalInput, DigitalOutput};

// ── Bench state ────────────────────────────────────────────────

#[derive(Default)]
struct Bench {
    analog: HashMap<u8, u16>,
    analog_script: HashMap<u8, VecDeque<u16>>,
    digital: HashMap<u8, bool>,
    outputs: HashMap<u8, bool>,
    writes: HashMap<u8, usize>,
    climate: HashMap<u8, (f32, f32)>,
    climate_begins: HashMap<u8, usize>,
    broken: HashSet<u8>,
}

#[derive(Debug)]
struct BrokenPin(u8);

impl std::fmt::Display for BrokenPin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "pin {} is broken", self.0)
    }
}

impl std::error::Error for BrokenPin {}

/// Fake board whose pin values are set by the test.
#[derive(Clone, Default)]
pub(crate) struct FakeBoard {
    bench: Arc<Mutex<Bench>>,
}

impl FakeBoard {
    pub(crate) fn set_analog(&self, pin: u8, value: u16) {
        self.bench.lock().unwrap().analog.insert(pin, value);
    }

    /// Samples returned before falling back to the steady value.
    pub(crate) fn script_analog(&self, pin: u8, samples: &[u16]) {
        self.bench
            .lock()
            .unwrap()
            .analog_script
            .entry(pin)
            .or_default()
            .extend(samples);
    }

    pub(crate) fn set_digital(&self, pin: u8, high: bool) {
        self.bench.lock().unwrap().digital.insert(pin, high);
    }

    pub(crate) fn set_climate(&self, pin: u8, temperature: f32, humidity: f32) {
        self.bench
            .lock()
            .unwrap()
            .climate
            .insert(pin, (temperature, humidity));
    }

    pub(crate) fn break_pin(&self, pin: u8) {
        self.bench.lock().unwrap().broken.insert(pin);
    }

    pub(crate) fn output(&self, pin: u8) -> Option<bool> {
        self.bench.lock().unwrap().outputs.get(&pin).copied()
    }

    pub(crate) fn writes(&self, pin: u8) -> usize {
        self.bench
            .lock()
            .unwrap()
            .writes
            .get(&pin)
            .copied()
            .unwrap_or(0)
    }

    pub(crate) fn climate_begins(&self, pin: u8) -> usize {
        self.bench
            .lock()
            .unwrap()
            .climate_begins
            .get(&pin)
            .copied()
            .unwrap_or(0)
    }

    fn check(&self, pin: u8) -> Result<(), DomotikError> {
        if self.bench.lock().unwrap().broken.contains(&pin) {
            return Err(DomotikError::Hardware(Box::new(BrokenPin(pin))));
        }
        Ok(())
    }

    fn pin(&self, pin: u8) -> FakePin {
        FakePin {
            pin,
            bench: Arc::clone(&self.bench),
        }
    }
}

impl Board for FakeBoard {
    fn analog_input(&mut self, pin: u8) -> Result<Box<dyn AnalogInput>, DomotikError> {
        self.check(pin)?;
        Ok(Box::new(self.pin(pin)))
    }

    fn digital_input(
        &mut self,
        pin: u8,
        pull_up: bool,
    ) -> Result<Box<dyn DigitalInput>, DomotikError> {
        self.check(pin)?;
        self.bench
            .lock()
            .unwrap()
            .digital
            .entry(pin)
            .or_insert(pull_up);
        Ok(Box::new(self.pin(pin)))
    }

    fn digital_output(&mut self, pin: u8) -> Result<Box<dyn DigitalOutput>, DomotikError> {
        self.check(pin)?;
        Ok(Box::new(self.pin(pin)))
    }

    fn climate_probe(&mut self, pin: u8) -> Result<Box<dyn ClimateProbe>, DomotikError> {
        self.check(pin)?;
        Ok(Box::new(self.pin(pin)))
    }
}

// ── Pins ───────────────────────────────────────────────────────

pub(crate) struct FakePin {
    pin: u8,
    bench: Arc<Mutex<Bench>>,
}

impl FakePin {
    fn climate(&self) -> (f32, f32) {
        self.bench
            .lock()
            .unwrap()
            .climate
            .get(&self.pin)
            .copied()
            .unwrap_or((f32::NAN, f32::NAN))
    }
}

impl AnalogInput for FakePin {
    fn read_raw(&mut self) -> u16 {
        let mut bench = self.bench.lock().unwrap();
        if let Some(sample) = bench
            .analog_script
            .get_mut(&self.pin)
            .and_then(VecDeque::pop_front)
        {
            return sample;
        }
        bench.analog.get(&self.pin).copied().unwrap_or(0)
    }
}

impl DigitalInput for FakePin {
    fn is_high(&mut self) -> bool {
        self.bench
            .lock()
            .unwrap()
            .digital
            .get(&self.pin)
            .copied()
            .unwrap_or(false)
    }
}

impl DigitalOutput for FakePin {
    fn set_level(&mut self, high: bool) {
        let mut bench = self.bench.lock().unwrap();
        bench.outputs.insert(self.pin, high);
        *bench.writes.entry(self.pin).or_default() += 1;
    }
}

impl ClimateProbe for FakePin {
    fn begin(&mut self) {
        *self
            .bench
            .lock()
            .unwrap()
            .climate_begins
            .entry(self.pin)
            .or_default() += 1;
    }

    fn read_temperature(&mut self) -> f32 {
        self.climate().0
    }

    fn read_humidity(&mut self) -> f32 {
        self.climate().1
    }
}

// ── Clock ──────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub(crate) struct FakeClock(Arc<AtomicU64>);

impl FakeClock {
    pub(crate) fn set(&self, now: Millis) {
        self.0.store(now, Ordering::SeqCst);
    }

    pub(crate) fn advance(&self, delta: Millis) {
        self.0.fetch_add(delta, Ordering::SeqCst);
    }
}

impl Clock for FakeClock {
    fn now_ms(&self) -> Millis {
        self.0.load(Ordering::SeqCst)
    }
}
