//! Hardware access ports — per-pin channels and the board that opens them.
//!
//! Every method here is infallible at the call site: a disconnected or
//! failing peripheral shows up as implausible data (a floating analog
//! level, a NaN from the climate probe) which the sensor pipelines detect
//! and turn into invalid readings.

use std::time::Duration;

use domotik_domain::error::DomotikError;

/// A 12-bit analog-to-digital converter channel.
pub trait AnalogInput {
    /// One conversion, `0..=4095`.
    fn read_raw(&mut self) -> u16;

    /// Let the input settle between two consecutive conversions.
    ///
    /// Hardware adapters wait for `spacing`; simulated ones return
    /// immediately.
    fn settle(&mut self, _spacing: Duration) {}
}

/// A digital input line.
pub trait DigitalInput {
    /// Current logic level.
    fn is_high(&mut self) -> bool;
}

/// A digital output line.
pub trait DigitalOutput {
    /// Drive the line high or low.
    fn set_level(&mut self, high: bool);
}

/// A single-wire humidity/temperature probe.
///
/// Both reads return `f32::NAN` when the probe does not answer.
pub trait ClimateProbe {
    /// (Re)initialise the probe.
    fn begin(&mut self);

    /// Degrees Celsius.
    fn read_temperature(&mut self) -> f32;

    /// Relative humidity, percent.
    fn read_humidity(&mut self) -> f32;
}

/// Opens hardware channels for configured pins.
///
/// Called once per device when the registry is (re)built.
pub trait Board {
    /// Open `pin` as an analog input.
    ///
    /// # Errors
    ///
    /// Returns [`DomotikError::Hardware`] if the pin cannot be used.
    fn analog_input(&mut self, pin: u8) -> Result<Box<dyn AnalogInput>, DomotikError>;

    /// Open `pin` as a digital input, optionally with the internal pull-up.
    ///
    /// # Errors
    ///
    /// Returns [`DomotikError::Hardware`] if the pin cannot be used.
    fn digital_input(
        &mut self,
        pin: u8,
        pull_up: bool,
    ) -> Result<Box<dyn DigitalInput>, DomotikError>;

    /// Open `pin` as a digital output.
    ///
    /// # Errors
    ///
    /// Returns [`DomotikError::Hardware`] if the pin cannot be used.
    fn digital_output(&mut self, pin: u8) -> Result<Box<dyn DigitalOutput>, DomotikError>;

    /// Attach a humidity/temperature probe to `pin`.
    ///
    /// # Errors
    ///
    /// Returns [`DomotikError::Hardware`] if the pin cannot be used.
    fn climate_probe(&mut self, pin: u8) -> Result<Box<dyn ClimateProbe>, DomotikError>;
}
