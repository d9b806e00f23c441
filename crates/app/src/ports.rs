//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the control core and the hardware.
//! They are defined here (in `app`) so that both the core and the board
//! adapters can depend on them without creating circular dependencies.

pub mod clock;
pub mod hal;

pub use clock::Clock;
pub use hal::{AnalogInput, Board, ClimateProbe, DigitalInput, DigitalOutput};
