//! Declarative pin values, loaded from configuration.

use serde::{Deserialize, Serialize};

/// Initial value of one simulated pin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinSimulation {
    pub pin: u8,
    #[serde(flatten)]
    pub signal: PinSignal,
}

/// What a simulated pin reports.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "signal", rename_all = "snake_case")]
pub enum PinSignal {
    /// Constant raw converter value, `0..=4095`.
    Analog { value: u16 },
    /// Constant logic level.
    Digital { high: bool },
    /// Humidity/temperature probe answer.
    Climate { temperature: f32, humidity: f32 },
}
