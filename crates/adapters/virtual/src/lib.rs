//! # domotik-adapter-virtual
//!
//! Simulated hardware for tests and demonstration.
//!
//! ## Provided ports
//!
//! | Type | Port | Behaviour |
//! |------|------|-----------|
//! | [`VirtualBoard`] | `Board` | Pins whose levels are set from code or from [`PinSimulation`] entries |
//! | [`ManualClock`] | `Clock` | Uptime that only moves when told to |
//!
//! Handles are cheap clones sharing the same state, so a test can keep a
//! copy of the board after handing one to the controller.
//!
//! ## Dependency rule
//!
//! Depends on `domotik-app` (port traits) and `domotik-domain` only.

mod board;
mod clock;
mod error;
mod simulation;

pub use board::{MAX_PIN, VirtualBoard};
pub use clock::ManualClock;
pub use error::VirtualBoardError;
pub use simulation::{PinSignal, PinSimulation};
