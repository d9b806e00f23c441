//! # domotik-app
//!
//! Application layer — the device abstraction layer, the rule engine and
//! the **port definitions** (traits) for hardware.
//!
//! ## Responsibilities
//! - Define **port traits** that board adapters must implement:
//!   - `AnalogInput`, `DigitalInput`, `DigitalOutput`, `ClimateProbe` — per-pin access
//!   - `Board` — opens those pins for the devices named in the configuration
//!   - `Clock` — process uptime in milliseconds
//! - Implement the **sensor pipelines** (read, validate, rate-limit) and the
//!   **actuator state machines** (relay auto-off timer, buzzer patterns)
//! - Own the **reading cache**, the **device registry** and the **rule engine**
//! - Drive one control tick at a time through the [`Controller`](controller::Controller)
//!
//! ## Dependency rule
//! Depends on `domotik-domain` only (plus `tracing` for diagnostics).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod actuators;
pub mod cache;
pub mod clock;
pub mod controller;
pub mod ports;
pub mod registry;
pub mod rule_engine;
pub mod sensors;

#[cfg(test)]
pub(crate) mod testing;
