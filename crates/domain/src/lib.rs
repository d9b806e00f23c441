//! # domotik-domain
//!
//! Pure domain model for the domotik sensor/actuator controller.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, uptime timestamps
//! - Define **Readings** (validity-tagged measurements produced by sensors)
//! - Define **Device descriptors** (immutable identity/config of sensors and actuators)
//! - Define **Rules** (condition / schedule → action bindings)
//! - Contain all invariant enforcement and pure evaluation helpers
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or IO crates.
//! Hardware boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod device;
pub mod reading;
pub mod rule;
