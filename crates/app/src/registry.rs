//! Device registry — owns every sensor and actuator instance.

use std::collections::HashSet;

use domotik_domain::device::{ActuatorKind, DeviceDescriptor, DeviceKind};
use domotik_domain::error::{DomotikError, NotFoundError, ValidationError};
use domotik_domain::id::DeviceId;
use domotik_domain::rule::ActionKind;
use domotik_domain::time::Millis;

use crate::actuators::{self, Actuator};
use crate::cache::ReadingCache;
use crate::ports::Board;
use crate::sensors::{self, Sensor};

/// Summary flags for a status indicator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateStatus {
    /// A buzzer is on.
    pub alarm_active: bool,
    /// A relay is on.
    pub any_actuator_active: bool,
}

/// Sensors and actuators built from configuration, in configuration order.
#[derive(Default)]
pub struct DeviceRegistry {
    sensors: Vec<Box<dyn Sensor>>,
    actuators: Vec<Box<dyn Actuator>>,
}

impl DeviceRegistry {
    /// Build every enabled device described by `descriptors`.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty or duplicated id, or the
    /// board's error if a pin cannot be opened. Nothing is kept on error.
    pub fn build<B>(
        descriptors: &[DeviceDescriptor],
        board: &mut B,
        now: Millis,
    ) -> Result<Self, DomotikError>
    where
        B: Board + ?Sized,
    {
        let mut seen = HashSet::new();
        for descriptor in descriptors {
            descriptor.validate()?;
            if !seen.insert(descriptor.id.as_str()) {
                return Err(ValidationError::DuplicateId(descriptor.id.to_string()).into());
            }
        }

        // Every pin is opened before any device touches its hardware, so a
        // failed build leaves the running outputs alone.
        let mut registry = Self::default();
        let mut switched_on = Vec::new();
        for descriptor in descriptors.iter().filter(|d| d.enabled) {
            match descriptor.kind {
                DeviceKind::Sensor { .. } => {
                    registry.sensors.push(sensors::open(descriptor, board)?);
                }
                DeviceKind::Actuator { .. } => {
                    registry.actuators.push(actuators::open(descriptor, board)?);
                    switched_on.push(descriptor.initial_state);
                }
            }
        }

        for sensor in &mut registry.sensors {
            sensor.init(now);
        }
        for (actuator, initial_state) in registry.actuators.iter_mut().zip(switched_on) {
            actuator.init(now);
            if initial_state {
                actuator.set_state(true, now);
            }
        }

        tracing::info!(
            sensors = registry.sensors.len(),
            actuators = registry.actuators.len(),
            skipped = descriptors.iter().filter(|d| !d.enabled).count(),
            "device registry built"
        );
        Ok(registry)
    }

    /// Read every ready sensor into `cache`. Returns the number of readings
    /// written.
    pub fn poll(&mut self, now: Millis, cache: &mut ReadingCache) -> usize {
        let mut written = 0;
        for sensor in &mut self.sensors {
            if !sensor.is_ready(now) {
                continue;
            }
            if let Some(reading) = sensor.read(now) {
                cache.update(reading);
                written += 1;
            }
        }
        written
    }

    /// Advance every actuator's timers and patterns.
    pub fn advance_actuators(&mut self, now: Millis) {
        for actuator in &mut self.actuators {
            actuator.update(now);
        }
    }

    #[must_use]
    pub fn actuator(&self, id: &str) -> Option<&dyn Actuator> {
        self.actuators
            .iter()
            .find(|a| a.id().as_str() == id)
            .map(|device| &**device)
    }

    pub fn actuator_mut(&mut self, id: &str) -> Option<&mut (dyn Actuator + 'static)> {
        self.actuators
            .iter_mut()
            .find(|a| a.id().as_str() == id)
            .map(|actuator| &mut **actuator)
    }

    #[must_use]
    pub fn sensor(&self, id: &str) -> Option<&dyn Sensor> {
        self.sensors
            .iter()
            .find(|s| s.id().as_str() == id)
            .map(|device| &**device)
    }

    /// Apply a command to one actuator and return its new state.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError`] if no actuator has this id.
    pub fn command(
        &mut self,
        id: &str,
        kind: ActionKind,
        now: Millis,
    ) -> Result<bool, NotFoundError> {
        let actuator = self.actuator_mut(id).ok_or_else(|| NotFoundError {
            entity: "Actuator",
            id: id.to_string(),
        })?;
        Ok(actuator.apply(kind, now))
    }

    #[must_use]
    pub fn aggregate_status(&self) -> AggregateStatus {
        self.actuators
            .iter()
            .filter(|a| a.is_on())
            .fold(AggregateStatus::default(), |mut status, a| {
                match a.kind() {
                    ActuatorKind::Buzzer => status.alarm_active = true,
                    ActuatorKind::Relay => status.any_actuator_active = true,
                }
                status
            })
    }

    pub fn sensors(&self) -> impl Iterator<Item = &dyn Sensor> {
        self.sensors.iter().map(|device| &**device)
    }

    pub fn actuators(&self) -> impl Iterator<Item = &dyn Actuator> {
        self.actuators.iter().map(|device| &**device)
    }

    /// Ids of all actuators, in configuration order.
    pub fn actuator_ids(&self) -> impl Iterator<Item = &DeviceId> {
        self.actuators.iter().map(|a| a.id())
    }

    #[must_use]
    pub fn sensor_count(&self) -> usize {
        self.sensors.len()
    }

    #[must_use]
    pub fn actuator_count(&self) -> usize {
        self.actuators.len()
    }
}
