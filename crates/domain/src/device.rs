//! Device descriptor — immutable identity and configuration of a sensor or
//! actuator, used once when the device registry is built.

use serde::{Deserialize, Serialize};

use crate::error::{DomotikError, ValidationError};
use crate::id::DeviceId;
use crate::reading::SensorKind;
use crate::time::Millis;

/// Default poll interval of a sensor.
pub const DEFAULT_READ_INTERVAL_MS: Millis = 1_000;

/// The two reference actuator types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActuatorKind {
    /// Switching relay with optional auto-off timer.
    #[serde(alias = "RELAY")]
    Relay,
    /// Buzzer with optional pattern playback.
    #[serde(alias = "BUZZER")]
    Buzzer,
}

impl std::fmt::Display for ActuatorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Relay => f.write_str("relay"),
            Self::Buzzer => f.write_str("buzzer"),
        }
    }
}

/// What a descriptor describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeviceKind {
    Sensor { sensor_type: SensorKind },
    Actuator { actuator_type: ActuatorKind },
}

/// Immutable configuration of one physical device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceDescriptor {
    pub id: DeviceId,
    #[serde(default)]
    pub name: String,
    pub pin: u8,
    #[serde(flatten)]
    pub kind: DeviceKind,
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Minimum time between two reads (sensors only).
    #[serde(default = "default_read_interval")]
    pub read_interval_ms: Millis,
    /// State applied right after initialisation (actuators only).
    #[serde(default)]
    pub initial_state: bool,
    /// Relay polarity: a normally-open relay is energised by a high level.
    #[serde(default = "default_true")]
    pub normally_open: bool,
}

fn default_true() -> bool {
    true
}

fn default_read_interval() -> Millis {
    DEFAULT_READ_INTERVAL_MS
}

impl DeviceDescriptor {
    /// Create a builder for constructing a [`DeviceDescriptor`].
    #[must_use]
    pub fn builder() -> DeviceDescriptorBuilder {
        DeviceDescriptorBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyId`] when `id` is empty.
    pub fn validate(&self) -> Result<(), DomotikError> {
        if self.id.is_empty() {
            return Err(ValidationError::EmptyId.into());
        }
        Ok(())
    }

    /// The sensor type, when this descriptor describes a sensor.
    #[must_use]
    pub fn sensor_kind(&self) -> Option<SensorKind> {
        match self.kind {
            DeviceKind::Sensor { sensor_type } => Some(sensor_type),
            DeviceKind::Actuator { .. } => None,
        }
    }

    /// The actuator type, when this descriptor describes an actuator.
    #[must_use]
    pub fn actuator_kind(&self) -> Option<ActuatorKind> {
        match self.kind {
            DeviceKind::Actuator { actuator_type } => Some(actuator_type),
            DeviceKind::Sensor { .. } => None,
        }
    }
}

/// Step-by-step builder for [`DeviceDescriptor`].
#[derive(Debug, Default)]
pub struct DeviceDescriptorBuilder {
    id: Option<DeviceId>,
    name: Option<String>,
    pin: u8,
    kind: Option<DeviceKind>,
    enabled: Option<bool>,
    read_interval_ms: Option<Millis>,
    initial_state: bool,
    normally_open: Option<bool>,
}

impl DeviceDescriptorBuilder {
    #[must_use]
    pub fn id(mut self, id: impl Into<DeviceId>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn pin(mut self, pin: u8) -> Self {
        self.pin = pin;
        self
    }

    #[must_use]
    pub fn sensor(mut self, sensor_type: SensorKind) -> Self {
        self.kind = Some(DeviceKind::Sensor { sensor_type });
        self
    }

    #[must_use]
    pub fn actuator(mut self, actuator_type: ActuatorKind) -> Self {
        self.kind = Some(DeviceKind::Actuator { actuator_type });
        self
    }

    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    #[must_use]
    pub fn read_interval_ms(mut self, interval: Millis) -> Self {
        self.read_interval_ms = Some(interval);
        self
    }

    #[must_use]
    pub fn initial_state(mut self, on: bool) -> Self {
        self.initial_state = on;
        self
    }

    #[must_use]
    pub fn normally_open(mut self, normally_open: bool) -> Self {
        self.normally_open = Some(normally_open);
        self
    }

    /// Consume the builder, validate, and return a [`DeviceDescriptor`].
    ///
    /// # Errors
    ///
    /// Returns [`DomotikError::Validation`] if the id is empty or no device
    /// type was given.
    pub fn build(self) -> Result<DeviceDescriptor, DomotikError> {
        let id = self.id.unwrap_or_else(|| DeviceId::new(""));
        let kind = self
            .kind
            .ok_or_else(|| ValidationError::MissingKind(id.to_string()))?;
        let descriptor = DeviceDescriptor {
            name: self.name.unwrap_or_else(|| id.to_string()),
            id,
            pin: self.pin,
            kind,
            enabled: self.enabled.unwrap_or(true),
            read_interval_ms: self.read_interval_ms.unwrap_or(DEFAULT_READ_INTERVAL_MS),
            initial_state: self.initial_state,
            normally_open: self.normally_open.unwrap_or(true),
        };
        descriptor.validate()?;
        Ok(descriptor)
    }
}
