//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`DomotikError`] via `#[from]`. Sensor read failures are *not* errors:
//! they are encoded in [`Reading::is_valid`](crate::reading::Reading::is_valid)
//! and described by [`ReadFailure`] for diagnostics only.

/// Top-level error for the domotik workspace.
#[derive(Debug, thiserror::Error)]
pub enum DomotikError {
    /// A descriptor or rule violates a domain invariant.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// A referenced device or rule does not exist.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// A hardware adapter could not open or drive a peripheral.
    #[error("hardware error")]
    Hardware(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Domain invariant violations detected at construction time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// An identifier is empty.
    #[error("identifier must not be empty")]
    EmptyId,

    /// Two devices share the same identifier.
    #[error("duplicate device identifier {0}")]
    DuplicateId(String),

    /// A device descriptor names neither a sensor nor an actuator type.
    #[error("device {0} has no sensor or actuator type")]
    MissingKind(String),
}

/// A lookup by identifier found nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    /// Kind of thing that was looked up (e.g. `"Actuator"`).
    pub entity: &'static str,
    /// The identifier that was not found.
    pub id: String,
}

/// Why a sensor produced an invalid reading.
///
/// Used as a structured diagnostic field; never returned as an `Err`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadFailure {
    /// Stability or communication-range checks failed.
    Disconnected,
    /// The value was readable but physically implausible.
    OutOfRange,
    /// A transient failure that will be retried on a later tick.
    Transient,
}

impl std::fmt::Display for ReadFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disconnected => f.write_str("disconnected"),
            Self::OutOfRange => f.write_str("out_of_range"),
            Self::Transient => f.write_str("transient"),
        }
    }
}
