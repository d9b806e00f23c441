//! Virtual board error types.

use domotik_domain::error::DomotikError;

/// Errors specific to the virtual board.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VirtualBoardError {
    /// The pin number does not exist on the simulated board.
    #[error("pin {pin} does not exist (max {max})")]
    UnknownPin { pin: u8, max: u8 },
}

impl VirtualBoardError {
    /// Convert into a [`DomotikError::Hardware`] for propagation across port
    /// boundaries.
    #[must_use]
    pub fn into_domain(self) -> DomotikError {
        DomotikError::Hardware(Box::new(self))
    }
}

impl From<VirtualBoardError> for DomotikError {
    fn from(err: VirtualBoardError) -> Self {
        err.into_domain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_unknown_pin_error() {
        let err = VirtualBoardError::UnknownPin { pin: 60, max: 48 };
        assert_eq!(err.to_string(), "pin 60 does not exist (max 48)");
    }

    #[test]
    fn should_convert_to_hardware_error() {
        let err: DomotikError = VirtualBoardError::UnknownPin { pin: 60, max: 48 }.into();
        assert!(matches!(err, DomotikError::Hardware(_)));
    }
}
