//! Error types
//!
//! Every fallible operation of this crate returns [`Error`]. Pin and bus errors coming from the
//! HAL are reduced to their portable `ErrorKind`, so [`Error`] stays `Copy` and does not carry
//! the HAL's type parameters around.

use embedded_hal::{digital, i2c};

use crate::config::CommMode;

/// Top level error of the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Configuration rejected before any hardware access
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// A pin or bus operation failed, the operation was aborted at that point
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    /// Argument rejected before any hardware access
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
}

/// Errors raised while validating a [`Config`](crate::config::Config)
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Raw display size index outside of the supported geometries
    #[error("display size index {0} is out of range")]
    InvalidSize(u8),

    /// Raw communication mode index outside of the supported modes
    #[error("communication mode index {0} is out of range")]
    InvalidMode(u8),

    /// The configured mode doesn't match the sender handed to [`Lcd::new`](crate::lcd::Lcd::new)
    #[error("configured for {configured:?} but the sender drives {transport:?}")]
    ModeMismatch {
        /// mode in the config
        configured: CommMode,
        /// mode of the sender
        transport: CommMode,
    },
}

/// Errors raised by a [`SendCommand`](crate::sender::SendCommand) implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// Setting or reading a GPIO line failed
    #[error("pin {line:?} failed: {kind:?}")]
    Pin {
        /// which line of the parallel bus
        line: Line,
        /// HAL reported error kind
        kind: digital::ErrorKind,
    },

    /// The I2C write to the expander failed
    #[error("i2c bus failed: {0:?}")]
    Bus(i2c::ErrorKind),

    /// The sender can't read the status register (no R/W line)
    #[error("sender can't read from the controller")]
    Unsupported,
}

/// A named line of the parallel bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Line {
    /// register select
    Rs,
    /// read / write
    Rw,
    /// enable
    En,
    /// data line, `Db(n)` is DBn
    Db(u8),
}

impl TransportError {
    pub(crate) fn pin<E: digital::Error>(line: Line, e: E) -> Self {
        TransportError::Pin {
            line,
            kind: e.kind(),
        }
    }

    pub(crate) fn bus<E: i2c::Error>(e: E) -> Self {
        TransportError::Bus(e.kind())
    }
}
