//! Error Types for the Positioning Scheduler
//!
//! ## Design Philosophy
//!
//! Almost nothing in the scheduler is allowed to fail. Duty-cycle blocks,
//! undersized payload windows and empty scans are ordinary outcomes that the
//! pacer and the session state machine absorb, and a missing assistance
//! record simply produces the conservative answer. The error type below
//! only covers the seams where input arrives from outside the core:
//!
//! 1. **Downlink decoding**: malformed or unknown payloads from the network.
//! 2. **Configuration**: values outside the ranges the firmware supports.
//! 3. **Drivers**: a sensor that refuses to power on.
//! 4. **Receiver commands**: assistance sentences that were never acknowledged.
//!
//! Scheduler entry points log these and carry on; they never propagate out of
//! an alarm tick.
//!
//! Like everything else in the crate, the error is `Copy`, carries only
//! `&'static str` context and stays small enough to return by value.
//!
//! ```rust
//! use trackpace_core::{TrackerError, downlink::decode_vessel_position};
//!
//! match decode_vessel_position(&[0x07, 0, 0]) {
//!     Err(TrackerError::InvalidDownlink { .. }) => {} // ignore and keep tracking
//!     _ => unreachable!(),
//! }
//! ```

use thiserror_no_std::Error;

/// Result type for fallible scheduler operations
pub type TrackerResult<T> = Result<T, TrackerError>;

/// Scheduler errors - kept small for embedded use
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerError {
    /// Downlink payload could not be decoded
    #[error("Invalid downlink: {reason}")]
    InvalidDownlink {
        /// What was wrong with the payload
        reason: &'static str,
    },

    /// Configuration value outside the supported range
    #[error("Invalid configuration: {field} out of range")]
    InvalidConfig {
        /// Name of the offending field
        field: &'static str,
    },

    /// Sensor driver failed to start a scan
    #[error("Sensor driver error: {reason}")]
    Driver {
        /// Driver-supplied description
        reason: &'static str,
    },

    /// Receiver never acknowledged an assistance command
    #[error("Command {command} not acknowledged after {attempts} attempts")]
    CommandNotAcknowledged {
        /// PAIR command identifier
        command: u16,
        /// Number of transmissions made
        attempts: u8,
    },

    /// Receiver rejected an assistance command
    #[error("Command {command} rejected with code {code}")]
    CommandRejected {
        /// PAIR command identifier
        command: u16,
        /// Result code from the acknowledgment
        code: u8,
    },

    /// Encoded data does not fit its fixed buffer
    #[error("Buffer overflow: need {required} bytes, capacity {capacity}")]
    BufferOverflow {
        /// Bytes required
        required: usize,
        /// Bytes available
        capacity: usize,
    },
}

#[cfg(feature = "defmt")]
impl defmt::Format for TrackerError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::InvalidDownlink { reason } =>
                defmt::write!(fmt, "Invalid downlink: {}", reason),
            Self::InvalidConfig { field } =>
                defmt::write!(fmt, "Invalid config: {}", field),
            Self::Driver { reason } =>
                defmt::write!(fmt, "Driver: {}", reason),
            Self::CommandNotAcknowledged { command, attempts } =>
                defmt::write!(fmt, "PAIR{} no ack after {}", command, attempts),
            Self::CommandRejected { command, code } =>
                defmt::write!(fmt, "PAIR{} rejected ({})", command, code),
            Self::BufferOverflow { required, capacity } =>
                defmt::write!(fmt, "Need {} bytes, have {}", required, capacity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_stay_small() {
        assert!(core::mem::size_of::<TrackerError>() <= 24);
    }

    #[cfg(feature = "std")]
    #[test]
    fn display_carries_context() {
        let err = TrackerError::CommandNotAcknowledged { command: 590, attempts: 3 };
        assert_eq!(err.to_string(), "Command 590 not acknowledged after 3 attempts");
    }
}
