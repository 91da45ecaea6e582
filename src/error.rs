//! Error types for the PJLink client
//!
//! Two layers:
//! - [`AttemptError`]: why a single connect/exchange/close attempt failed.
//!   Its `Display` text is what the caller finally sees once retries run out.
//! - [`PjlinkError`]: the crate-level error returned from public operations.

use thiserror::Error;

use crate::projector::Input;
use crate::protocol::DeviceError;

/// Result type alias using PjlinkError
pub type Result<T> = std::result::Result<T, PjlinkError>;

/// Unified error type for PJLink operations
#[derive(Debug, Error)]
pub enum PjlinkError {
    // -------------------------------------------------------------------------
    // Command Errors
    // -------------------------------------------------------------------------
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    // -------------------------------------------------------------------------
    // Exchange Errors
    // -------------------------------------------------------------------------
    /// Every attempt failed. Displays the last attempt's error verbatim.
    #[error("{last}")]
    RetryExhausted { attempts: u32, last: AttemptError },

    // -------------------------------------------------------------------------
    // Projector Errors
    // -------------------------------------------------------------------------
    #[error("Input {0} does not exist on projector")]
    InputUnavailable(Input),

    #[error("Unexpected payload from projector: {0}")]
    UnexpectedPayload(String),
}

impl PjlinkError {
    /// The standard device error code behind this failure, if any.
    pub fn device_error(&self) -> Option<DeviceError> {
        match self {
            PjlinkError::RetryExhausted { last, .. } => last.device_error(),
            _ => None,
        }
    }
}

/// Failure of a single attempt. Every variant is retried.
#[derive(Debug, Error)]
pub enum AttemptError {
    /// No response line arrived within the response window.
    #[error("Failed command to projector")]
    Timeout,

    /// The response did not start with the expected tag and command.
    #[error("Unexpected answer from projector")]
    Malformed,

    /// The device answered with something other than OK.
    #[error("Projector returned error: {0}")]
    Rejected(String),

    /// The peer did not confirm the close within the grace window.
    #[error("Failed to close connection to projector")]
    CloseFailed,

    /// Forced teardown after a timeout failed.
    #[error("Failed to destroy connection to projector after command {command} {argument}: {source}")]
    AbortFailed {
        command: String,
        argument: String,
        #[source]
        source: std::io::Error,
    },

    /// Socket fault, only produced under `TransportErrorPolicy::FailAttempt`.
    #[error("Transport error: {0}")]
    Transport(#[source] std::io::Error),
}

impl AttemptError {
    /// Standard device error code carried by a rejection.
    pub fn device_error(&self) -> Option<DeviceError> {
        match self {
            AttemptError::Rejected(tail) => DeviceError::from_token(tail),
            _ => None,
        }
    }
}
