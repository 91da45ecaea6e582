//! Response definitions
//!
//! Classification results for inbound lines.

use std::fmt;

/// First line sent by a projector after connect
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Greeting {
    /// `PJLINK 1 <seed>`: requests must carry a digest
    NeedsAuth(String),

    /// `PJLINK 0`: no authentication
    NoAuth,

    /// Not a greeting; treat as a command response
    NotAGreeting,
}

/// A response line classified against the request that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedResponse {
    /// `OK` for a set command
    Ack,

    /// Value returned by a query
    Payload(String),

    /// Anything else after the `=`, raw
    Rejected(String),

    /// Prefix did not match the request's tag and command
    Malformed,
}

/// Successful result of a logical command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Ack,
    Payload(String),
}

/// Standard device error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceError {
    /// `ERR1`
    UndefinedCommand,

    /// `ERR2`: parameter out of range or nonexistent
    OutOfParameter,

    /// `ERR3`: projector temporarily busy
    UnavailableTime,

    /// `ERR4`
    ProjectorFailure,

    /// `ERRA`: digest did not match
    Authorization,
}

impl DeviceError {
    /// Parse a raw response tail such as `"ERR2"`.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim_end() {
            "ERR1" => Some(DeviceError::UndefinedCommand),
            "ERR2" => Some(DeviceError::OutOfParameter),
            "ERR3" => Some(DeviceError::UnavailableTime),
            "ERR4" => Some(DeviceError::ProjectorFailure),
            "ERRA" => Some(DeviceError::Authorization),
            _ => None,
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            DeviceError::UndefinedCommand => "ERR1",
            DeviceError::OutOfParameter => "ERR2",
            DeviceError::UnavailableTime => "ERR3",
            DeviceError::ProjectorFailure => "ERR4",
            DeviceError::Authorization => "ERRA",
        }
    }
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let meaning = match self {
            DeviceError::UndefinedCommand => "undefined command",
            DeviceError::OutOfParameter => "out of parameter",
            DeviceError::UnavailableTime => "unavailable time",
            DeviceError::ProjectorFailure => "projector failure",
            DeviceError::Authorization => "authorization failed",
        };
        write!(f, "{} ({})", self.token(), meaning)
    }
}
