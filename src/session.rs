//! Session Module
//!
//! The per-device entry point for sending commands.
//!
//! ## Responsibilities
//! - Hold the device configuration (read-only)
//! - Hand each command to a fresh [`Exchange`]
//!
//! ## Concurrency
//! A `Session` is cheap to clone and safe to share. Concurrent commands each
//! open their own connection; the projector handles one exchange at a time,
//! so callers talking to the same device should serialize their calls.

use std::sync::Arc;

use crate::config::Config;
use crate::error::{PjlinkError, Result};
use crate::network::Exchange;
use crate::protocol::{CommandCode, CommandSpec, Outcome};

/// Configuration-only handle to one projector
#[derive(Debug, Clone)]
pub struct Session {
    config: Arc<Config>,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run one logical command to completion
    ///
    /// Retries are internal; the error of the final attempt is returned as
    /// `PjlinkError::RetryExhausted`.
    pub async fn perform_command(&self, spec: CommandSpec) -> Result<Outcome> {
        tracing::trace!("Performing {} on {}", spec, self.config.host);
        Exchange::new(&self.config, spec).run().await
    }

    /// Send a set command, expecting `OK`
    pub async fn set(&self, code: CommandCode, value: u32) -> Result<()> {
        match self.perform_command(CommandSpec::set(code, value)).await? {
            Outcome::Ack => Ok(()),
            Outcome::Payload(payload) => Err(PjlinkError::UnexpectedPayload(payload)),
        }
    }

    /// Send a query, returning the value text
    pub async fn query(&self, code: CommandCode) -> Result<String> {
        match self.perform_command(CommandSpec::query(code)).await? {
            Outcome::Payload(payload) => Ok(payload),
            Outcome::Ack => Err(PjlinkError::UnexpectedPayload("OK".to_string())),
        }
    }
}
