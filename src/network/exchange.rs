//! Command exchange state machine
//!
//! Carries one logical command to a resolution, across up to
//! `max_retries + 1` attempts.
//!
//! ## Attempt Lifecycle
//! ```text
//!  Connecting ──► AwaitingFirstData ──► Closing ──► Resolved
//!       │          │  ▲        │           │
//!       │          └──┘        │           └──► next Attempt (Rejected / Malformed / CloseFailed)
//!       │       greeting:      │
//!       │       send request   │
//!       └──────────────────────┴──► timer fired: abort ──► next Attempt
//! ```
//!
//! The response timer covers Connecting and AwaitingFirstData. Once a
//! response line is in hand the timer is disarmed, so it can never resolve an
//! attempt that has reached Closing. The close grace window is not counted
//! against `response_timeout`, so an attempt may overrun it by up to
//! `close_grace`.

use std::io;

use bytes::BytesMut;

use crate::config::{Config, TransportErrorPolicy};
use crate::error::{AttemptError, PjlinkError, Result};
use crate::protocol::{
    build_authenticated_line, build_plain_line, classify_greeting, is_auth_failure,
    parse_response, CommandSpec, Greeting, Outcome, ParsedResponse, VersionTag,
};

use super::Connection;

/// Retry bookkeeping for one logical command
///
/// Advanced by value: each failure consumes the current attempt and yields
/// either the next one or the terminal error.
#[derive(Debug)]
pub struct Attempt {
    /// 0 for the first try
    retry: u32,

    /// Failure of the previous try
    carried: Option<AttemptError>,
}

impl Attempt {
    pub fn first() -> Self {
        Self {
            retry: 0,
            carried: None,
        }
    }

    pub fn retry(&self) -> u32 {
        self.retry
    }

    pub fn carried(&self) -> Option<&AttemptError> {
        self.carried.as_ref()
    }

    /// Record a failure and move to the next attempt
    ///
    /// Once the next retry would exceed `max_retries`, returns
    /// `RetryExhausted` carrying `error`.
    pub fn advance(self, error: AttemptError, max_retries: u32) -> Result<Attempt> {
        let retry = self.retry + 1;
        if retry > max_retries {
            return Err(PjlinkError::RetryExhausted {
                attempts: retry,
                last: error,
            });
        }
        Ok(Attempt {
            retry,
            carried: Some(error),
        })
    }
}

/// One logical command against one projector
pub struct Exchange<'a> {
    config: &'a Config,
    spec: CommandSpec,

    /// Fixed for every attempt of this command
    tag: VersionTag,
}

impl<'a> Exchange<'a> {
    pub fn new(config: &'a Config, spec: CommandSpec) -> Self {
        Self {
            config,
            spec,
            tag: spec.version_tag(),
        }
    }

    /// Drive attempts until one succeeds or the retry budget runs out
    pub async fn run(self) -> Result<Outcome> {
        let mut attempt = Attempt::first();

        loop {
            if let Some(previous) = attempt.carried() {
                tracing::debug!(
                    "Retrying {} on {} (retry {}): {}",
                    self.spec,
                    self.config.host,
                    attempt.retry(),
                    previous
                );
            }

            match self.attempt().await {
                Ok(outcome) => {
                    tracing::debug!(
                        "{} on {} resolved after {} retries",
                        self.spec,
                        self.config.host,
                        attempt.retry()
                    );
                    return Ok(outcome);
                }
                Err(error) => {
                    attempt = attempt
                        .advance(error, self.config.max_retries)
                        .map_err(|e| {
                            tracing::warn!(
                                "{} on {} failed after all retries: {}",
                                self.spec,
                                self.config.host,
                                e
                            );
                            e
                        })?;
                }
            }
        }
    }

    /// One connect / exchange / close cycle
    async fn attempt(&self) -> std::result::Result<Outcome, AttemptError> {
        let mut slot: Option<Connection> = None;

        let awaited =
            tokio::time::timeout(self.config.response_timeout(), self.await_response(&mut slot))
                .await;

        match awaited {
            Ok(Ok(line)) => {
                // await_response only returns a line after filling the slot
                if let Some(connection) = slot.take() {
                    connection.close(self.config.close_grace()).await?;
                }
                self.resolve(&line)
            }
            Ok(Err(e)) => {
                if let Some(connection) = slot.take() {
                    if let Err(abort_err) = connection.abort() {
                        tracing::debug!("Abort after transport error reported: {}", abort_err);
                    }
                }
                Err(AttemptError::Transport(e))
            }
            Err(_elapsed) => {
                tracing::debug!(
                    "No response to {} from {} within {:?}",
                    self.spec,
                    self.config.host,
                    self.config.response_timeout()
                );
                if let Some(connection) = slot.take() {
                    connection
                        .abort()
                        .map_err(|source| AttemptError::AbortFailed {
                            command: self.spec.code.to_string(),
                            argument: self.spec.argument.to_string(),
                            source,
                        })?;
                }
                Err(AttemptError::Timeout)
            }
        }
    }

    /// Connect, answer greetings, and return the first non-greeting line
    ///
    /// The connection is parked in `slot` so the caller can still tear it
    /// down if this future is cancelled by the timer.
    async fn await_response(&self, slot: &mut Option<Connection>) -> io::Result<BytesMut> {
        let connection = match Connection::open(&self.config.host, self.config.port).await {
            Ok(connection) => slot.insert(connection),
            Err(e) => return self.transport_fault("connect", e).await,
        };

        loop {
            let line = match connection.next_line().await {
                Some(Ok(line)) => line,
                Some(Err(e)) => return self.transport_fault("read", e).await,
                None => {
                    let eof = io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "connection closed before response",
                    );
                    return self.transport_fault("read", eof).await;
                }
            };

            let request = match classify_greeting(&line) {
                Greeting::NeedsAuth(seed) => {
                    tracing::trace!("{} issued challenge", connection.peer_addr());
                    if self.config.password.is_none() {
                        tracing::warn!(
                            "{} requires a password but none is configured",
                            connection.peer_addr()
                        );
                    }
                    build_authenticated_line(
                        &seed,
                        self.config.password_or_empty(),
                        self.tag,
                        self.spec.code,
                        self.spec.argument,
                    )
                }
                Greeting::NoAuth => {
                    build_plain_line(self.tag, self.spec.code, self.spec.argument)
                }
                Greeting::NotAGreeting => return Ok(line),
            };

            if let Err(e) = connection.send_line(request).await {
                return self.transport_fault("write", e).await;
            }
        }
    }

    /// Apply the transport error policy
    ///
    /// Under `LogOnly` this never returns; the response timer ends the attempt.
    async fn transport_fault(&self, stage: &str, error: io::Error) -> io::Result<BytesMut> {
        tracing::warn!(
            "Transport {} error talking to {}:{}: {}",
            stage,
            self.config.host,
            self.config.port,
            error
        );

        match self.config.transport_errors {
            TransportErrorPolicy::LogOnly => std::future::pending().await,
            TransportErrorPolicy::FailAttempt => Err(error),
        }
    }

    /// Map a parsed response onto the attempt's result
    fn resolve(&self, line: &[u8]) -> std::result::Result<Outcome, AttemptError> {
        match parse_response(line, self.tag, self.spec.code, self.spec.argument.is_query()) {
            ParsedResponse::Ack => Ok(Outcome::Ack),
            ParsedResponse::Payload(payload) => Ok(Outcome::Payload(payload)),
            ParsedResponse::Rejected(tail) => {
                tracing::debug!("{} rejected by {}: {}", self.spec, self.config.host, tail);
                Err(AttemptError::Rejected(tail))
            }
            ParsedResponse::Malformed => {
                if is_auth_failure(line) {
                    tracing::warn!("{} rejected the password", self.config.host);
                } else {
                    tracing::debug!(
                        "Unexpected answer to {} from {}: {:?}",
                        self.spec,
                        self.config.host,
                        String::from_utf8_lossy(line)
                    );
                }
                Err(AttemptError::Malformed)
            }
        }
    }
}
