//! Configuration for a PJLink session
//!
//! Centralized configuration with sensible defaults.

use std::fmt;
use std::time::Duration;

/// Default PJLink TCP port
pub const DEFAULT_PORT: u16 = 4352;

/// Per-device configuration. Read-only once a session owns it.
#[derive(Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Device Configuration
    // -------------------------------------------------------------------------
    /// Projector host name or IP address
    pub host: String,

    /// Projector TCP port
    pub port: u16,

    /// Shared secret used when the projector issues a challenge
    pub password: Option<String>,

    // -------------------------------------------------------------------------
    // Exchange Configuration
    // -------------------------------------------------------------------------
    /// Time allowed per attempt from connect until a response line (milliseconds)
    pub response_timeout_ms: u64,

    /// Time allowed for the peer to confirm a graceful close (milliseconds)
    pub close_grace_ms: u64,

    /// Retries after the first attempt before giving up
    pub max_retries: u32,

    /// What to do when the socket itself reports an error
    pub transport_errors: TransportErrorPolicy,
}

/// Handling of connect/read/write errors during an attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportErrorPolicy {
    /// Log the error and let the response timer decide the attempt
    #[default]
    LogOnly,

    /// Fail the attempt immediately; it is retried like any other failure
    FailAttempt,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            password: None,
            response_timeout_ms: 2000,
            close_grace_ms: 200,
            max_retries: 5,
            transport_errors: TransportErrorPolicy::LogOnly,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("response_timeout_ms", &self.response_timeout_ms)
            .field("close_grace_ms", &self.close_grace_ms)
            .field("max_retries", &self.max_retries)
            .field("transport_errors", &self.transport_errors)
            .finish()
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Response window for one attempt
    pub fn response_timeout(&self) -> Duration {
        Duration::from_millis(self.response_timeout_ms)
    }

    /// Grace window for a graceful close
    pub fn close_grace(&self) -> Duration {
        Duration::from_millis(self.close_grace_ms)
    }

    /// Password used for digests; absent means empty.
    pub fn password_or_empty(&self) -> &str {
        self.password.as_deref().unwrap_or("")
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the projector host
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the projector port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the shared password
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.config.password = Some(password.into());
        self
    }

    /// Set the per-attempt response timeout (in milliseconds)
    pub fn response_timeout_ms(mut self, ms: u64) -> Self {
        self.config.response_timeout_ms = ms;
        self
    }

    /// Set the close grace window (in milliseconds)
    pub fn close_grace_ms(mut self, ms: u64) -> Self {
        self.config.close_grace_ms = ms;
        self
    }

    /// Set the number of retries after the first attempt
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    /// Set the transport error policy
    pub fn transport_errors(mut self, policy: TransportErrorPolicy) -> Self {
        self.config.transport_errors = policy;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
