//! # PJLink Client
//!
//! An async client for the PJLink projector control protocol:
//! - One TCP connection per command, torn down after the exchange
//! - Optional MD5 challenge-response authentication
//! - Class 1 (`%1`) and class 2 (`%2`) command framing
//! - Bounded retry with per-attempt response timeout and close grace window
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Projector                             │
//! │        (power / input / mute / lamps / identity)             │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                        Session                               │
//! │                 perform_command(spec)                        │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                        Exchange                              │
//! │          (Attempt chain: timeout / retry / close)            │
//! └──────────┬──────────────────────────────────┬───────────────┘
//!            │                                  │
//!            ▼                                  ▼
//!   ┌─────────────────┐                ┌─────────────────┐
//!   │   Connection    │                │  Codec + Auth   │
//!   │ (TCP, CR lines) │                │ (pure framing)  │
//!   └─────────────────┘                └─────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod auth;
pub mod protocol;
pub mod network;
pub mod session;
pub mod projector;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{AttemptError, PjlinkError, Result};
pub use config::{Config, TransportErrorPolicy, DEFAULT_PORT};
pub use protocol::{Argument, CommandCode, CommandSpec, Outcome};
pub use session::Session;
pub use projector::Projector;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of the client
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
