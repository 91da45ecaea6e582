//! Network Module
//!
//! TCP connection handling and the per-command exchange.
//!
//! ## Architecture
//! - One fresh connection per attempt, never reused
//! - Exchange drives attempts until success or retry exhaustion
//! - Response timer per attempt; close grace window runs after it, so one
//!   attempt can last up to `response_timeout + close_grace`

mod connection;
mod exchange;

pub use connection::Connection;
pub use exchange::{Attempt, Exchange};
