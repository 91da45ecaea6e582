//! Protocol Module
//!
//! Defines the PJLink wire protocol: line-oriented ASCII over TCP.
//!
//! ## Session Shape
//! ```text
//!  projector                         client
//!     │ ── PJLINK 0\r  |  PJLINK 1 <seed>\r ──►  │
//!     │ ◄── [digest]%1POWR 1\r ───────────────── │
//!     │ ── %1POWR=OK\r ────────────────────────► │
//!     │                  close                   │
//! ```
//!
//! ### Class Tags
//! - `%1`: class 1 commands (POWR, INPT, AVMT, ERST, LAMP, INST, NAME, INF1, INF2, INFO, CLSS)
//! - `%2`: class 2 commands (SNUM, SVER, INNM, IRES, RRES, FILT, RLMP, RFIL, SVOL, MVOL, FREZ)
//!
//! ### Error Tokens
//! - ERR1: undefined command
//! - ERR2: out of parameter
//! - ERR3: unavailable time
//! - ERR4: projector failure

mod command;
mod response;
mod codec;

pub use command::{Argument, CommandCode, CommandSpec, VersionTag, CLASS2_COMMANDS, QUERY_MARKER};
pub use response::{DeviceError, Greeting, Outcome, ParsedResponse};
pub use codec::{
    build_authenticated_line, build_plain_line, classify_greeting, is_auth_failure,
    parse_response, LineCodec, AUTH_GREETING, MAX_LINE_LENGTH, NO_AUTH_GREETING,
    RESPONSE_PREFIX_LEN, TERMINATOR,
};
