//! Protocol codec
//!
//! Building request lines and classifying response lines. Everything here is
//! pure; [`LineCodec`] adapts the same framing to a `tokio_util` transport.
//!
//! ## Wire Format
//!
//! ### Request
//! ```text
//! ┌──────────────┬─────────┬──────────┬─────┬─────────┬──────┐
//! │ Digest (32)? │ Tag (2) │ Cmd (4)  │ ' ' │   Arg   │  CR  │
//! └──────────────┴─────────┴──────────┴─────┴─────────┴──────┘
//! ```
//!
//! ### Response
//! ```text
//! ┌─────────┬──────────┬─────┬───────────────────────┬──────┐
//! │ Tag (2) │ Cmd (4)  │ '=' │  OK | value | ERRn    │  CR  │
//! └─────────┴──────────┴─────┴───────────────────────┴──────┘
//! ```

use std::io;

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use super::{Argument, CommandCode, DeviceError, Greeting, ParsedResponse, VersionTag};
use crate::auth::{self, SEED_LEN};

/// Line terminator
pub const TERMINATOR: u8 = b'\r';

/// Greeting sent when a challenge is required (followed by the seed)
pub const AUTH_GREETING: &[u8; 9] = b"PJLINK 1 ";

/// Greeting sent when no challenge is required
pub const NO_AUTH_GREETING: &[u8; 8] = b"PJLINK 0";

/// Tag (2) + command (4) + '='
pub const RESPONSE_PREFIX_LEN: usize = 7;

/// Longest line accepted without a terminator
pub const MAX_LINE_LENGTH: usize = 1024;

// =============================================================================
// Request Encoding
// =============================================================================

/// Encode a request line without a digest
pub fn build_plain_line(tag: VersionTag, code: CommandCode, argument: Argument) -> Vec<u8> {
    let argument = argument.to_string();
    let mut line = Vec::with_capacity(2 + 4 + 1 + argument.len() + 1);
    line.extend_from_slice(tag.as_bytes());
    line.extend_from_slice(code.as_bytes());
    line.push(b' ');
    line.extend_from_slice(argument.as_bytes());
    line.push(TERMINATOR);
    line
}

/// Encode a request line prefixed with the digest for `seed` and `password`
pub fn build_authenticated_line(
    seed: &str,
    password: &str,
    tag: VersionTag,
    code: CommandCode,
    argument: Argument,
) -> Vec<u8> {
    let digest = auth::digest(seed, password);
    let plain = build_plain_line(tag, code, argument);

    let mut line = Vec::with_capacity(digest.len() + plain.len());
    line.extend_from_slice(digest.as_bytes());
    line.extend_from_slice(&plain);
    line
}

// =============================================================================
// Response Decoding
// =============================================================================

/// Classify a line as one of the two greetings, or neither
pub fn classify_greeting(line: &[u8]) -> Greeting {
    if let Some(rest) = line.strip_prefix(&AUTH_GREETING[..]) {
        return match rest.get(..SEED_LEN) {
            Some(seed) if seed.iter().all(u8::is_ascii_graphic) => {
                // all-ASCII, so the conversion is lossless
                Greeting::NeedsAuth(String::from_utf8_lossy(seed).into_owned())
            }
            _ => Greeting::NotAGreeting,
        };
    }

    if line.starts_with(&NO_AUTH_GREETING[..]) {
        return Greeting::NoAuth;
    }

    Greeting::NotAGreeting
}

/// Classify a response line against the request it answers
///
/// A query tail that is exactly a standard error token is a rejection, not a
/// payload.
pub fn parse_response(
    line: &[u8],
    tag: VersionTag,
    code: CommandCode,
    is_query: bool,
) -> ParsedResponse {
    let body = strip_terminator(line);

    let mut prefix = [0u8; RESPONSE_PREFIX_LEN];
    prefix[..2].copy_from_slice(tag.as_bytes());
    prefix[2..6].copy_from_slice(code.as_bytes());
    prefix[6] = b'=';

    let Some(tail) = body.strip_prefix(&prefix[..]) else {
        return ParsedResponse::Malformed;
    };
    let tail = String::from_utf8_lossy(tail).into_owned();

    if is_query {
        if DeviceError::from_token(&tail).is_some() {
            ParsedResponse::Rejected(tail)
        } else {
            ParsedResponse::Payload(tail)
        }
    } else if tail.starts_with("OK") {
        ParsedResponse::Ack
    } else {
        ParsedResponse::Rejected(tail)
    }
}

/// True for the bare `PJLINK ERRA` line sent when a digest is wrong
pub fn is_auth_failure(line: &[u8]) -> bool {
    strip_terminator(line) == b"PJLINK ERRA"
}

/// Drop trailing CR / LF
fn strip_terminator(line: &[u8]) -> &[u8] {
    let mut end = line.len();
    while end > 0 && matches!(line[end - 1], b'\r' | b'\n') {
        end -= 1;
    }
    &line[..end]
}

// =============================================================================
// Stream Framing
// =============================================================================

/// Splits a byte stream into CR-terminated lines
///
/// Yielded lines keep their terminator. A partial line left when the peer
/// closes is still yielded.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineCodec;

impl Decoder for LineCodec {
    type Item = BytesMut;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> io::Result<Option<BytesMut>> {
        if let Some(pos) = src.iter().position(|b| *b == TERMINATOR) {
            return Ok(Some(src.split_to(pos + 1)));
        }

        if src.len() > MAX_LINE_LENGTH {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("line exceeds {} bytes without terminator", MAX_LINE_LENGTH),
            ));
        }

        Ok(None)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> io::Result<Option<BytesMut>> {
        match self.decode(src)? {
            Some(line) => Ok(Some(line)),
            None if src.is_empty() => Ok(None),
            None => Ok(Some(src.split())),
        }
    }
}

impl Encoder<Vec<u8>> for LineCodec {
    type Error = io::Error;

    fn encode(&mut self, line: Vec<u8>, dst: &mut BytesMut) -> io::Result<()> {
        dst.extend_from_slice(&line);
        Ok(())
    }
}
