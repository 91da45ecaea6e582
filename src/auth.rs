//! Challenge-response digest
//!
//! When a projector greets with `PJLINK 1 <seed>`, every request line is
//! prefixed with `md5(seed + password)` in lowercase hex. The device computes
//! the same value; a mismatch comes back as `PJLINK ERRA`.

use md5::{Digest, Md5};

/// Length of the challenge seed issued by the projector
pub const SEED_LEN: usize = 8;

/// Length of the hex digest prepended to authenticated requests
pub const DIGEST_HEX_LEN: usize = 32;

/// Compute the lowercase hex digest for a challenge seed and password.
pub fn digest(seed: &str, password: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(seed.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}
