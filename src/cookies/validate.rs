//! Byte-level validation of raw cookie header strings.
//!
//! Only printable ASCII (`0x20..=0x7E`) is accepted. Inputs are scanned in
//! fixed-width blocks with a min/max reduction that the compiler turns into
//! vector instructions, and the tail is checked byte by byte.

use crate::cookies::error::{CookieError, CookieResult};

const MIN_BYTE: u8 = 32;
const MAX_BYTE: u8 = 126;
const BLOCK: usize = 32;

/// Validate a raw cookie string.
pub fn validate(bytes: &[u8]) -> CookieResult<()> {
    if bytes.is_empty() {
        return Err(CookieError::Empty);
    }

    let blocks = bytes.chunks_exact(BLOCK);
    let tail = blocks.remainder();

    for block in blocks {
        let (min, max) = block
            .iter()
            .fold((u8::MAX, u8::MIN), |(lo, hi), &b| (lo.min(b), hi.max(b)));
        if min < MIN_BYTE || max > MAX_BYTE {
            return Err(CookieError::InvalidByteSequence);
        }
    }

    if tail.iter().any(|&b| !is_allowed(b)) {
        return Err(CookieError::InvalidByteSequence);
    }

    Ok(())
}

#[inline]
fn is_allowed(b: u8) -> bool {
    (MIN_BYTE..=MAX_BYTE).contains(&b)
}
