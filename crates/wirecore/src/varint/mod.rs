//! Base-128 varint decoding and encoding.
//!
//! A varint stores an unsigned 64-bit integer in 1 to 10 bytes, least
//! significant group first. Each byte carries 7 value bits; the high bit is
//! set when more bytes follow.
//!
//! The word-parallel decoders read a full [`Window`] of
//! [`MAX_VARINT_LEN`] bytes regardless of where the varint ends. [`decode`]
//! takes an arbitrary slice: when fewer than [`MAX_VARINT_LEN`] bytes remain
//! it switches to [`decode_guarded`], which branches on every byte and never
//! reads past the end of the input. Callers that pad their buffers can call
//! [`decode_fast`] on a window directly.
//!
//! ```rust
//! use wirecore::varint::{self, Decoded};
//!
//! assert_eq!(varint::decode(&[0x96, 0x01]), Ok(Decoded { value: 150, len: 2 }));
//! ```

#[cfg(feature = "comparison")]
pub mod algorithms;
#[cfg(not(feature = "comparison"))]
pub(crate) mod algorithms;


use crate::DecodeError;

/// Longest possible encoding of a `u64`.
pub const MAX_VARINT_LEN: usize = 10;

/// The readable window the unchecked decoders operate on.
pub type Window = [u8; MAX_VARINT_LEN];

/// A successfully decoded varint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Decoded {
    /// The decoded integer.
    pub value: u64,
    /// Number of input bytes the encoding occupied.
    pub len: usize,
}

/// Decode a varint from a full window using the fastest algorithm for the
/// target's word size.
///
/// 64-bit targets use the two-byte check followed by the branchless 8-byte
/// fold; other targets use the 32-bit branching decoder.
#[inline]
pub fn decode_fast(buf: &Window) -> Result<Decoded, DecodeError> {
    #[cfg(target_pointer_width = "64")]
    {
        algorithms::decode_check2_massimino(buf)
    }
    #[cfg(not(target_pointer_width = "64"))]
    {
        algorithms::decode_branch32(buf)
    }
}

/// Decode a varint from the front of `buf`.
///
/// # Errors
///
/// [`DecodeError::Unterminated`] if the first ten bytes all have their
/// continuation bit set, [`DecodeError::Truncated`] if `buf` ends first.
#[inline]
pub fn decode(buf: &[u8]) -> Result<Decoded, DecodeError> {
    match buf.first_chunk::<MAX_VARINT_LEN>() {
        Some(window) => decode_fast(window),
        None => decode_guarded(buf),
    }
}

/// Byte-at-a-time decoder that tolerates short input.
///
/// # Errors
///
/// Same as [`decode`].
pub fn decode_guarded(buf: &[u8]) -> Result<Decoded, DecodeError> {
    let mut value = 0u64;
    for (i, &b) in buf.iter().take(MAX_VARINT_LEN).enumerate() {
        value |= u64::from(b & 0x7f) << (7 * i);
        if b & 0x80 == 0 {
            return Ok(Decoded { value, len: i + 1 });
        }
    }
    if buf.len() >= MAX_VARINT_LEN {
        Err(DecodeError::Unterminated)
    } else {
        Err(DecodeError::Truncated {
            available: buf.len(),
        })
    }
}

/// Encode `value` into `out`, returning the number of bytes written.
#[allow(clippy::cast_possible_truncation)]
pub fn encode(mut value: u64, out: &mut Window) -> usize {
    let mut i = 0;
    while value >= 0x80 {
        out[i] = (value as u8) | 0x80;
        value >>= 7;
        i += 1;
    }
    out[i] = value as u8;
    i + 1
}

/// Number of bytes [`encode`] writes for `value`.
#[must_use]
pub const fn encoded_len(value: u64) -> usize {
    let bits = 64 - (value | 1).leading_zeros() as usize;
    bits.div_ceil(7)
}

/// Map a signed 32-bit integer onto an unsigned one so that small magnitudes
/// encode short (`sint32`).
#[must_use]
#[allow(clippy::cast_sign_loss)]
pub const fn zigzag_encode_32(n: i32) -> u32 {
    ((n << 1) ^ (n >> 31)) as u32
}

/// Inverse of [`zigzag_encode_32`].
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub const fn zigzag_decode_32(n: u32) -> i32 {
    ((n >> 1) as i32) ^ -((n & 1) as i32)
}

/// Map a signed 64-bit integer onto an unsigned one (`sint64`).
#[must_use]
#[allow(clippy::cast_sign_loss)]
pub const fn zigzag_encode_64(n: i64) -> u64 {
    ((n << 1) ^ (n >> 63)) as u64
}

/// Inverse of [`zigzag_encode_64`].
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub const fn zigzag_decode_64(n: u64) -> i64 {
    ((n >> 1) as i64) ^ -((n & 1) as i64)
}
