//! Competing varint decode algorithms.
//!
//! All of these take a full [`Window`], so at least [`MAX_VARINT_LEN`] bytes
//! are always readable; callers that cannot guarantee that go through
//! [`super::decode`], which falls back to the guarded decoder. Every
//! algorithm returns the same result for the same window. Only
//! [`super::decode_fast`] picks one for production use; the rest are kept for
//! benchmarking and cross-checking.

use super::{Decoded, MAX_VARINT_LEN, Window};
use crate::DecodeError;

const LOW_7: u64 = 0x7f7f_7f7f_7f7f_7f7f;

#[inline(always)]
fn join32(low: u32, high: u32, len: usize) -> Decoded {
    Decoded {
        value: (u64::from(high) << 32) | u64::from(low),
        len,
    }
}

/// Branching decoder accumulating into two 32-bit halves.
///
/// Preferred where native arithmetic is 32 bits wide. The fifth byte is split:
/// its low four value bits finish the low half and the remaining three start
/// the high half.
#[inline]
#[allow(clippy::identity_op)]
pub fn decode_branch32(buf: &Window) -> Result<Decoded, DecodeError> {
    let mut low: u32 = 0;
    let mut high: u32 = 0;

    macro_rules! low {
        ($i:literal, $shift:literal) => {{
            let b = u32::from(buf[$i]);
            low |= (b & 0x7f) << $shift;
            if b & 0x80 == 0 {
                return Ok(join32(low, high, $i + 1));
            }
        }};
    }
    macro_rules! high {
        ($i:literal, $shift:literal) => {{
            let b = u32::from(buf[$i]);
            high |= (b & 0x7f) << $shift;
            if b & 0x80 == 0 {
                return Ok(join32(low, high, $i + 1));
            }
        }};
    }

    low!(0, 0);
    low!(1, 7);
    low!(2, 14);
    low!(3, 21);
    {
        let b = u32::from(buf[4]);
        low |= (b & 0x7f) << 28;
        high = (b & 0x7f) >> 4;
        if b & 0x80 == 0 {
            return Ok(join32(low, high, 5));
        }
    }
    high!(5, 3);
    high!(6, 10);
    high!(7, 17);
    high!(8, 24);
    high!(9, 31);

    Err(DecodeError::Unterminated)
}

/// Branching decoder with a single 64-bit accumulator.
#[inline]
#[allow(clippy::identity_op)]
pub fn decode_branch64(buf: &Window) -> Result<Decoded, DecodeError> {
    let mut value: u64 = 0;

    macro_rules! step {
        ($i:literal) => {{
            let b = u64::from(buf[$i]);
            value |= (b & 0x7f) << (7 * $i);
            if b & 0x80 == 0 {
                return Ok(Decoded { value, len: $i + 1 });
            }
        }};
    }

    step!(0);
    step!(1);
    step!(2);
    step!(3);
    step!(4);
    step!(5);
    step!(6);
    step!(7);
    step!(8);
    step!(9);

    Err(DecodeError::Unterminated)
}

/// Returns the isolated continuation bit of the first terminating byte, or 0
/// if every byte in `word` has its continuation bit set.
#[inline(always)]
fn stop_bit(word: u64) -> u64 {
    let cbits = word | LOW_7;
    !cbits & cbits.wrapping_add(1)
}

#[inline(always)]
fn resume(prefix: Decoded, folded: u64, stop_bit: u64) -> Decoded {
    debug_assert!(prefix.len <= MAX_VARINT_LEN - 8);
    // Bits past the 64th belong to the tenth byte's unused payload.
    Decoded {
        value: prefix.value | (folded << (7 * prefix.len)),
        len: prefix.len + (stop_bit.trailing_zeros() as usize + 1) / 8,
    }
}

/// Branchless decode of up to 8 bytes, folding with shift-and-mask.
///
/// `prefix` carries the value and length already decoded from the bytes in
/// front of `window`.
#[inline]
pub fn decode_max8_wright(prefix: Decoded, window: &[u8; 8]) -> Result<Decoded, DecodeError> {
    let mut b = u64::from_le_bytes(*window);
    let stop_bit = stop_bit(b);
    if stop_bit == 0 {
        return Err(DecodeError::Unterminated);
    }
    b &= stop_bit - 1;
    b = ((b & 0x7f00_7f00_7f00_7f00) >> 1) | (b & 0x007f_007f_007f_007f);
    b = ((b & 0xffff_0000_ffff_0000) >> 2) | (b & 0x0000_ffff_0000_ffff);
    b = ((b & 0xffff_ffff_0000_0000) >> 4) | (b & 0x0000_0000_ffff_ffff);
    Ok(resume(prefix, b, stop_bit))
}

/// Branchless decode of up to 8 bytes, folding with shift-and-add.
///
/// Each add step doubles up the lower lane, so the folded word comes out
/// multiplied by 128 and is shifted back down before it is merged.
#[inline]
pub fn decode_max8_massimino(
    prefix: Decoded,
    window: &[u8; 8],
) -> Result<Decoded, DecodeError> {
    let word = u64::from_le_bytes(*window);
    let stop_bit = stop_bit(word);
    if stop_bit == 0 {
        return Err(DecodeError::Unterminated);
    }
    let mut b = (word & LOW_7) & (stop_bit - 1);
    b += b & 0x007f_007f_007f_007f;
    b += 3 * (b & 0x0000_ffff_0000_ffff);
    b += 15 * (b & 0x0000_0000_ffff_ffff);
    Ok(resume(prefix, b >> 7, stop_bit))
}

#[inline(always)]
fn check2<F>(buf: &Window, max8: F) -> Result<Decoded, DecodeError>
where
    F: FnOnce(Decoded, &[u8; 8]) -> Result<Decoded, DecodeError>,
{
    let [b0, b1, tail @ ..] = buf;
    let b = u64::from(u16::from_le_bytes([*b0, *b1]));
    if b & 0x80 == 0 {
        return Ok(Decoded {
            value: b & 0x7f,
            len: 1,
        });
    }
    let prefix = Decoded {
        value: (b & 0x7f) | ((b & 0x7f00) >> 1),
        len: 2,
    };
    if b & 0x8000 == 0 {
        return Ok(prefix);
    }
    max8(prefix, tail)
}

/// Reads the first two bytes directly and hands longer varints to
/// [`decode_max8_wright`].
#[inline]
pub fn decode_check2_wright(buf: &Window) -> Result<Decoded, DecodeError> {
    check2(buf, decode_max8_wright)
}

/// Reads the first two bytes directly and hands longer varints to
/// [`decode_max8_massimino`].
#[inline]
pub fn decode_check2_massimino(buf: &Window) -> Result<Decoded, DecodeError> {
    check2(buf, decode_max8_massimino)
}
