use crate::{
    DecodeError,
    varint::{self, Decoded, MAX_VARINT_LEN, Window, algorithms},
};

/// Which varint algorithm to decode with.
///
/// Production code should leave this at [`DecodeStrategy::Auto`], which
/// dispatches on the target's word size. The other variants pin a specific
/// algorithm so that benchmarks and fuzzers can compare them; all of them
/// return identical results for identical input.
///
/// # Examples
///
/// ```rust
/// use wirecore::DecodeStrategy;
///
/// let input = [0xac, 0x02];
/// for strategy in DecodeStrategy::ALL {
///     assert_eq!(strategy.decode(&input).unwrap().value, 300);
/// }
/// ```
///
/// # Default
///
/// [`DecodeStrategy::Auto`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DecodeStrategy {
    /// [`varint::decode_fast`]: word-parallel on 64-bit targets, 32-bit
    /// branching elsewhere.
    #[default]
    Auto,
    /// Branch on every byte, accumulating into two 32-bit halves.
    Branch32,
    /// Branch on every byte with a single 64-bit accumulator.
    Branch64,
    /// Two-byte check, then a shift-and-mask 8-byte fold.
    Wright,
    /// Two-byte check, then a shift-and-add 8-byte fold.
    Massimino,
}

impl DecodeStrategy {
    /// Every strategy, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Auto,
        Self::Branch32,
        Self::Branch64,
        Self::Wright,
        Self::Massimino,
    ];

    /// Decode from a full window with this strategy.
    ///
    /// # Errors
    ///
    /// [`DecodeError::Unterminated`] if no byte in the window terminates the
    /// varint.
    #[inline]
    pub fn decode_window(self, buf: &Window) -> Result<Decoded, DecodeError> {
        match self {
            Self::Auto => varint::decode_fast(buf),
            Self::Branch32 => algorithms::decode_branch32(buf),
            Self::Branch64 => algorithms::decode_branch64(buf),
            Self::Wright => algorithms::decode_check2_wright(buf),
            Self::Massimino => algorithms::decode_check2_massimino(buf),
        }
    }

    /// Decode from the front of `buf`, falling back to
    /// [`varint::decode_guarded`] when fewer than ten bytes are available.
    ///
    /// # Errors
    ///
    /// Same as [`varint::decode`].
    #[inline]
    pub fn decode(self, buf: &[u8]) -> Result<Decoded, DecodeError> {
        match buf.first_chunk::<MAX_VARINT_LEN>() {
            Some(window) => self.decode_window(window),
            None => varint::decode_guarded(buf),
        }
    }
}
