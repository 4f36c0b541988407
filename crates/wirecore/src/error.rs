use thiserror::Error;

/// Failure to decode a varint.
///
/// Both variants mean the input is not a usable varint at this position; a
/// decoder should abandon the current message rather than the process.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// Every byte in the maximum-length window had its continuation bit set.
    #[error("unterminated varint")]
    Unterminated,
    /// The input ended before a byte with a clear continuation bit.
    #[error("varint truncated after {available} bytes")]
    Truncated { available: usize },
}
