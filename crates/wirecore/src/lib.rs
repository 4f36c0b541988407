//! Low-level primitives for a protocol-buffer-style binary codec.
//!
//! - [`varint`]: base-128 varint decoders, including branchless word-parallel
//!   variants, plus the matching encoder.
//! - [`ByteString`]: a refcounted, copy-on-write byte buffer with zero-copy
//!   substring aliasing and buffer recycling.
//! - [`types`]: the static field-type descriptor table.
//! - [`Status`]: a status code plus a shared message, for reporting
//!   recoverable failures up a decoding pipeline.

#![no_std]
#![allow(missing_docs)]
extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

mod bytestring;
mod error;
mod options;
mod status;

pub mod types;
pub mod varint;


pub use bytestring::{ByteString, EMPTY};
pub use error::DecodeError;
pub use options::DecodeStrategy;
pub use status::{Status, StatusCode};
pub use types::{FieldType, TypeInfo, ValueType, WireType};

#[doc(hidden)]
pub use core::format_args;

/// Build a [`ByteString`] from format arguments, like [`alloc::format!`].
///
/// The output is rendered with the same measure-then-render contract as
/// [`ByteString::write_fmt_at`].
///
/// ```rust
/// use wirecore::bformat;
///
/// let s = bformat!("{}-{}", 42, "x");
/// assert_eq!(s.as_bytes(), b"42-x");
/// ```
#[macro_export]
macro_rules! bformat {
    ($($arg:tt)*) => {
        $crate::ByteString::from_fmt($crate::format_args!($($arg)*))
    };
}

/// Assign a code and a formatted message to a [`Status`].
///
/// ```rust
/// use wirecore::{set_status, Status, StatusCode};
///
/// let mut status = Status::new();
/// set_status!(status, StatusCode::Error, "field {} has wire type {}", 3, 7);
/// assert_eq!(status.message(), Some(&b"field 3 has wire type 7"[..]));
/// ```
#[macro_export]
macro_rules! set_status {
    ($status:expr, $code:expr, $($arg:tt)*) => {
        $status.set($code, $crate::format_args!($($arg)*))
    };
}
