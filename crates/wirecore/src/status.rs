use core::fmt;

use bstr::BStr;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{ByteString, DecodeError};

/// Outcome category carried by a [`Status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[repr(i32)]
pub enum StatusCode {
    #[default]
    Ok = 0,
    /// The input ended where a value could not.
    Eof = 1,
    Error = 2,
}

/// A status code plus an optional message, for surfacing recoverable
/// failures up a decoding pipeline.
///
/// Copies share the message by reference. The message buffer is reused
/// across [`Status::set`] and [`Status::clear`] when nobody else holds it.
///
/// ```rust
/// use wirecore::{Status, StatusCode};
///
/// let mut status = Status::new();
/// status.set(StatusCode::Eof, format_args!("{} bytes left", 3));
/// assert_eq!(status.to_string(), "code: 1, msg: 3 bytes left");
///
/// status.clear();
/// assert!(status.is_ok());
/// assert_eq!(status.to_string(), "code: 0, no msg");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Status {
    code: StatusCode,
    msg: Option<ByteString>,
}

impl Status {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn code(&self) -> StatusCode {
        self.code
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.code == StatusCode::Ok
    }

    /// The message bytes, if one has been set since the last clear.
    #[must_use]
    pub fn message(&self) -> Option<&[u8]> {
        self.msg.as_ref().and_then(ByteString::try_as_bytes)
    }

    /// Assigns `code` and replaces the message with the formatted `args`.
    ///
    /// See also [`crate::set_status!`].
    pub fn set(&mut self, code: StatusCode, args: fmt::Arguments<'_>) {
        self.code = code;
        let msg = self.msg.get_or_insert_with(ByteString::new);
        msg.replace_fmt(args);
        debug!(?code, msg = %msg, "status set");
    }

    /// Assigns `code` with `err`'s `Display` output as the message.
    pub fn set_error<E: core::error::Error + ?Sized>(&mut self, code: StatusCode, err: &E) {
        self.set(code, format_args!("{err}"));
    }

    /// A status holding `code` and `err`'s message.
    #[must_use]
    pub fn from_error<E: core::error::Error + ?Sized>(code: StatusCode, err: &E) -> Self {
        let mut status = Self::new();
        status.set_error(code, err);
        status
    }

    /// Copies `from`'s code and shares its message without copying bytes.
    pub fn copy_from(&mut self, from: &Status) {
        self.clone_from(from);
    }

    /// Resets to [`StatusCode::Ok`] with no message, keeping the message
    /// buffer for reuse.
    pub fn clear(&mut self) {
        self.code = StatusCode::Ok;
        if let Some(msg) = &mut self.msg {
            msg.recycle();
        }
    }

    /// Writes the diagnostic line, newline included, to `out`.
    ///
    /// # Errors
    ///
    /// Any error from `out`.
    #[cfg(feature = "std")]
    pub fn write_to(&self, mut out: impl std::io::Write) -> std::io::Result<()> {
        writeln!(out, "{self}")
    }

    /// Prints the diagnostic line to stderr.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        std::eprintln!("{self}");
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = self.code as i32;
        match self.message() {
            Some(msg) => write!(f, "code: {code}, msg: {}", BStr::new(msg)),
            None => write!(f, "code: {code}, no msg"),
        }
    }
}

impl From<DecodeError> for Status {
    fn from(err: DecodeError) -> Self {
        let code = match err {
            DecodeError::Truncated { .. } => StatusCode::Eof,
            DecodeError::Unterminated => StatusCode::Error,
        };
        Self::from_error(code, &err)
    }
}

#[cfg(test)]
mod tests {
    use alloc::{string::ToString, vec::Vec};

    use super::*;
    use crate::set_status;

    #[test]
    fn new_status_is_ok_without_message() {
        let status = Status::new();
        assert!(status.is_ok());
        assert_eq!(status.code(), StatusCode::Ok);
        assert_eq!(status.message(), None);
        assert_eq!(status.to_string(), "code: 0, no msg");
    }

    #[test]
    fn set_formats_message() {
        let mut status = Status::new();
        set_status!(status, StatusCode::Error, "bad tag {:#x}", 0xf0);
        assert_eq!(status.code(), StatusCode::Error);
        assert_eq!(status.message(), Some(&b"bad tag 0xf0"[..]));
        assert_eq!(status.to_string(), "code: 2, msg: bad tag 0xf0");
    }

    #[test]
    fn set_reuses_unshared_buffer() {
        let mut status = Status::new();
        set_status!(status, StatusCode::Error, "{}", "x".repeat(40));
        let capacity = status.msg.as_ref().unwrap().capacity();

        set_status!(status, StatusCode::Eof, "short");
        assert_eq!(status.msg.as_ref().unwrap().capacity(), capacity);
        assert_eq!(status.message(), Some(&b"short"[..]));
    }

    #[test]
    fn copies_share_the_message() {
        let mut from = Status::new();
        set_status!(from, StatusCode::Error, "shared");

        let mut to = Status::new();
        to.copy_from(&from);
        assert_eq!(to.code(), StatusCode::Error);
        assert_eq!(to.message(), Some(&b"shared"[..]));
        assert_eq!(from.msg.as_ref().unwrap().ref_count(), 2);

        // Rewriting one side detaches it; the other keeps its text.
        set_status!(from, StatusCode::Eof, "changed");
        assert_eq!(to.message(), Some(&b"shared"[..]));
        assert_eq!(to.msg.as_ref().unwrap().ref_count(), 1);
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut status = Status::new();
        set_status!(status, StatusCode::Error, "some failure");
        let capacity = status.msg.as_ref().unwrap().capacity();

        status.clear();
        assert!(status.is_ok());
        assert_eq!(status.message(), None);
        assert_eq!(status.msg.as_ref().unwrap().capacity(), capacity);
    }

    #[test]
    fn decode_errors_convert() {
        let status = Status::from(DecodeError::Unterminated);
        assert_eq!(status.to_string(), "code: 2, msg: unterminated varint");

        let status = Status::from(DecodeError::Truncated { available: 3 });
        assert_eq!(status.code(), StatusCode::Eof);
        assert_eq!(
            status.message(),
            Some(&b"varint truncated after 3 bytes"[..])
        );
    }

    #[cfg(feature = "std")]
    #[test]
    fn write_to_appends_newline() {
        let mut status = Status::new();
        set_status!(status, StatusCode::Eof, "end");
        let mut out = Vec::new();
        status.write_to(&mut out).unwrap();
        assert_eq!(out, b"code: 1, msg: end\n");
    }
}
