use core::fmt::{self, Write};

use super::ByteString;

/// Smallest window offered to the first, bounded render.
const MIN_RENDER_WINDOW: usize = 16;

/// Renders into a fixed slice, truncating, while counting the full length.
/// The last byte of the slice is reserved for a terminating NUL.
struct BoundedWriter<'a> {
    buf: &'a mut [u8],
    written: usize,
    needed: usize,
}

impl Write for BoundedWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let room = self.buf.len().saturating_sub(1) - self.written;
        let take = room.min(s.len());
        self.buf[self.written..self.written + take].copy_from_slice(&s.as_bytes()[..take]);
        self.written += take;
        self.needed += s.len();
        Ok(())
    }
}

/// Renders `args` into `buf` and returns the untruncated length.
fn render_bounded(buf: &mut [u8], args: fmt::Arguments<'_>) -> usize {
    let mut w = BoundedWriter {
        buf,
        written: 0,
        needed: 0,
    };
    // A failing `Display` impl leaves whatever it rendered so far.
    let _ = w.write_fmt(args);
    if let Some(terminator) = w.buf.get_mut(w.written) {
        *terminator = 0;
    }
    w.needed
}

impl ByteString {
    /// Formats `args` into the string starting at byte `offset`, returning
    /// the formatted length.
    ///
    /// The first render is bounded by the space already available past
    /// `offset` (at least 16 bytes). If the output did not fit, the buffer is
    /// grown to exactly `offset + len + 1` and the output is rendered again,
    /// so the result is never truncated. The length becomes `offset + len`;
    /// bytes before `offset` are preserved.
    ///
    /// A `Display` impl that returns an error stops the render early; the
    /// string then holds whatever was written before the error, and the
    /// returned length counts only that output.
    ///
    /// # Panics
    ///
    /// Same as [`ByteString::write_buffer`].
    pub fn write_fmt_at(&mut self, offset: usize, args: fmt::Arguments<'_>) -> usize {
        let window = self
            .capacity()
            .saturating_sub(offset)
            .max(MIN_RENDER_WINDOW);
        let buf = self.write_buffer(offset + window);
        let len = render_bounded(&mut buf[offset..], args);

        if len >= window {
            let buf = self.write_buffer(offset + len + 1);
            render_bounded(&mut buf[offset..], args);
        }

        self.write_buffer(offset + len);
        len
    }

    /// Replaces the contents with the formatted `args`.
    pub fn replace_fmt(&mut self, args: fmt::Arguments<'_>) -> usize {
        self.recycle();
        self.write_fmt_at(0, args)
    }

    /// Appends the formatted `args` to the end of the string.
    pub fn append_fmt(&mut self, args: fmt::Arguments<'_>) -> usize {
        self.write_fmt_at(self.len(), args)
    }

    /// A new string holding the formatted `args`. See also [`crate::bformat!`].
    #[must_use]
    pub fn from_fmt(args: fmt::Arguments<'_>) -> ByteString {
        let mut s = ByteString::new();
        s.write_fmt_at(0, args);
        s
    }
}
