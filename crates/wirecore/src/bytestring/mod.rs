//! Refcounted, aliasable byte strings.
//!
//! A [`ByteString`] is a handle to either a *root*, which owns its buffer, or
//! an *alias*, which views a range of a root's buffer and keeps that root
//! alive. Aliases are always attached to a root directly: aliasing an alias
//! rewrites the offset against the underlying root, so chains never grow past
//! one level.
//!
//! Handles are shared with [`Clone`] and released on drop; the reference count
//! is atomic, so the last release may happen on any thread. Content can only
//! change through `&mut self` on a handle nobody else holds. A string is built
//! by one owner and then shared, after which it is read-only. Mutating a
//! shared handle, or a root that aliases still point into, panics.
//!
//! Static strings, including the empty singleton [`EMPTY`], are immortal: they
//! carry no count and never reach the free path. Mutating a static handle
//! first copies its bytes into an owned string.

mod format;
#[cfg(feature = "std")]
mod fs;
#[cfg(feature = "serde")]
mod serde_impl;

use alloc::{
    ffi::{CString, NulError},
    sync::Arc,
    vec::Vec,
};
use core::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
};

use bstr::BStr;
use tracing::trace;

/// The process-wide empty string.
pub static EMPTY: ByteString = ByteString::empty();

/// A refcounted, copy-on-write byte buffer.
///
/// ```rust
/// use wirecore::ByteString;
///
/// let hello = ByteString::from("hello");
/// let ell = hello.substr(1, 3);
/// assert_eq!(ell.as_bytes(), b"ell");
/// assert_eq!(hello.ref_count(), 2);
/// drop(hello);
/// // The alias keeps the root's bytes alive.
/// assert_eq!(ell.as_bytes(), b"ell");
/// ```
#[derive(Clone)]
pub struct ByteString(Handle);

#[derive(Clone)]
enum Handle {
    Static(&'static [u8]),
    Shared(Arc<Repr>),
}

#[derive(Debug)]
struct Repr {
    len: usize,
    view: View,
    /// Cached allocation; its length is the capacity. Kept across recycles,
    /// including while the string is an alias.
    mem: Vec<u8>,
}

#[derive(Debug)]
enum View {
    /// Not materialized yet: no readable bytes, length 0.
    WriteOnly,
    /// Reads `mem[..len]`.
    Root,
    /// Reads `root.mem[offset..offset + len]`. `root` is always a `Root`.
    Alias { root: Arc<Repr>, offset: usize },
}

impl Repr {
    const fn new() -> Self {
        Self {
            len: 0,
            view: View::WriteOnly,
            mem: Vec::new(),
        }
    }

    fn bytes(&self) -> Option<&[u8]> {
        match &self.view {
            View::WriteOnly => None,
            View::Root => Some(&self.mem[..self.len]),
            View::Alias { root, offset } => Some(&root.mem[*offset..*offset + self.len]),
        }
    }

    /// Grows `mem` to the next power of two at or above `len`, preserving its
    /// contents.
    fn reserve(&mut self, len: usize) {
        let capacity = self.mem.len();
        if capacity >= len {
            return;
        }
        let size = len.next_power_of_two();
        trace!(from = capacity, to = size, "growing byte string buffer");
        self.mem.reserve_exact(size - capacity);
        self.mem.resize(size, 0);
    }
}

impl ByteString {
    /// A new, empty root string in the write-only state. No buffer is
    /// allocated until the first write.
    #[must_use]
    pub fn new() -> Self {
        Self(Handle::Shared(Arc::new(Repr::new())))
    }

    /// The immortal empty string.
    #[must_use]
    pub const fn empty() -> Self {
        Self(Handle::Static(b""))
    }

    /// Wraps static bytes without copying. The result is immortal like
    /// [`EMPTY`].
    #[must_use]
    pub const fn from_static(bytes: &'static [u8]) -> Self {
        Self(Handle::Static(bytes))
    }

    /// Logical length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        match &self.0 {
            Handle::Static(bytes) => bytes.len(),
            Handle::Shared(repr) => repr.len,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Size of the owned buffer. Aliases report the buffer they have cached
    /// for reuse, not the root's. Static strings own nothing and report 0.
    #[must_use]
    pub fn capacity(&self) -> usize {
        match &self.0 {
            Handle::Static(_) => 0,
            Handle::Shared(repr) => repr.mem.len(),
        }
    }

    /// The readable bytes, or `None` while the string is still write-only.
    #[must_use]
    pub fn try_as_bytes(&self) -> Option<&[u8]> {
        match &self.0 {
            Handle::Static(bytes) => Some(*bytes),
            Handle::Shared(repr) => repr.bytes(),
        }
    }

    /// The readable bytes; empty while the string is write-only.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.try_as_bytes().unwrap_or_default()
    }

    /// Whether the string has not been written or aliased since it was
    /// created or recycled.
    #[must_use]
    pub fn is_write_only(&self) -> bool {
        match &self.0 {
            Handle::Static(_) => false,
            Handle::Shared(repr) => matches!(repr.view, View::WriteOnly),
        }
    }

    /// Whether this string views another string's buffer.
    #[must_use]
    pub fn is_alias(&self) -> bool {
        match &self.0 {
            Handle::Static(_) => false,
            Handle::Shared(repr) => matches!(repr.view, View::Alias { .. }),
        }
    }

    /// Number of handles sharing this string, counting aliases that keep it
    /// alive. Immortal strings report `usize::MAX`.
    #[must_use]
    pub fn ref_count(&self) -> usize {
        match &self.0 {
            Handle::Static(_) => usize::MAX,
            Handle::Shared(repr) => Arc::strong_count(repr),
        }
    }

    /// Exclusive access for mutation. Static handles are first copied into an
    /// owned root holding the same bytes.
    ///
    /// # Panics
    ///
    /// If the handle is shared.
    fn repr_mut(&mut self) -> &mut Repr {
        if let Handle::Static(bytes) = self.0 {
            self.0 = Handle::Shared(Arc::new(Repr {
                len: bytes.len(),
                view: View::Root,
                mem: bytes.to_vec(),
            }));
        }
        let Handle::Shared(repr) = &mut self.0 else {
            unreachable!("static handle was just replaced");
        };
        let Some(repr) = Arc::get_mut(repr) else {
            panic!("ByteString mutated while shared");
        };
        repr
    }

    /// Returns a writable region of exactly `len` bytes and sets the length
    /// to `len`.
    ///
    /// Grows the buffer to the next power of two at or above `len` when it is
    /// too small, preserving the existing bytes. The string becomes a root.
    ///
    /// # Panics
    ///
    /// If the string is an alias (recycle it first) or the handle is shared.
    pub fn write_buffer(&mut self, len: usize) -> &mut [u8] {
        let repr = self.repr_mut();
        assert!(
            !matches!(repr.view, View::Alias { .. }),
            "write_buffer on an aliasing ByteString; recycle it first"
        );
        repr.reserve(len);
        repr.len = len;
        repr.view = View::Root;
        &mut repr.mem[..len]
    }

    /// Makes this write-only string view `source[start..start + len]`.
    ///
    /// If `source` is itself an alias, this string attaches to `source`'s
    /// root instead, with the offset rewritten. The root stays alive as long
    /// as this string does.
    ///
    /// # Panics
    ///
    /// If this string is not write-only, the handle is shared, the range is
    /// out of bounds, or `source` is write-only.
    pub fn alias_of(&mut self, source: &ByteString, start: usize, len: usize) {
        assert!(
            start
                .checked_add(len)
                .is_some_and(|end| end <= source.len()),
            "alias range {start}+{len} out of bounds for length {}",
            source.len()
        );
        assert!(
            self.is_write_only(),
            "alias target must be freshly created or recycled"
        );

        let (root, offset) = match &source.0 {
            Handle::Static(bytes) => {
                let bytes: &'static [u8] = *bytes;
                self.0 = Handle::Static(&bytes[start..start + len]);
                return;
            }
            Handle::Shared(repr) => match &repr.view {
                View::WriteOnly => panic!("cannot alias a ByteString that was never written"),
                View::Root => (Arc::clone(repr), start),
                View::Alias { root, offset } => (Arc::clone(root), offset + start),
            },
        };

        let repr = self.repr_mut();
        repr.view = View::Alias { root, offset };
        repr.len = len;
    }

    /// A new string viewing `self[start..start + len]` without copying.
    ///
    /// # Panics
    ///
    /// If the range is out of bounds or `self` is write-only.
    #[must_use]
    pub fn substr(&self, start: usize, len: usize) -> ByteString {
        let mut alias = ByteString::new();
        alias.alias_of(self, start, len);
        alias
    }

    /// An independent root holding a copy of this string's bytes.
    #[must_use]
    pub fn duplicate(&self) -> ByteString {
        ByteString::from(self.as_bytes())
    }

    /// Appends `bytes` to the end of the string.
    ///
    /// # Panics
    ///
    /// Same as [`ByteString::write_buffer`].
    pub fn extend_from_slice(&mut self, bytes: &[u8]) {
        let old = self.len();
        let buf = self.write_buffer(old + bytes.len());
        buf[old..].copy_from_slice(bytes);
    }

    /// Appends a copy of `other`'s bytes to the end of the string.
    ///
    /// # Panics
    ///
    /// Same as [`ByteString::write_buffer`].
    pub fn append(&mut self, other: &ByteString) {
        self.extend_from_slice(other.as_bytes());
    }

    /// Replaces the contents with a copy of `other`'s bytes, reusing this
    /// string's buffer when possible.
    pub fn copy_from(&mut self, other: &ByteString) {
        self.recycle();
        self.extend_from_slice(other.as_bytes());
    }

    /// Returns the string to the write-only state for reuse.
    ///
    /// A uniquely held string keeps its buffer and drops any alias source.
    /// A shared or static handle is released and replaced by a fresh string,
    /// leaving the other holders untouched.
    pub fn recycle(&mut self) {
        if let Handle::Shared(repr) = &mut self.0 {
            if let Some(repr) = Arc::get_mut(repr) {
                repr.view = View::WriteOnly;
                repr.len = 0;
                return;
            }
        }
        self.0 = Handle::Shared(Arc::new(Repr::new()));
    }

    /// A NUL-terminated copy of the bytes.
    ///
    /// # Errors
    ///
    /// If the string contains an interior NUL byte.
    pub fn to_c_string(&self) -> Result<CString, NulError> {
        CString::new(self.as_bytes())
    }
}

impl Default for ByteString {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&[u8]> for ByteString {
    fn from(bytes: &[u8]) -> Self {
        let mut s = ByteString::new();
        s.write_buffer(bytes.len()).copy_from_slice(bytes);
        s
    }
}

impl From<&str> for ByteString {
    fn from(s: &str) -> Self {
        Self::from(s.as_bytes())
    }
}

impl From<Vec<u8>> for ByteString {
    /// Adopts the vector's buffer as the root allocation.
    fn from(mut mem: Vec<u8>) -> Self {
        let len = mem.len();
        mem.resize(mem.capacity(), 0);
        Self(Handle::Shared(Arc::new(Repr {
            len,
            view: View::Root,
            mem,
        })))
    }
}

impl AsRef<[u8]> for ByteString {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl PartialEq for ByteString {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for ByteString {}

impl PartialEq<[u8]> for ByteString {
    fn eq(&self, other: &[u8]) -> bool {
        self.as_bytes() == other
    }
}

impl PartialEq<&str> for ByteString {
    fn eq(&self, other: &&str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl PartialOrd for ByteString {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ByteString {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_bytes().cmp(other.as_bytes())
    }
}

impl Hash for ByteString {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_bytes().hash(state);
    }
}

impl fmt::Debug for ByteString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(BStr::new(self.as_bytes()), f)
    }
}

impl fmt::Display for ByteString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(BStr::new(self.as_bytes()), f)
    }
}
