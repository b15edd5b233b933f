//! Owned text payload carried by every non-sentinel ring node.

use std::ffi::{CStr, CString};
use std::str::Utf8Error;

use crate::QueueError;

/// One queue element: an owned, NUL-terminated text buffer.
///
/// The buffer is sized to exactly the text plus its terminator and is never
/// shared with the caller's input. Ordering is byte-lexicographic, the same
/// as C `strcmp`.
///
/// # Example
///
/// ```
/// use nexus_ring::Element;
///
/// let element = Element::new("gadget").unwrap();
/// assert_eq!(element.as_bytes(), b"gadget");
///
/// let mut buf = [0xffu8; 4];
/// assert_eq!(element.copy_to(&mut buf), 3);
/// assert_eq!(&buf, b"gad\0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Element {
    value: CString,
}

impl Element {
    /// Duplicates `text` into a newly allocated buffer.
    ///
    /// # Errors
    ///
    /// - [`QueueError::InvalidText`] if `text` contains a NUL byte
    /// - [`QueueError::BufferExhausted`] if the buffer cannot be allocated
    pub fn new(text: impl AsRef<[u8]>) -> Result<Self, QueueError> {
        let text = text.as_ref();
        if let Some(position) = text.iter().position(|&b| b == 0) {
            return Err(QueueError::InvalidText { position });
        }

        let mut buf = Vec::new();
        buf.try_reserve_exact(text.len() + 1)?;
        buf.extend_from_slice(text);
        buf.push(0);

        // NUL-free text plus one trailing NUL always converts.
        let value = CString::from_vec_with_nul(buf).map_err(|_| QueueError::InvalidText {
            position: text.len(),
        })?;
        Ok(Self { value })
    }

    /// Returns the text without its terminator.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.value.as_bytes()
    }

    /// Returns the text with its terminator.
    #[inline]
    pub fn as_c_str(&self) -> &CStr {
        &self.value
    }

    /// Returns the text as UTF-8, if it is.
    #[inline]
    pub fn to_str(&self) -> Result<&str, Utf8Error> {
        self.value.to_str()
    }

    /// Returns the length of the text in bytes, excluding the terminator.
    #[inline]
    pub fn len(&self) -> usize {
        self.value.as_bytes().len()
    }

    /// Returns `true` for the empty text.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Consumes the element, returning its buffer.
    #[inline]
    pub fn into_c_string(self) -> CString {
        self.value
    }

    /// Copies the text into `buf`, truncating to `buf.len() - 1` bytes.
    ///
    /// Like `strncpy` followed by an explicit terminator: the bytes after the
    /// copied text are zeroed, and `buf` always ends in NUL. A zero-length
    /// `buf` receives nothing. Returns the number of text bytes copied.
    ///
    /// The element itself is untouched.
    pub fn copy_to(&self, buf: &mut [u8]) -> usize {
        let Some(limit) = buf.len().checked_sub(1) else {
            return 0;
        };

        let text = self.as_bytes();
        let copied = text.len().min(limit);
        buf[..copied].copy_from_slice(&text[..copied]);
        buf[copied..].fill(0);
        copied
    }
}
