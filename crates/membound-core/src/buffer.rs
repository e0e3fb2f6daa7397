//! Fixed-capacity byte buffer.
//!
//! A `BoundedBuf` owns a boxed slice whose length is chosen once at
//! construction and never changes. Writes go through methods that check the
//! remaining space first, so the fill length can never exceed the capacity.
//! The buffer also remembers the largest fill length it ever reached
//! (`high_water`), which tests use to confirm that no write went past the
//! declared capacity.

use std::borrow::Cow;
use std::fmt;

use crate::copy::CopyError;

#[derive(Clone, PartialEq, Eq)]
pub struct BoundedBuf {
    bytes: Box<[u8]>,
    len: usize,
    high_water: usize,
}

impl BoundedBuf {
    /// Creates an empty, zero-filled buffer holding at most `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: vec![0u8; capacity].into_boxed_slice(),
            len: 0,
            high_water: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn remaining(&self) -> usize {
        self.capacity() - self.len
    }

    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Largest fill length this buffer has ever held.
    pub fn high_water(&self) -> usize {
        self.high_water
    }

    /// The meaningful bytes, `..len`.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Lossy UTF-8 view of the meaningful bytes.
    pub fn to_str_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.as_bytes())
    }

    /// Appends as much of `src` as fits and returns the number of bytes taken.
    pub fn extend_bounded(&mut self, src: &[u8]) -> usize {
        let take = src.len().min(self.remaining());
        let start = self.len;
        self.bytes[start..start + take].copy_from_slice(&src[..take]);
        self.set_len(start + take);
        take
    }

    /// Replaces the contents with an exact copy of `src`.
    ///
    /// When `src` is longer than the capacity the copy is refused and the
    /// buffer keeps its previous contents, length and high-water mark.
    pub fn copy_from(&mut self, src: &[u8]) -> Result<usize, CopyError> {
        if src.len() > self.capacity() {
            return Err(CopyError::Rejected {
                len: src.len(),
                capacity: self.capacity(),
            });
        }
        self.bytes[..src.len()].copy_from_slice(src);
        self.bytes[src.len()..].fill(0);
        self.set_len(src.len());
        Ok(src.len())
    }

    fn set_len(&mut self, len: usize) {
        debug_assert!(len <= self.capacity());
        self.len = len;
        self.high_water = self.high_water.max(len);
    }
}

impl AsRef<[u8]> for BoundedBuf {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl fmt::Debug for BoundedBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedBuf")
            .field("content", &self.to_str_lossy())
            .field("len", &self.len)
            .field("capacity", &self.capacity())
            .finish()
    }
}

impl fmt::Display for BoundedBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_str_lossy())
    }
}
