//! Capacity-checked copy.

use thiserror::Error;

use crate::buffer::BoundedBuf;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CopyError {
    /// Source is longer than the destination; nothing was written.
    #[error("copy rejected: source is {len} bytes, destination holds {capacity}")]
    Rejected { len: usize, capacity: usize },
}

/// Copies `source` into a fresh buffer of `capacity` bytes.
///
/// Returns the exact copy when `source.len() <= capacity`. Longer sources are
/// refused outright; they are never truncated.
pub fn copy_bounded(source: &[u8], capacity: usize) -> Result<BoundedBuf, CopyError> {
    let mut dest = BoundedBuf::with_capacity(capacity);
    match dest.copy_from(source) {
        Ok(copied) => {
            tracing::debug!(copied, capacity, "bounded copy complete");
            Ok(dest)
        }
        Err(e) => {
            tracing::warn!(len = source.len(), capacity, "bounded copy rejected");
            Err(e)
        }
    }
}
