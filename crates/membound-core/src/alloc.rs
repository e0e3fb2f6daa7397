//! Allocation handles.
//!
//! Two ways to hold a zeroed heap region:
//!
//! - [`Allocation`] is move-only. Releasing it consumes the value, so any
//!   later use is a compile error:
//!
//! ```compile_fail
//! use membound_core::alloc::Allocation;
//!
//! let region = Allocation::new(100);
//! region.release();
//! let _ = region.as_slice()[0];
//! ```
//!
//! - [`Handle`] tracks its state at runtime and walks the one-way machine
//!   `Unallocated -> Allocated -> Released`. Every operation attempted on a
//!   released handle fails with [`AllocError::UseAfterRelease`]; nothing
//!   leads back to `Allocated`.
//!
//! ```
//! use membound_core::alloc::{allocate, release, AllocError};
//!
//! let mut handle = allocate(100);
//! handle.write(0, 42).unwrap();
//! assert_eq!(handle.read(0), Ok(42));
//!
//! release(&mut handle).unwrap();
//! assert_eq!(handle.read(0), Err(AllocError::UseAfterRelease));
//! ```

use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum AllocError {
    #[error("use after release: handle was already released")]
    UseAfterRelease,

    #[error("handle is not allocated")]
    NotAllocated,

    #[error("handle is already allocated")]
    AlreadyAllocated,

    #[error("offset {offset} out of bounds for region of {len} bytes")]
    OutOfBounds { offset: usize, len: usize },
}

/// Owned, zero-initialised heap region.
pub struct Allocation {
    region: Box<[u8]>,
}

impl Allocation {
    pub fn new(size: usize) -> Self {
        Self {
            region: vec![0u8; size].into_boxed_slice(),
        }
    }

    pub fn len(&self) -> usize {
        self.region.len()
    }

    pub fn is_empty(&self) -> bool {
        self.region.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.region
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.region
    }

    pub fn read(&self, offset: usize) -> Result<u8, AllocError> {
        self.region
            .get(offset)
            .copied()
            .ok_or(AllocError::OutOfBounds {
                offset,
                len: self.region.len(),
            })
    }

    pub fn write(&mut self, offset: usize, byte: u8) -> Result<(), AllocError> {
        let len = self.region.len();
        let slot = self
            .region
            .get_mut(offset)
            .ok_or(AllocError::OutOfBounds { offset, len })?;
        *slot = byte;
        Ok(())
    }

    /// Returns the region to the allocator.
    pub fn release(self) {
        tracing::debug!(size = self.region.len(), "allocation released");
        drop(self.region);
    }
}

impl fmt::Debug for Allocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Allocation")
            .field("len", &self.region.len())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleState {
    Unallocated,
    Allocated,
    Released,
}

impl fmt::Display for HandleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HandleState::Unallocated => "unallocated",
            HandleState::Allocated => "allocated",
            HandleState::Released => "released",
        };
        f.write_str(s)
    }
}

#[derive(Debug)]
enum Slot {
    Unallocated,
    Allocated(Allocation),
    Released,
}

/// Runtime-checked allocation handle.
#[derive(Debug)]
pub struct Handle {
    slot: Slot,
}

impl Default for Handle {
    fn default() -> Self {
        Self::new()
    }
}

impl Handle {
    /// A handle that does not own anything yet.
    pub fn new() -> Self {
        Self {
            slot: Slot::Unallocated,
        }
    }

    pub fn state(&self) -> HandleState {
        match self.slot {
            Slot::Unallocated => HandleState::Unallocated,
            Slot::Allocated(_) => HandleState::Allocated,
            Slot::Released => HandleState::Released,
        }
    }

    /// `Unallocated -> Allocated`.
    pub fn allocate(&mut self, size: usize) -> Result<(), AllocError> {
        match self.slot {
            Slot::Unallocated => {
                self.slot = Slot::Allocated(Allocation::new(size));
                tracing::debug!(size, "handle allocated");
                Ok(())
            }
            Slot::Allocated(_) => Err(AllocError::AlreadyAllocated),
            Slot::Released => Err(Self::use_after_release("allocate")),
        }
    }

    /// `Allocated -> Released`. The region is dropped immediately and the
    /// handle can never reach it again.
    pub fn release(&mut self) -> Result<(), AllocError> {
        match std::mem::replace(&mut self.slot, Slot::Released) {
            Slot::Allocated(region) => {
                region.release();
                Ok(())
            }
            Slot::Unallocated => {
                self.slot = Slot::Unallocated;
                Err(AllocError::NotAllocated)
            }
            Slot::Released => Err(Self::use_after_release("release")),
        }
    }

    pub fn len(&self) -> Result<usize, AllocError> {
        self.region("len").map(Allocation::len)
    }

    pub fn is_empty(&self) -> Result<bool, AllocError> {
        self.region("is_empty").map(Allocation::is_empty)
    }

    pub fn as_slice(&self) -> Result<&[u8], AllocError> {
        self.region("as_slice").map(Allocation::as_slice)
    }

    pub fn read(&self, offset: usize) -> Result<u8, AllocError> {
        self.region("read")?.read(offset)
    }

    pub fn write(&mut self, offset: usize, byte: u8) -> Result<(), AllocError> {
        match &mut self.slot {
            Slot::Allocated(region) => region.write(offset, byte),
            Slot::Unallocated => Err(AllocError::NotAllocated),
            Slot::Released => Err(Self::use_after_release("write")),
        }
    }

    fn region(&self, op: &'static str) -> Result<&Allocation, AllocError> {
        match &self.slot {
            Slot::Allocated(region) => Ok(region),
            Slot::Unallocated => Err(AllocError::NotAllocated),
            Slot::Released => Err(Self::use_after_release(op)),
        }
    }

    fn use_after_release(op: &'static str) -> AllocError {
        tracing::warn!(op, "operation on released handle refused");
        AllocError::UseAfterRelease
    }
}

/// Returns a handle to a zeroed region of `size` bytes.
pub fn allocate(size: usize) -> Handle {
    let mut handle = Handle::new();
    handle.slot = Slot::Allocated(Allocation::new(size));
    tracing::debug!(size, "handle allocated");
    handle
}

/// Releases the region behind `handle` and invalidates the handle in place.
pub fn release(handle: &mut Handle) -> Result<(), AllocError> {
    handle.release()
}
