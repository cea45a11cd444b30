//! Raw memory allocation abstraction
//!
//! The storage backend obtains its byte buffer through a [`RawAllocator`],
//! swappable between the platform heap and a caller-owned arena for targets
//! without one.

use core::alloc::Layout;
use core::cell::{Cell, UnsafeCell};
use core::ptr::NonNull;

#[cfg(feature = "alloc")]
use alloc::alloc::{alloc as heap_alloc, dealloc as heap_dealloc};

use crate::error::{Error, Result};

/// Raw allocation interface
///
/// Failure is reported as [`Error::AllocFailed`]; implementations never
/// panic on exhaustion.
pub trait RawAllocator {
    /// Allocate a block for `layout`
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>>;

    /// Return a block obtained from [`RawAllocator::allocate`]
    ///
    /// # Safety
    ///
    /// `ptr` must come from a previous `allocate` on the same allocator with
    /// the same `layout`, and must not be used afterwards.
    unsafe fn free(&self, ptr: NonNull<u8>, layout: Layout);
}

// Allows a shared arena to back several queues: the backend stores `&Arena`
// while the arena stays owned by the caller, so buffer pointers never outlive
// or move with the allocator.
impl<A: RawAllocator> RawAllocator for &A {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>> {
        (**self).allocate(layout)
    }

    unsafe fn free(&self, ptr: NonNull<u8>, layout: Layout) {
        (**self).free(ptr, layout)
    }
}

/// Fixed-buffer bump allocator for allocator-less targets
///
/// Hands out slices of an inline `N`-byte buffer and reports
/// [`Error::AllocFailed`] once exhausted. `free` is a no-op: memory is
/// reclaimed when the arena itself goes away. Not `Sync`; one context owns
/// the arena.
#[derive(Debug)]
pub struct Arena<const N: usize> {
    buf: UnsafeCell<[u8; N]>,
    next: Cell<usize>,
}

impl<const N: usize> Arena<N> {
    /// Create an empty arena
    pub const fn new() -> Self {
        Self {
            buf: UnsafeCell::new([0; N]),
            next: Cell::new(0),
        }
    }

    /// Bytes handed out so far (including alignment padding)
    pub fn used(&self) -> usize {
        self.next.get()
    }

    /// Bytes still available, ignoring future alignment padding
    pub fn remaining(&self) -> usize {
        N - self.next.get()
    }
}

impl<const N: usize> Default for Arena<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> RawAllocator for Arena<N> {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>> {
        let base = self.buf.get() as *mut u8;
        let misalign = (base as usize + self.next.get()) % layout.align();
        let padding = if misalign == 0 {
            0
        } else {
            layout.align() - misalign
        };
        let offset = self
            .next
            .get()
            .checked_add(padding)
            .ok_or(Error::AllocFailed {
                requested: layout.size(),
            })?;
        let end = offset.checked_add(layout.size()).ok_or(Error::AllocFailed {
            requested: layout.size(),
        })?;
        if end > N {
            return Err(Error::AllocFailed {
                requested: layout.size(),
            });
        }
        self.next.set(end);
        // SAFETY: offset + layout.size() <= N, so the block lies inside buf
        Ok(unsafe { NonNull::new_unchecked(base.add(offset)) })
    }

    unsafe fn free(&self, _ptr: NonNull<u8>, _layout: Layout) {
        // bump allocator: individual blocks are never reclaimed
    }
}

/// Platform heap allocator
///
/// Delegates to the global allocator of the `alloc` crate.
#[cfg(feature = "alloc")]
#[derive(Debug, Default, Clone, Copy)]
pub struct GlobalHeap;

#[cfg(feature = "alloc")]
impl RawAllocator for GlobalHeap {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>> {
        if layout.size() == 0 {
            return Err(Error::AllocFailed { requested: 0 });
        }
        // SAFETY: layout size checked to be non-zero
        let ptr = unsafe { heap_alloc(layout) };
        NonNull::new(ptr).ok_or(Error::AllocFailed {
            requested: layout.size(),
        })
    }

    unsafe fn free(&self, ptr: NonNull<u8>, layout: Layout) {
        heap_dealloc(ptr.as_ptr(), layout);
    }
}
