//! Allocator-backed circular buffer

use core::alloc::Layout;
use core::ptr::NonNull;

use heapless::String;

use crate::allocator::RawAllocator;
use crate::config::{QueueConfig, MAX_NAME_LENGTH};
use crate::error::{Error, Result};
use crate::storage::{truncated_name, Storage};

/// Circular buffer with a runtime-chosen capacity
///
/// The byte buffer comes from a [`RawAllocator`] and is returned to it on
/// drop. Capacity and element size are fixed at creation.
pub struct HeapRing<A: RawAllocator> {
    buf: NonNull<u8>,
    layout: Layout,
    capacity: usize,
    element_size: usize,
    head: usize,
    tail: usize,
    len: usize,
    name: String<MAX_NAME_LENGTH>,
    alloc: A,
}

// SAFETY: the buffer is exclusively owned and only reachable through &mut
// accessors; moving the ring across threads moves the whole allocation with it
unsafe impl<A: RawAllocator + Send> Send for HeapRing<A> {}

impl<A: RawAllocator> HeapRing<A> {
    /// Allocate a ring for `config` out of `alloc`
    ///
    /// Validates the size parameters before touching the allocator.
    pub fn create_in(config: &QueueConfig<'_>, alloc: A) -> Result<Self> {
        config.validate()?;
        let bytes = config
            .capacity
            .checked_mul(config.element_size)
            .ok_or(Error::AllocFailed {
                requested: usize::MAX,
            })?;
        let layout = Layout::from_size_align(bytes, 1).map_err(|_| Error::AllocFailed {
            requested: bytes,
        })?;
        let buf = alloc.allocate(layout)?;
        Ok(Self {
            buf,
            layout,
            capacity: config.capacity,
            element_size: config.element_size,
            head: 0,
            tail: 0,
            len: 0,
            name: truncated_name(config.name),
            alloc,
        })
    }

    fn slot_offset(&self, index: usize) -> usize {
        index * self.element_size
    }
}

impl<A: RawAllocator> Storage for HeapRing<A> {
    fn capacity(&self) -> usize {
        self.capacity
    }

    fn element_size(&self) -> usize {
        self.element_size
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn len(&self) -> usize {
        self.len
    }

    fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn is_full(&self) -> bool {
        self.len == self.capacity
    }

    fn write_slot(&mut self) -> &mut [u8] {
        debug_assert!(self.len < self.capacity);
        let offset = self.slot_offset(self.head);
        self.head = (self.head + 1) % self.capacity;
        self.len += 1;
        // SAFETY: offset + element_size <= capacity * element_size, the
        // allocation size; exclusive access via &mut self
        unsafe { core::slice::from_raw_parts_mut(self.buf.as_ptr().add(offset), self.element_size) }
    }

    fn read_slot(&mut self) -> &[u8] {
        debug_assert!(self.len > 0);
        let offset = self.slot_offset(self.tail);
        self.tail = (self.tail + 1) % self.capacity;
        self.len -= 1;
        // SAFETY: same bounds argument as write_slot
        unsafe { core::slice::from_raw_parts(self.buf.as_ptr().add(offset), self.element_size) }
    }
}

impl<A: RawAllocator> Drop for HeapRing<A> {
    fn drop(&mut self) {
        // SAFETY: buf was obtained from self.alloc with self.layout
        unsafe { self.alloc.free(self.buf, self.layout) };
    }
}
