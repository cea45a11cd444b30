//! Inline const-generic circular buffer

use heapless::String;

use crate::config::MAX_NAME_LENGTH;
use crate::storage::{truncated_name, Storage};

/// Circular buffer with inline storage
///
/// Capacity and element size are const generics, so the whole backend can
/// live in a `static` or on the stack with no allocator at all.
///
/// # Generic Parameters
///
/// - `CAP`: number of element slots, at least 2
/// - `ELEM`: byte width of one slot, at least 1
#[derive(Debug)]
pub struct StaticRing<const CAP: usize, const ELEM: usize> {
    slots: [[u8; ELEM]; CAP],
    head: usize,
    tail: usize,
    len: usize,
    name: String<MAX_NAME_LENGTH>,
}

impl<const CAP: usize, const ELEM: usize> StaticRing<CAP, ELEM> {
    /// Create an empty unnamed ring
    pub const fn new() -> Self {
        Self {
            slots: [[0; ELEM]; CAP],
            head: 0,
            tail: 0,
            len: 0,
            name: String::new(),
        }
    }

    /// Create an empty ring with a diagnostic label
    pub fn named(label: &str) -> Self {
        let mut ring = Self::new();
        ring.name = truncated_name(Some(label));
        ring
    }
}

impl<const CAP: usize, const ELEM: usize> Default for StaticRing<CAP, ELEM> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const CAP: usize, const ELEM: usize> Storage for StaticRing<CAP, ELEM> {
    fn capacity(&self) -> usize {
        CAP
    }

    fn element_size(&self) -> usize {
        ELEM
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
        self.len == CAP
    }

    fn write_slot(&mut self) -> &mut [u8] {
        debug_assert!(self.len < CAP);
        let index = self.head;
        self.head = (self.head + 1) % CAP;
        self.len += 1;
        &mut self.slots[index]
    }

    fn read_slot(&mut self) -> &[u8] {
        debug_assert!(self.len > 0);
        let index = self.tail;
        self.tail = (self.tail + 1) % CAP;
        self.len -= 1;
        &self.slots[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_empty() {
        let ring = StaticRing::<4, 2>::new();
        assert!(ring.is_empty());
        assert!(!ring.is_full());
        assert_eq!(ring.capacity(), 4);
        assert_eq!(ring.element_size(), 2);
        assert_eq!(ring.name(), "");
    }

    #[test]
    fn test_fill_and_drain_in_order() {
        let mut ring = StaticRing::<3, 1>::named("evt");
        assert_eq!(ring.name(), "evt");

        for i in 0..3u8 {
            ring.write_slot().copy_from_slice(&[i]);
        }
        assert!(ring.is_full());
        for i in 0..3u8 {
            assert_eq!(ring.read_slot(), &[i]);
        }
        assert!(ring.is_empty());
    }

    #[test]
    fn test_wraparound() {
        let mut ring = StaticRing::<2, 1>::new();
        for i in 0..7u8 {
            ring.write_slot().copy_from_slice(&[i]);
            assert_eq!(ring.read_slot(), &[i]);
        }
    }

    #[test]
    fn test_const_construction() {
        static RING: StaticRing<8, 4> = StaticRing::new();
        assert_eq!(RING.capacity(), 8);
    }
}
