//! Storage backend abstraction
//!
//! The queue handle never interprets backend internals; it only queries
//! occupancy and borrows head/tail slots through this trait, always from
//! inside the critical section. The circular buffer is one conforming
//! implementation among potentially several.

mod heap_ring;
mod static_ring;

pub use heap_ring::HeapRing;
pub use static_ring::StaticRing;

use heapless::String;

use crate::config::MAX_NAME_LENGTH;

/// Copy a label into the fixed-width diagnostic field, dropping the excess
pub(crate) fn truncated_name(label: Option<&str>) -> String<MAX_NAME_LENGTH> {
    let mut name = String::new();
    if let Some(label) = label {
        for ch in label.chars() {
            if name.push(ch).is_err() {
                break;
            }
        }
    }
    name
}

/// Fixed-capacity element storage
///
/// A backend holds `capacity` slots of `element_size` bytes each and tracks
/// its own head/tail state. Slot accessors advance that state themselves:
/// claiming a slot is what moves the backend forward, there is no separate
/// commit call.
pub trait Storage {
    /// Number of element slots
    fn capacity(&self) -> usize;

    /// Byte width of one slot
    fn element_size(&self) -> usize;

    /// Diagnostic label, possibly empty
    fn name(&self) -> &str;

    /// Elements currently stored
    fn len(&self) -> usize;

    /// Whether no element is stored
    fn is_empty(&self) -> bool;

    /// Whether every slot is occupied
    fn is_full(&self) -> bool;

    /// Claim the next writable slot and advance the head
    ///
    /// Must only be called when not full; the caller checks occupancy first,
    /// inside the same critical section.
    fn write_slot(&mut self) -> &mut [u8];

    /// Consume the oldest slot and advance the tail
    ///
    /// Must only be called when not empty; the caller checks occupancy first,
    /// inside the same critical section.
    fn read_slot(&mut self) -> &[u8];
}
