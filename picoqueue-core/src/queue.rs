//! Queue handle and locking discipline
//!
//! Every public operation acquires the lock, performs exactly one backend
//! query or mutation, releases the lock and returns. The handle never
//! retries, never blocks beyond what the lock primitive blocks for, and
//! buffers nothing itself.

use core::cell::UnsafeCell;

use log::debug;

use crate::allocator::RawAllocator;
use crate::config::{QueueConfig, MIN_CAPACITY};
use crate::error::{Error, Result};
use crate::config::MAX_NAME_LENGTH;
use crate::lock::{ExclusiveLock, Held, Lock};
use crate::storage::{truncated_name, HeapRing, Storage};

use heapless::String;

#[cfg(feature = "alloc")]
use crate::allocator::GlobalHeap;

/// Bounded FIFO queue handle
///
/// Owns one storage backend and one lock primitive and serializes all access
/// to the backend through the lock. Elements are opaque byte records of a
/// fixed size chosen at creation.
///
/// A handle is either fully constructed or creation fails with an error;
/// there is no partially-initialized state. Note that `is_full`/`is_empty`
/// polls are advisory only: queries and mutations are mutually exclusive,
/// not atomic across separate calls, so `put` and `get` re-check occupancy
/// themselves inside the critical section.
///
/// # Generic Parameters
///
/// - `S`: storage backend holding the element bytes
/// - `L`: lock primitive guarding every operation
pub struct PicoQueue<S: Storage, L: Lock> {
    // field order is teardown order: backend freed first, lock primitive last
    storage: UnsafeCell<S>,
    lock: L,
    element_size: usize,
    name: String<MAX_NAME_LENGTH>,
}

// SAFETY: the queue is moved whole, together with its backend
unsafe impl<S: Storage + Send, L: Lock + Send> Send for PicoQueue<S, L> {}

// SAFETY: the backend behind the UnsafeCell is only reached while the lock is
// held; the ExclusiveLock bound guarantees that at most one context can hold
// it, so shared access from safe code stays serialized. NoopLock does not
// implement ExclusiveLock, so a queue using it is confined to one context.
unsafe impl<S: Storage + Send, L: ExclusiveLock + Sync> Sync for PicoQueue<S, L> {}

impl<S: Storage, L: Lock> PicoQueue<S, L> {
    /// Assemble a queue from caller-built collaborators
    ///
    /// The backend must report a capacity of at least [`MIN_CAPACITY`] and a
    /// non-zero element size; otherwise the parts are dropped and the error
    /// returned.
    pub fn from_parts(storage: S, lock: L) -> Result<Self> {
        if storage.capacity() < MIN_CAPACITY {
            return Err(Error::CapacityTooSmall {
                min: MIN_CAPACITY,
                actual: storage.capacity(),
            });
        }
        if storage.element_size() == 0 {
            return Err(Error::ElementSizeZero);
        }
        let element_size = storage.element_size();
        let name = truncated_name(Some(storage.name()));
        debug!(
            "queue '{}' created: {} x {} byte elements",
            name,
            storage.capacity(),
            element_size
        );
        Ok(Self {
            storage: UnsafeCell::new(storage),
            lock,
            element_size,
            name,
        })
    }

    /// Whether every slot is occupied
    ///
    /// Advisory by the time the caller acts on it; `put` re-checks.
    pub fn is_full(&self) -> Result<bool> {
        let _held = Held::enter(&self.lock)?;
        // SAFETY: inside the critical section
        Ok(unsafe { (*self.storage.get()).is_full() })
    }

    /// Whether no element is stored
    ///
    /// Advisory by the time the caller acts on it; `get` re-checks.
    pub fn is_empty(&self) -> Result<bool> {
        let _held = Held::enter(&self.lock)?;
        // SAFETY: inside the critical section
        Ok(unsafe { (*self.storage.get()).is_empty() })
    }

    /// Elements currently stored
    pub fn len(&self) -> Result<usize> {
        let _held = Held::enter(&self.lock)?;
        // SAFETY: inside the critical section
        Ok(unsafe { (*self.storage.get()).len() })
    }

    /// Number of element slots
    pub fn capacity(&self) -> Result<usize> {
        let _held = Held::enter(&self.lock)?;
        // SAFETY: inside the critical section
        Ok(unsafe { (*self.storage.get()).capacity() })
    }

    /// Fixed byte width of every element
    pub fn element_size(&self) -> usize {
        self.element_size
    }

    /// Diagnostic name label, possibly empty
    ///
    /// Copied out of the backend at creation, so reading it needs no lock.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Copy one element into the queue
    ///
    /// `src` may be shorter than the element size; the remainder of the slot
    /// is zeroed so reads stay deterministic. Returns [`Error::QueueFull`]
    /// without copying anything when no slot is free.
    pub fn put(&self, src: &[u8]) -> Result<()> {
        if src.len() > self.element_size {
            return Err(Error::ElementTooLarge {
                element_size: self.element_size,
                actual: src.len(),
            });
        }
        let _held = Held::enter(&self.lock)?;
        // SAFETY: inside the critical section
        let storage = unsafe { &mut *self.storage.get() };
        // Authoritative check: an is_full() poll by the caller may be stale
        // by now, only the state observed under the lock counts.
        if storage.is_full() {
            return Err(Error::QueueFull);
        }
        let slot = storage.write_slot();
        slot[..src.len()].copy_from_slice(src);
        slot[src.len()..].fill(0);
        Ok(())
    }

    /// Copy the oldest element out of the queue
    ///
    /// `dest` must hold at least one element. Returns [`Error::QueueEmpty`]
    /// with `dest` untouched when nothing is stored, otherwise the number of
    /// bytes copied (always the element size).
    pub fn get(&self, dest: &mut [u8]) -> Result<usize> {
        if dest.len() < self.element_size {
            return Err(Error::BufferTooSmall {
                required: self.element_size,
                actual: dest.len(),
            });
        }
        let _held = Held::enter(&self.lock)?;
        // SAFETY: inside the critical section
        let storage = unsafe { &mut *self.storage.get() };
        // Authoritative check, mirror of put()
        if storage.is_empty() {
            return Err(Error::QueueEmpty);
        }
        dest[..self.element_size].copy_from_slice(storage.read_slot());
        Ok(self.element_size)
    }

    /// Tear the queue down explicitly
    ///
    /// Equivalent to dropping the handle; provided so deletion reads as an
    /// operation at call sites that want one.
    pub fn delete(self) {
        drop(self);
    }
}

impl<A: RawAllocator, L: Lock> PicoQueue<HeapRing<A>, L> {
    /// Create a queue with an allocator-backed ring buffer
    ///
    /// Size parameters are rejected before the allocator is touched.
    /// Construction is atomic: if the backend or the lock fails to come up,
    /// whatever was built is torn down and the error is returned, so a
    /// returned handle always has usable collaborators.
    pub fn create_in(config: &QueueConfig<'_>, alloc: A) -> Result<Self> {
        config.validate()?;
        let storage = HeapRing::create_in(config, alloc)?;
        let lock = L::create(config.name)?;
        Self::from_parts(storage, lock)
    }
}

#[cfg(feature = "alloc")]
impl<L: Lock> PicoQueue<HeapRing<GlobalHeap>, L> {
    /// Create a queue backed by the platform heap
    pub fn create(config: &QueueConfig<'_>) -> Result<Self> {
        Self::create_in(config, GlobalHeap)
    }
}

impl<S: Storage, L: Lock> Drop for PicoQueue<S, L> {
    fn drop(&mut self) {
        // Best-effort drain: wait out anything still inside the critical
        // section, but complete teardown even if the lock cannot be acquired.
        if let Ok(token) = self.lock.acquire() {
            self.lock.release(token);
        }
        debug!("queue '{}' deleted", self.name);
        // fields now drop in declaration order: backend first, lock last
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::Arena;
    use crate::lock::{NoopLock, SpinLock};
    use crate::storage::StaticRing;

    fn static_queue<const CAP: usize, const ELEM: usize>(
    ) -> PicoQueue<StaticRing<CAP, ELEM>, NoopLock> {
        PicoQueue::from_parts(StaticRing::new(), NoopLock).unwrap()
    }

    #[test]
    fn test_create_starts_empty_not_full() {
        let queue = static_queue::<4, 8>();
        assert_eq!(queue.is_empty(), Ok(true));
        assert_eq!(queue.is_full(), Ok(false));
        assert_eq!(queue.len(), Ok(0));
        assert_eq!(queue.capacity(), Ok(4));
        assert_eq!(queue.element_size(), 8);
    }

    #[test]
    fn test_create_rejects_bad_sizes() {
        let result = PicoQueue::from_parts(StaticRing::<1, 4>::new(), NoopLock);
        assert_eq!(
            result.err(),
            Some(Error::CapacityTooSmall { min: 2, actual: 1 })
        );

        let result = PicoQueue::from_parts(StaticRing::<4, 0>::new(), NoopLock);
        assert_eq!(result.err(), Some(Error::ElementSizeZero));
    }

    #[test]
    fn test_create_rejects_before_allocating() {
        let arena = Arena::<256>::new();
        let config = QueueConfig::new(1, 4);
        let result: Result<PicoQueue<HeapRing<&Arena<256>>, SpinLock>> =
            PicoQueue::create_in(&config, &arena);
        assert!(result.is_err());
        assert_eq!(arena.used(), 0);

        let config = QueueConfig::new(4, 0);
        let result: Result<PicoQueue<HeapRing<&Arena<256>>, SpinLock>> =
            PicoQueue::create_in(&config, &arena);
        assert!(result.is_err());
        assert_eq!(arena.used(), 0);
    }

    #[test]
    fn test_create_reports_allocation_failure() {
        let arena = Arena::<8>::new();
        let config = QueueConfig::new(8, 8).named("too-big");
        let result: Result<PicoQueue<HeapRing<&Arena<8>>, SpinLock>> =
            PicoQueue::create_in(&config, &arena);
        assert_eq!(result.err(), Some(Error::AllocFailed { requested: 64 }));
    }

    #[test]
    fn test_named_queue_reports_label() {
        let queue: PicoQueue<StaticRing<4, 2>, NoopLock> =
            PicoQueue::from_parts(StaticRing::named("events"), NoopLock).unwrap();
        assert_eq!(queue.name(), "events");

        let unnamed = static_queue::<4, 2>();
        assert_eq!(unnamed.name(), "");

        let arena = Arena::<64>::new();
        let config = QueueConfig::new(4, 4).named("rx-ring");
        let queue: PicoQueue<HeapRing<&Arena<64>>, SpinLock> =
            PicoQueue::create_in(&config, &arena).unwrap();
        assert_eq!(queue.name(), "rx-ring");
    }

    #[test]
    fn test_put_get_round_trip() {
        let queue = static_queue::<4, 8>();
        queue.put(b"01234567").unwrap();

        let mut dest = [0u8; 8];
        assert_eq!(queue.get(&mut dest), Ok(8));
        assert_eq!(&dest, b"01234567");
    }

    #[test]
    fn test_short_element_round_trips_prefix() {
        let queue = static_queue::<2, 8>();
        queue.put(b"abc").unwrap();

        let mut dest = [0xffu8; 8];
        assert_eq!(queue.get(&mut dest), Ok(8));
        // slot remainder is zeroed on put
        assert_eq!(&dest, b"abc\0\0\0\0\0");
    }

    #[test]
    fn test_put_on_full_queue_leaves_contents_unchanged() {
        let queue = static_queue::<3, 1>();
        for i in 0..3u8 {
            queue.put(&[i]).unwrap();
        }
        assert_eq!(queue.is_full(), Ok(true));
        assert_eq!(queue.put(&[99]), Err(Error::QueueFull));

        let mut dest = [0u8; 1];
        for i in 0..3u8 {
            queue.get(&mut dest).unwrap();
            assert_eq!(dest, [i]);
        }
    }

    #[test]
    fn test_get_on_empty_queue_leaves_dest_untouched() {
        let queue = static_queue::<4, 4>();
        let mut dest = [0xaau8; 4];
        assert_eq!(queue.get(&mut dest), Err(Error::QueueEmpty));
        assert_eq!(dest, [0xaa; 4]);
    }

    #[test]
    fn test_oversized_element_rejected() {
        let queue = static_queue::<4, 4>();
        assert_eq!(
            queue.put(&[0u8; 5]),
            Err(Error::ElementTooLarge {
                element_size: 4,
                actual: 5
            })
        );
        assert_eq!(queue.is_empty(), Ok(true));
    }

    #[test]
    fn test_undersized_destination_rejected() {
        let queue = static_queue::<4, 4>();
        queue.put(&[1, 2, 3, 4]).unwrap();
        let mut dest = [0u8; 3];
        assert_eq!(
            queue.get(&mut dest),
            Err(Error::BufferTooSmall {
                required: 4,
                actual: 3
            })
        );
        // element is still queued
        assert_eq!(queue.len(), Ok(1));
    }

    #[test]
    fn test_four_u32_scenario() {
        // capacity 4, element size 4: four 32-bit integers fill the queue
        let arena = Arena::<64>::new();
        let config = QueueConfig::new(4, 4).named("u32s");
        let queue: PicoQueue<HeapRing<&Arena<64>>, SpinLock> =
            PicoQueue::create_in(&config, &arena).unwrap();

        for value in 1u32..=4 {
            queue.put(&value.to_le_bytes()).unwrap();
        }
        assert_eq!(queue.put(&5u32.to_le_bytes()), Err(Error::QueueFull));

        let mut dest = [0u8; 4];
        for expected in 1u32..=4 {
            assert_eq!(queue.get(&mut dest), Ok(4));
            assert_eq!(u32::from_le_bytes(dest), expected);
        }
        assert_eq!(queue.get(&mut dest), Err(Error::QueueEmpty));
    }

    #[test]
    fn test_wraparound_reuse() {
        let queue = static_queue::<2, 1>();
        for i in 0..9u8 {
            queue.put(&[i]).unwrap();
            let mut dest = [0u8; 1];
            queue.get(&mut dest).unwrap();
            assert_eq!(dest, [i]);
        }
    }

    #[test]
    fn test_lock_failure_maps_to_lock_failed() {
        let queue: PicoQueue<StaticRing<2, 1>, SpinLock> =
            PicoQueue::from_parts(StaticRing::new(), SpinLock::new()).unwrap();
        // hold the lock from outside so every operation sees contention
        let token = queue.lock.acquire().unwrap();
        assert_eq!(queue.is_full(), Err(Error::LockFailed));
        assert_eq!(queue.is_empty(), Err(Error::LockFailed));
        assert_eq!(queue.put(&[1]), Err(Error::LockFailed));
        let mut dest = [0u8; 1];
        assert_eq!(queue.get(&mut dest), Err(Error::LockFailed));
        queue.lock.release(token);
        assert_eq!(queue.put(&[1]), Ok(()));
    }

    #[test]
    fn test_delete_completes() {
        let arena = Arena::<64>::new();
        let config = QueueConfig::new(4, 4);
        let queue: PicoQueue<HeapRing<&Arena<64>>, SpinLock> =
            PicoQueue::create_in(&config, &arena).unwrap();
        queue.put(&[1, 2, 3, 4]).unwrap();
        queue.delete();
    }
}
