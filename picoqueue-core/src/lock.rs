//! Lock primitive abstraction
//!
//! Every queue operation runs inside one critical section guarded by a
//! [`Lock`]. The primitive itself is pluggable: a no-op for single-context
//! builds, a spin lock for bare-metal, an OS semaphore or interrupt mask in
//! the platform crates.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::error::{Error, Result};

/// Binary mutual-exclusion primitive
///
/// `acquire` hands out a token as proof of entry; `release` consumes it.
/// Implementations decide whether `acquire` blocks, spins or masks
/// interrupts; a failed acquire maps to [`Error::LockFailed`] and leaves the
/// primitive untouched. Destruction is `Drop`.
pub trait Lock: Sized {
    /// Proof of a successful acquisition, returned to [`Lock::release`]
    type Token;

    /// Create the primitive; `name` is a diagnostic label and may be ignored
    fn create(name: Option<&str>) -> Result<Self>;

    /// Enter the critical section
    fn acquire(&self) -> Result<Self::Token>;

    /// Leave the critical section
    fn release(&self, token: Self::Token);
}

/// Marker for lock primitives that really exclude concurrent holders
///
/// The queue hands out `&self` operations and is only shareable across
/// threads or interrupt contexts when its lock upholds mutual exclusion, so
/// the `Sync` impl on the handle is gated on this marker. [`NoopLock`]
/// deliberately does not implement it.
///
/// # Safety
///
/// Implementors must guarantee that between a successful `acquire` and the
/// matching `release` no other context can successfully acquire the same
/// primitive.
pub unsafe trait ExclusiveLock: Lock {}

/// Critical-section guard used by the queue handle
///
/// Holding the token in a drop guard is what guarantees the lock is released
/// exactly once on every exit path. A failed acquire yields no token, so
/// there is nothing to release on that path.
pub(crate) struct Held<'a, L: Lock> {
    lock: &'a L,
    token: Option<L::Token>,
}

impl<'a, L: Lock> Held<'a, L> {
    pub(crate) fn enter(lock: &'a L) -> Result<Self> {
        let token = lock.acquire()?;
        Ok(Self {
            lock,
            token: Some(token),
        })
    }
}

impl<L: Lock> Drop for Held<'_, L> {
    fn drop(&mut self) {
        if let Some(token) = self.token.take() {
            self.lock.release(token);
        }
    }
}

/// Lock for builds with the locking mechanism disabled
///
/// Always succeeds and excludes nothing, so it does not implement
/// [`ExclusiveLock`] and a queue using it cannot be shared across contexts:
///
/// ```compile_fail
/// use picoqueue_core::{NoopLock, PicoQueue, StaticRing};
///
/// fn assert_sync<T: Sync>() {}
/// assert_sync::<PicoQueue<StaticRing<2, 8>, NoopLock>>();
/// ```
///
/// For sharing without a lock of its own, put the queue behind an external
/// mutex instead (see `SharedQueue` in the embassy crate).
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLock;

impl Lock for NoopLock {
    type Token = ();

    fn create(_name: Option<&str>) -> Result<Self> {
        Ok(NoopLock)
    }

    fn acquire(&self) -> Result<()> {
        Ok(())
    }

    fn release(&self, _token: ()) {}
}

/// Iterations to spin before giving up on a contended [`SpinLock`]
const SPIN_LIMIT: usize = 100_000;

/// Bounded spin lock for bare-metal targets without an OS semaphore
///
/// Spins up to [`SPIN_LIMIT`] iterations and then reports
/// [`Error::LockFailed`] instead of livelocking; the caller retries like any
/// other refused operation.
#[derive(Debug, Default)]
pub struct SpinLock {
    locked: AtomicBool,
}

impl SpinLock {
    /// Create an unlocked spin lock
    pub const fn new() -> Self {
        Self {
            locked: AtomicBool::new(false),
        }
    }
}

// SAFETY: acquire only succeeds after winning the compare-exchange on
// `locked`, which stays true until release
unsafe impl ExclusiveLock for SpinLock {}

impl Lock for SpinLock {
    type Token = ();

    fn create(_name: Option<&str>) -> Result<Self> {
        Ok(Self::new())
    }

    fn acquire(&self) -> Result<()> {
        for _ in 0..SPIN_LIMIT {
            if self
                .locked
                .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
                .is_ok()
            {
                return Ok(());
            }
            core::hint::spin_loop();
        }
        Err(Error::LockFailed)
    }

    fn release(&self, _token: ()) {
        self.locked.store(false, Ordering::Release);
    }
}
