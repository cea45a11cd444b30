//! Interrupt-safe lock implementation

use core::sync::atomic::{AtomicBool, Ordering};

use critical_section::RestoreState;
use picoqueue_core::{Error, ExclusiveLock, Lock, Result};

/// Proof of a held [`CriticalSectionLock`]
///
/// Wraps the interrupt restore state. Not clonable and only constructible by
/// `acquire`, so every token is released exactly once and tokens cannot be
/// released out of order: the lock refuses a second acquire while one token
/// is outstanding.
pub struct CsToken {
    restore: RestoreState,
}

/// Lock that masks interrupts for the duration of the critical section
///
/// Built on the target's `critical-section` implementation, so a queue using
/// it is safe to touch from both thread mode and interrupt handlers. A
/// nested acquire from the same context reports [`Error::LockFailed`]
/// instead of handing out a second restore state.
#[derive(Debug, Default)]
pub struct CriticalSectionLock {
    held: AtomicBool,
}

impl CriticalSectionLock {
    /// Create a free lock
    pub const fn new() -> Self {
        Self {
            held: AtomicBool::new(false),
        }
    }
}

// SAFETY: acquire enters a critical section, and the `held` flag turns away
// any acquire that would overlap an outstanding token
unsafe impl ExclusiveLock for CriticalSectionLock {}

impl Lock for CriticalSectionLock {
    type Token = CsToken;

    fn create(_name: Option<&str>) -> Result<Self> {
        Ok(Self::new())
    }

    fn acquire(&self) -> Result<CsToken> {
        // SAFETY: the state ends up in a CsToken that release() consumes
        // exactly once, or is restored right below on the refusal path
        let restore = unsafe { critical_section::acquire() };
        // plain load/store suffice: the critical section is already ours
        if self.held.load(Ordering::Relaxed) {
            // SAFETY: restoring the state just acquired
            unsafe { critical_section::release(restore) };
            return Err(Error::LockFailed);
        }
        self.held.store(true, Ordering::Relaxed);
        Ok(CsToken { restore })
    }

    fn release(&self, token: CsToken) {
        self.held.store(false, Ordering::Relaxed);
        // SAFETY: the token is unforgeable and consumed here, so this is the
        // single release matching its acquire
        unsafe { critical_section::release(token.restore) }
    }
}
