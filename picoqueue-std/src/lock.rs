//! Std lock implementation

use std::sync::{Condvar, Mutex};

use picoqueue_core::{Error, ExclusiveLock, Lock, Result};

/// Binary semaphore built on a mutex and condvar
///
/// `acquire` blocks until the semaphore is free, like an RTOS binary
/// semaphore taken with an infinite timeout. A poisoned mutex (a thread
/// panicked mid-operation) surfaces as [`Error::LockFailed`].
#[derive(Debug, Default)]
pub struct StdSemaphore {
    taken: Mutex<bool>,
    freed: Condvar,
}

impl StdSemaphore {
    /// Create a free semaphore
    pub fn new() -> Self {
        Self {
            taken: Mutex::new(false),
            freed: Condvar::new(),
        }
    }
}

// SAFETY: acquire blocks on the condvar until `taken` is false and flips it
// under the mutex, so only one holder exists at a time
unsafe impl ExclusiveLock for StdSemaphore {}

impl Lock for StdSemaphore {
    type Token = ();

    fn create(_name: Option<&str>) -> Result<Self> {
        Ok(Self::new())
    }

    fn acquire(&self) -> Result<()> {
        let mut taken = self.taken.lock().map_err(|_| Error::LockFailed)?;
        while *taken {
            taken = self.freed.wait(taken).map_err(|_| Error::LockFailed)?;
        }
        *taken = true;
        Ok(())
    }

    fn release(&self, _token: ()) {
        if let Ok(mut taken) = self.taken.lock() {
            *taken = false;
        }
        self.freed.notify_one();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_release() {
        let sem = StdSemaphore::create(Some("test")).unwrap();
        let token = sem.acquire().unwrap();
        sem.release(token);
        let token = sem.acquire().unwrap();
        sem.release(token);
    }

    #[test]
    fn test_blocks_until_released() {
        use std::sync::Arc;
        use std::time::Duration;

        let sem = Arc::new(StdSemaphore::new());
        let token = sem.acquire().unwrap();

        let waiter = {
            let sem = Arc::clone(&sem);
            std::thread::spawn(move || {
                let token = sem.acquire().unwrap();
                sem.release(token);
            })
        };

        std::thread::sleep(Duration::from_millis(20));
        sem.release(token);
        waiter.join().unwrap();
    }
}
