//! Sharing a queue between Embassy tasks

use embassy_sync::blocking_mutex::Mutex;
use picoqueue_core::{NoopLock, PicoQueue};

/// Queue shared across Embassy tasks behind a blocking mutex
///
/// When a queue lives in a `static` and several tasks reach it, exclusion
/// comes from the outer `embassy-sync` mutex and the inner queue runs with
/// [`NoopLock`] so the two locks do not stack. The raw mutex type is generic
/// for portability across platforms.
///
/// ```rust,ignore
/// use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
/// use picoqueue_embassy::{NoopLock, PicoQueue, SharedQueue, StaticRing};
///
/// static EVENTS: SharedQueue<CriticalSectionRawMutex, StaticRing<8, 4>> =
///     Mutex::new(queue);
///
/// EVENTS.lock(|queue| queue.put(&[0; 4]))?;
/// ```
pub type SharedQueue<M, S> = Mutex<M, PicoQueue<S, NoopLock>>;
