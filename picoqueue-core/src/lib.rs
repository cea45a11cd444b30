//! # PicoQueue Core
//!
//! Portable `no_std` bounded FIFO queue core.
//!
//! This library contains the queue handle, its locking discipline, and the
//! contracts for the three pluggable collaborators: storage backend, lock
//! primitive and allocator. It is platform-agnostic and has no runtime
//! dependencies; platform crates (`picoqueue-std`, `picoqueue-embassy`)
//! supply the OS-specific collaborators.
//!
//! ## Features
//!
//! - **no_std** compatible - Fully embedded, no standard library
//! - **Pluggable collaborators** - Storage, lock and allocator behind traits
//! - **Static or heap storage** - Const-generic inline ring or allocator-backed ring
//! - **Byte-oriented** - Elements are opaque byte records of a fixed size
//! - **Poll-based** - Full/empty are reported to the caller, never waited on
//!
//! ## Limitations
//!
//! - No blocking on full/empty (callers poll and retry)
//! - No variable-length elements
//! - No zero-copy access (every transfer copies `element_size` bytes)
//! - Mutual exclusion only, no fairness guarantees between contexts

#![no_std]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod allocator;
pub mod config;
pub mod error;
pub mod lock;
pub mod queue;
pub mod storage;

pub use allocator::{Arena, RawAllocator};
#[cfg(feature = "alloc")]
pub use allocator::GlobalHeap;
pub use config::{QueueConfig, MAX_NAME_LENGTH, MIN_CAPACITY};
pub use error::{Error, Result};
pub use lock::{ExclusiveLock, Lock, NoopLock, SpinLock};
pub use queue::PicoQueue;
pub use storage::{HeapRing, StaticRing, Storage};
