//! # PicoQueue Std
//!
//! Hosted-platform support for PicoQueue.
//!
//! This crate provides an OS binary-semaphore lock built on the standard
//! library and enables the global-heap allocator of `picoqueue-core`. It
//! re-exports all core types for convenience.
//!
//! ## Usage
//!
//! ```rust
//! use picoqueue_std::*;
//!
//! fn main() -> Result<()> {
//!     let queue = StdQueue::create(&QueueConfig::new(16, 4).named("events"))?;
//!     queue.put(&7u32.to_le_bytes())?;
//!     let mut dest = [0u8; 4];
//!     queue.get(&mut dest)?;
//!     Ok(())
//! }
//! ```

pub mod lock;

// Re-export core for convenience
pub use picoqueue_core::*;

// Std-specific types
pub use lock::StdSemaphore;

/// Default queue type for hosted targets: heap-backed ring, OS semaphore
pub type StdQueue = PicoQueue<HeapRing<GlobalHeap>, StdSemaphore>;
