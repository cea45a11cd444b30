//! # PicoQueue Embassy
//!
//! Embedded platform support for PicoQueue.
//!
//! This crate provides an interrupt-safe lock built on the target's
//! `critical-section` implementation, plus a type alias for sharing a queue
//! between Embassy tasks behind an `embassy-sync` blocking mutex. It
//! re-exports all core types for convenience.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use picoqueue_embassy::*;
//!
//! // safe to touch from thread mode and interrupt handlers
//! let queue: PicoQueue<StaticRing<8, 4>, CriticalSectionLock> =
//!     PicoQueue::from_parts(StaticRing::named("irq-events"), CriticalSectionLock::new())?;
//! queue.put(&[0; 4])?;
//! ```

#![no_std]

pub mod lock;
pub mod state;

// Re-export core for convenience
pub use picoqueue_core::*;

// Embassy-specific types
pub use lock::{CriticalSectionLock, CsToken};
pub use state::SharedQueue;
