//! Queue construction parameters
//!
//! Collaborator choice (lock, allocator, storage) is expressed through type
//! parameters; everything that is a runtime value at construction lives here.

use crate::error::{Error, Result};

/// Smallest capacity a queue can be created with
pub const MIN_CAPACITY: usize = 2;

/// Maximum length of the diagnostic name label; longer labels are truncated
pub const MAX_NAME_LENGTH: usize = 32;

/// Construction parameters for a queue
///
/// `name` is a human-readable label threaded through to the storage backend
/// and the lock primitive for diagnostics. It carries no semantic weight and
/// may be omitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueConfig<'a> {
    /// Number of elements the queue can hold
    pub capacity: usize,
    /// Fixed byte width of every element
    pub element_size: usize,
    /// Optional diagnostic label
    pub name: Option<&'a str>,
}

impl<'a> QueueConfig<'a> {
    /// Create a config for `capacity` elements of `element_size` bytes each
    pub const fn new(capacity: usize, element_size: usize) -> Self {
        Self {
            capacity,
            element_size,
            name: None,
        }
    }

    /// Attach a diagnostic name label
    pub const fn named(mut self, name: &'a str) -> Self {
        self.name = Some(name);
        self
    }

    /// Check the size parameters
    ///
    /// Called before any resource is touched: an invalid config must never
    /// reach an allocator.
    pub fn validate(&self) -> Result<()> {
        if self.capacity < MIN_CAPACITY {
            return Err(Error::CapacityTooSmall {
                min: MIN_CAPACITY,
                actual: self.capacity,
            });
        }
        if self.element_size == 0 {
            return Err(Error::ElementSizeZero);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() {
        assert!(QueueConfig::new(2, 1).validate().is_ok());
        assert!(QueueConfig::new(64, 128).named("rx").validate().is_ok());
    }

    #[test]
    fn test_capacity_too_small() {
        assert_eq!(
            QueueConfig::new(1, 4).validate(),
            Err(Error::CapacityTooSmall { min: 2, actual: 1 })
        );
        assert_eq!(
            QueueConfig::new(0, 4).validate(),
            Err(Error::CapacityTooSmall { min: 2, actual: 0 })
        );
    }

    #[test]
    fn test_element_size_zero() {
        assert_eq!(
            QueueConfig::new(8, 0).validate(),
            Err(Error::ElementSizeZero)
        );
    }
}
