//! Error types for PicoQueue
//!
//! no_std compatible error handling

/// Queue error enumeration
///
/// Every public operation reports its outcome through this closed set.
/// `QueueFull` and `QueueEmpty` are clean state refusals: nothing was copied
/// and the backend is unchanged, the caller is expected to poll and retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Requested capacity is below the supported minimum
    CapacityTooSmall { min: usize, actual: usize },
    /// Element size must be at least one byte
    ElementSizeZero,
    /// Source element is larger than the configured element size
    ElementTooLarge {
        element_size: usize,
        actual: usize,
    },
    /// Destination buffer cannot hold one element
    BufferTooSmall { required: usize, actual: usize },
    /// Backing memory allocation failed
    AllocFailed { requested: usize },
    /// Lock primitive could not be acquired
    LockFailed,
    /// Queue is full, element was not written
    QueueFull,
    /// Queue is empty, nothing was read
    QueueEmpty,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::CapacityTooSmall { min, actual } => {
                write!(f, "Capacity too small: min {}, actual {}", min, actual)
            }
            Error::ElementSizeZero => write!(f, "Element size must be at least one byte"),
            Error::ElementTooLarge {
                element_size,
                actual,
            } => {
                write!(
                    f,
                    "Element too large: element size {} bytes, actual {} bytes",
                    element_size, actual
                )
            }
            Error::BufferTooSmall { required, actual } => {
                write!(
                    f,
                    "Destination buffer too small: required {} bytes, actual {} bytes",
                    required, actual
                )
            }
            Error::AllocFailed { requested } => {
                write!(f, "Allocation of {} bytes failed", requested)
            }
            Error::LockFailed => write!(f, "Lock primitive could not be acquired"),
            Error::QueueFull => write!(f, "Queue is full"),
            Error::QueueEmpty => write!(f, "Queue is empty"),
        }
    }
}

impl core::error::Error for Error {}

pub type Result<T> = core::result::Result<T, Error>;
