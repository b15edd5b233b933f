//! Error types for queue and storage construction.

use std::collections::TryReserveError;

/// Errors reported by queue operations.
///
/// Empty-queue preconditions are not errors: pops return `None`, filters
/// return `0` and the boolean transforms return `false`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueueError {
    /// The handle does not name a live queue in the storage it was used with.
    #[error("handle does not name a live queue in this storage")]
    UnknownQueue,

    /// Element text must not contain the NUL terminator.
    #[error("text contains a NUL byte at offset {position}")]
    InvalidText {
        /// Offset of the first NUL byte.
        position: usize,
    },

    /// The storage has no free slot for another node.
    #[error("ring storage is exhausted")]
    Exhausted,

    /// The text buffer could not be allocated.
    #[error("text buffer allocation failed: {0}")]
    BufferExhausted(#[from] TryReserveError),
}

impl QueueError {
    /// Returns `true` for either kind of allocation failure.
    pub fn is_exhaustion(&self) -> bool {
        matches!(self, Self::Exhausted | Self::BufferExhausted(_))
    }
}

/// Errors building ring storage from a builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// Bounded storage was built without a slot budget.
    #[error("capacity is required for bounded storage")]
    MissingCapacity,

    /// Bounded storage needs a non-zero slot budget.
    #[error("capacity must be > 0")]
    ZeroCapacity,
}
