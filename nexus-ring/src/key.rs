//! Key trait for slots in ring storage.
//!
//! Every link in a ring is a [`Key`] into the storage that holds the node.
//! `NONE` marks a link that currently points nowhere: a node that has just
//! been unlinked, or a chain that has been opened up for sorting.

/// Trait for key types that address ring nodes.
///
/// # Example
///
/// ```
/// use nexus_ring::Key;
///
/// let key: usize = 7;
/// assert!(key.is_some());
/// assert!(usize::NONE.is_none());
/// ```
pub trait Key: Copy + Eq + core::fmt::Debug + 'static {
    /// Sentinel value for a detached link.
    const NONE: Self;

    /// Returns `true` if this is the detached-link value.
    #[inline]
    fn is_none(&self) -> bool {
        *self == Self::NONE
    }

    /// Returns `true` if this addresses a slot.
    #[inline]
    fn is_some(&self) -> bool {
        !self.is_none()
    }
}

impl Key for usize {
    const NONE: Self = usize::MAX;
}
