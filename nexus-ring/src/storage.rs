//! Storage trait for the arenas that hold ring nodes.
//!
//! Rings never own their nodes. Sentinels and elements live in a slab-like
//! storage and refer to each other by [`Key`], so splicing a whole queue into
//! another is a handful of key writes and no node ever moves in memory.
//!
//! The storage is also the allocator the queue API sees: a failed
//! [`Storage::try_insert`] is how slot exhaustion is reported.

use crate::Key;

/// Slab-like storage with stable keys.
///
/// # Requirements
///
/// - **Stable keys**: a key stays valid until its slot is removed
/// - **O(1)** insert, remove and get
///
/// # Implementations
///
/// - `slab::Slab<T>` - growable, insertion never reports exhaustion
/// - [`BoundedSlab<T>`] - fixed slot budget, insertion fails with [`Full`]
pub trait Storage<T> {
    /// Key type for this storage.
    type Key: Key;

    /// Inserts a value, returning its stable key.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` if the storage cannot take another slot.
    fn try_insert(&mut self, value: T) -> Result<Self::Key, Full<T>>;

    /// Removes and returns the value at `key`, if present.
    fn remove(&mut self, key: Self::Key) -> Option<T>;

    /// Returns a reference to the value at `key`, if present.
    fn get(&self, key: Self::Key) -> Option<&T>;

    /// Returns a mutable reference to the value at `key`, if present.
    fn get_mut(&mut self, key: Self::Key) -> Option<&mut T>;

    /// Returns the number of occupied slots.
    fn len(&self) -> usize;

    /// Returns `true` if no slot is occupied.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Error returned when storage has no free slot left.
///
/// Hands the rejected value back so nothing is lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Full<T>(pub T);

impl<T> Full<T> {
    /// Returns the value that could not be inserted.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> core::fmt::Display for Full<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "storage is exhausted")
    }
}

impl<T: core::fmt::Debug> std::error::Error for Full<T> {}

// =============================================================================
// slab::Slab - growable
// =============================================================================

impl<T> Storage<T> for slab::Slab<T> {
    type Key = usize;

    #[inline]
    fn try_insert(&mut self, value: T) -> Result<usize, Full<T>> {
        Ok(slab::Slab::insert(self, value))
    }

    #[inline]
    fn remove(&mut self, key: usize) -> Option<T> {
        slab::Slab::try_remove(self, key)
    }

    #[inline]
    fn get(&self, key: usize) -> Option<&T> {
        slab::Slab::get(self, key)
    }

    #[inline]
    fn get_mut(&mut self, key: usize) -> Option<&mut T> {
        slab::Slab::get_mut(self, key)
    }

    #[inline]
    fn len(&self) -> usize {
        slab::Slab::len(self)
    }
}

// =============================================================================
// BoundedSlab - fixed slot budget
// =============================================================================

/// A slab with a hard slot budget.
///
/// All slots are reserved up front. Once `capacity` slots are occupied,
/// [`Storage::try_insert`] fails with [`Full`] until something is removed,
/// which is how a queue built on it observes allocator exhaustion.
///
/// # Example
///
/// ```
/// use nexus_ring::{BoundedSlab, Storage};
///
/// let mut storage: BoundedSlab<u64> = BoundedSlab::with_capacity(2);
/// storage.try_insert(1).unwrap();
/// storage.try_insert(2).unwrap();
/// assert_eq!(storage.try_insert(3).unwrap_err().into_inner(), 3);
/// ```
#[derive(Debug)]
pub struct BoundedSlab<T> {
    slots: slab::Slab<T>,
    capacity: usize,
}

impl<T> BoundedSlab<T> {
    /// Creates storage that holds at most `capacity` values.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: slab::Slab::with_capacity(capacity),
            capacity,
        }
    }

    /// Returns the slot budget.
    #[inline]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns `true` if every slot is occupied.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.slots.len() >= self.capacity
    }

    /// Returns the number of free slots.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.capacity.saturating_sub(self.slots.len())
    }
}

impl<T> Storage<T> for BoundedSlab<T> {
    type Key = usize;

    #[inline]
    fn try_insert(&mut self, value: T) -> Result<usize, Full<T>> {
        if self.is_full() {
            return Err(Full(value));
        }
        Ok(self.slots.insert(value))
    }

    #[inline]
    fn remove(&mut self, key: usize) -> Option<T> {
        self.slots.try_remove(key)
    }

    #[inline]
    fn get(&self, key: usize) -> Option<&T> {
        self.slots.get(key)
    }

    #[inline]
    fn get_mut(&mut self, key: usize) -> Option<&mut T> {
        self.slots.get_mut(key)
    }

    #[inline]
    fn len(&self) -> usize {
        self.slots.len()
    }
}
