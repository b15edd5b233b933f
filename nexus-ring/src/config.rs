//! Storage builders and sort configuration.
//!
//! # Example
//!
//! ```
//! use nexus_ring::{Order, RingBuilder, SortConfig, TieBreak};
//!
//! let growable = RingBuilder::default().capacity(1024).build();
//! assert!(growable.capacity() >= 1024);
//!
//! let bounded = RingBuilder::default().bounded().capacity(64).build().unwrap();
//! assert_eq!(bounded.capacity(), 64);
//!
//! let config = SortConfig::from(Order::Descending).tie_break(TieBreak::Stable);
//! assert_eq!(config.order, Order::Descending);
//! ```

use std::cmp::Ordering;

use crate::{BoundedRingStorage, BuildError, RingStorage};

// =============================================================================
// Sort configuration
// =============================================================================

/// Direction of a sort or merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Order {
    /// Smallest text first.
    #[default]
    Ascending,
    /// Largest text first.
    Descending,
}

impl Order {
    /// Maps a `descend` flag to an order.
    #[inline]
    pub const fn from_descend(descend: bool) -> Self {
        if descend {
            Self::Descending
        } else {
            Self::Ascending
        }
    }

    /// Returns `true` for [`Order::Descending`].
    #[inline]
    pub const fn is_descending(self) -> bool {
        matches!(self, Self::Descending)
    }
}

/// Which run an equal pair is taken from while merging.
///
/// Only ascending sorts differ: descending sorts take the left run on ties
/// under either policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TieBreak {
    /// Ascending merges take the right run on ties, descending merges the
    /// left. Equal texts can come out of an ascending sort reordered.
    #[default]
    Mirrored,
    /// Both directions take the left run on ties, so sorting is stable.
    Stable,
}

/// Parameters of [`Queue::sort_with`](crate::Queue::sort_with) and
/// [`QueueChain::merge_with`](crate::QueueChain::merge_with).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SortConfig {
    /// Sort direction.
    pub order: Order,
    /// Tie policy for equal texts.
    pub tie_break: TieBreak,
}

impl SortConfig {
    /// Sets the tie policy.
    pub const fn tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    /// Decides whether the merge takes the left run's element, given how
    /// the left text compares to the right.
    #[inline]
    pub(crate) fn takes_left(&self, left_to_right: Ordering) -> bool {
        match (self.order, self.tie_break) {
            (Order::Ascending, TieBreak::Mirrored) => left_to_right == Ordering::Less,
            (Order::Ascending, TieBreak::Stable) => left_to_right != Ordering::Greater,
            (Order::Descending, _) => left_to_right != Ordering::Less,
        }
    }
}

impl From<Order> for SortConfig {
    fn from(order: Order) -> Self {
        Self {
            order,
            tie_break: TieBreak::default(),
        }
    }
}

// =============================================================================
// Builders
// =============================================================================

/// Builder for growable ring storage.
///
/// Call `.bounded()` to switch to a fixed slot budget.
#[derive(Clone, Debug, Default)]
pub struct RingBuilder {
    capacity: Option<usize>,
}

/// Builder for ring storage with a fixed slot budget.
///
/// Created via `RingBuilder::default().bounded()`.
#[derive(Clone, Debug)]
pub struct BoundedRingBuilder {
    capacity: Option<usize>,
}

impl RingBuilder {
    /// Pre-allocate room for at least this many slots.
    /// Storage can grow beyond this. Default: no pre-allocation.
    ///
    /// Each queue takes two slots for its sentinels on top of its elements.
    pub fn capacity(mut self, slots: usize) -> Self {
        self.capacity = Some(slots);
        self
    }

    /// Convert to bounded builder.
    pub fn bounded(self) -> BoundedRingBuilder {
        BoundedRingBuilder {
            capacity: self.capacity,
        }
    }

    /// Build growable storage.
    pub fn build(self) -> RingStorage {
        match self.capacity {
            Some(slots) => RingStorage::with_capacity(slots),
            None => RingStorage::new(),
        }
    }
}

impl BoundedRingBuilder {
    /// Slot budget. Required for bounded mode.
    pub fn capacity(mut self, slots: usize) -> Self {
        self.capacity = Some(slots);
        self
    }

    /// Build bounded storage.
    ///
    /// # Errors
    ///
    /// - [`BuildError::MissingCapacity`] if no capacity was set
    /// - [`BuildError::ZeroCapacity`] if the capacity is zero
    pub fn build(self) -> Result<BoundedRingStorage, BuildError> {
        let capacity = self.capacity.ok_or(BuildError::MissingCapacity)?;
        if capacity == 0 {
            return Err(BuildError::ZeroCapacity);
        }

        tracing::debug!(capacity, "bounded ring storage");
        Ok(BoundedRingStorage::with_capacity(capacity))
    }
}
