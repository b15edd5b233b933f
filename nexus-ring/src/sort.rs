//! Merge sort over a queue's ring.
//!
//! The ring is opened into a `NONE`-terminated forward chain, sorted with a
//! recursive top-down merge sort that only rewrites `next` links, then the
//! `prev` links are rebuilt and the ring is closed again. Recursion depth is
//! `O(log n)` and nothing is allocated.

use crate::link;
use crate::{Key, Order, Queue, RingNode, SortConfig, Storage};

impl<S, K: Key> Queue<S, K>
where
    S: Storage<RingNode<K>, Key = K>,
{
    /// Sorts the queue by byte-lexicographic text order.
    ///
    /// Equal texts follow [`TieBreak::Mirrored`](crate::TieBreak::Mirrored);
    /// use [`Queue::sort_with`] to pick the policy.
    ///
    /// # Example
    ///
    /// ```
    /// use nexus_ring::{Order, Queue, RingStorage};
    ///
    /// let mut storage = RingStorage::new();
    /// let mut queue = Queue::create(&mut storage).unwrap();
    /// for text in ["pear", "apple", "fig"] {
    ///     queue.push_back(&mut storage, text).unwrap();
    /// }
    ///
    /// queue.sort(&mut storage, Order::Ascending);
    /// let sorted: Vec<_> = queue.iter(&storage).map(|e| e.to_str().unwrap()).collect();
    /// assert_eq!(sorted, ["apple", "fig", "pear"]);
    /// ```
    pub fn sort(&mut self, storage: &mut S, order: Order) {
        self.sort_with(storage, SortConfig::from(order));
    }

    /// Sorts the queue with an explicit direction and tie policy.
    pub fn sort_with(&mut self, storage: &mut S, config: SortConfig) {
        if !self.is_live(storage) {
            return;
        }

        let head = self.head;
        if link::is_empty(storage, head) || link::is_singular(storage, head) {
            return;
        }

        let first = link::next(storage, head);
        let last = link::prev(storage, head);
        link::set_next(storage, last, K::NONE);

        let sorted = Self::merge_sort(storage, first, config);

        let mut before = head;
        let mut key = sorted;
        while key.is_some() {
            link::set_prev(storage, key, before);
            link::set_next(storage, before, key);
            before = key;
            key = link::next(storage, key);
        }
        link::set_next(storage, before, head);
        link::set_prev(storage, head, before);
    }

    /// Sorts the chain starting at `first`, returning the new first key.
    fn merge_sort(storage: &mut S, first: K, config: SortConfig) -> K {
        if first.is_none() || link::next(storage, first).is_none() {
            return first;
        }

        // left half keeps the extra element of an odd chain
        let mut slow = first;
        let mut fast = link::next(storage, first);
        while fast.is_some() {
            fast = link::next(storage, fast);
            if fast.is_some() {
                slow = link::next(storage, slow);
                fast = link::next(storage, fast);
            }
        }

        let right = link::next(storage, slow);
        link::set_next(storage, slow, K::NONE);

        let left = Self::merge_sort(storage, first, config);
        let right = Self::merge_sort(storage, right, config);
        Self::merge(storage, left, right, config)
    }

    /// Merges two sorted chains, returning the first key of the result.
    fn merge(storage: &mut S, mut left: K, mut right: K, config: SortConfig) -> K {
        let mut first = K::NONE;
        let mut tail = K::NONE;

        while left.is_some() && right.is_some() {
            let ordering = Self::text(storage, left).cmp(Self::text(storage, right));
            let key = if config.takes_left(ordering) {
                let key = left;
                left = link::next(storage, left);
                key
            } else {
                let key = right;
                right = link::next(storage, right);
                key
            };

            if tail.is_none() {
                first = key;
            } else {
                link::set_next(storage, tail, key);
            }
            tail = key;
        }

        let rest = if left.is_some() { left } else { right };
        if tail.is_none() {
            return rest;
        }
        link::set_next(storage, tail, rest);
        first
    }
}
