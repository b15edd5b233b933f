//! Monotonic filters.
//!
//! Both filters sweep once from the back, keeping the running extreme of the
//! suffix seen so far, and remove every element on the wrong side of it.

use std::cmp::Ordering;

use crate::link;
use crate::{Key, Queue, RingNode, Storage};

impl<S, K: Key> Queue<S, K>
where
    S: Storage<RingNode<K>, Key = K>,
{
    /// Removes every element that has a strictly smaller element after it.
    ///
    /// What remains is non-decreasing front to back. Returns the remaining
    /// count, or 0 if the queue is empty or not live.
    ///
    /// # Example
    ///
    /// ```
    /// use nexus_ring::{Queue, RingStorage};
    ///
    /// let mut storage = RingStorage::new();
    /// let mut queue = Queue::create(&mut storage).unwrap();
    /// for text in ["5", "2", "9", "3", "8"] {
    ///     queue.push_back(&mut storage, text).unwrap();
    /// }
    ///
    /// assert_eq!(queue.ascend(&mut storage), 3);
    /// let kept: Vec<_> = queue.iter(&storage).map(|e| e.as_bytes()).collect();
    /// assert_eq!(kept, [b"2", b"3", b"8"]);
    /// ```
    pub fn ascend(&mut self, storage: &mut S) -> usize {
        self.retain_monotonic(storage, Ordering::Greater)
    }

    /// Removes every element that has a strictly greater element after it.
    ///
    /// What remains is non-increasing front to back. Returns the remaining
    /// count, or 0 if the queue is empty or not live.
    pub fn descend(&mut self, storage: &mut S) -> usize {
        self.retain_monotonic(storage, Ordering::Less)
    }

    /// Drops each element that compares as `drop` against the last kept one.
    fn retain_monotonic(&mut self, storage: &mut S, drop: Ordering) -> usize {
        if self.is_empty(storage) {
            return 0;
        }

        let head = self.head;
        let mut kept_key = link::prev(storage, head);
        let mut kept = 1usize;
        let mut removed = 0usize;

        let mut key = link::prev(storage, kept_key);
        while key != head {
            let before = link::prev(storage, key);
            if Self::text(storage, key).cmp(Self::text(storage, kept_key)) == drop {
                self.release(storage, key);
                removed += 1;
            } else {
                kept_key = key;
                kept += 1;
            }
            key = before;
        }

        tracing::trace!(kept, removed, "monotonic filter");
        kept
    }
}
