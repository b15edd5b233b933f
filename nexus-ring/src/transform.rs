//! Structural transforms that rewire a queue in place.
//!
//! None of these allocate. Destructive transforms drop the removed elements
//! themselves; the caller never sees them.

use crate::link::{self, Walk};
use crate::{Key, Queue, RingNode, Storage};

impl<S, K: Key> Queue<S, K>
where
    S: Storage<RingNode<K>, Key = K>,
{
    /// Removes the middle element.
    ///
    /// For an even count `n` this is index `n / 2`, the second of the two
    /// central elements. Returns `false` if the queue is empty or not live.
    ///
    /// # Example
    ///
    /// ```
    /// use nexus_ring::{Queue, RingStorage};
    ///
    /// let mut storage = RingStorage::new();
    /// let mut queue = Queue::create(&mut storage).unwrap();
    /// for text in ["1", "2", "3", "4"] {
    ///     queue.push_back(&mut storage, text).unwrap();
    /// }
    ///
    /// assert!(queue.delete_mid(&mut storage));
    /// let rest: Vec<_> = queue.iter(&storage).map(|e| e.as_bytes()).collect();
    /// assert_eq!(rest, [b"1", b"2", b"4"]);
    /// ```
    pub fn delete_mid(&mut self, storage: &mut S) -> bool {
        if self.is_empty(storage) {
            return false;
        }

        let head = self.head;
        let mut slow = link::next(storage, head);
        let mut fast = slow;
        loop {
            let after = link::next(storage, fast);
            if fast == head || after == head {
                break;
            }
            slow = link::next(storage, slow);
            fast = link::next(storage, after);
        }

        self.release(storage, slow);
        true
    }

    /// Removes every element whose text equals an adjacent element's.
    ///
    /// Intended for sorted input: each run of two or more equal texts is
    /// removed entirely, first occurrence included, and single elements are
    /// kept. Returns `false` if the queue is empty or not live.
    pub fn delete_dup(&mut self, storage: &mut S) -> bool {
        if self.is_empty(storage) {
            return false;
        }

        let head = self.head;
        let mut removed = 0usize;
        let mut in_run = false;
        let mut walk = Walk::new(storage, head);
        while let Some(key) = walk.next(storage) {
            let after = link::next(storage, key);
            let equal = after != head && Self::text(storage, key) == Self::text(storage, after);
            if equal || in_run {
                self.release(storage, key);
                removed += 1;
            }
            in_run = equal;
        }

        tracing::trace!(removed, "delete_dup");
        true
    }

    /// Swaps each adjacent pair: (0, 1), (2, 3), and so on.
    ///
    /// An odd last element stays where it is.
    pub fn swap(&mut self, storage: &mut S) {
        if !self.is_live(storage) {
            return;
        }

        let head = self.head;
        let mut before = head;
        loop {
            let first = link::next(storage, before);
            if first == head {
                break;
            }
            let second = link::next(storage, first);
            if second == head {
                break;
            }

            link::relocate(storage, first, second);
            before = first;
        }
    }

    /// Reverses the queue in place.
    pub fn reverse(&mut self, storage: &mut S) {
        if !self.is_live(storage) {
            return;
        }
        link::reverse(storage, self.head);
    }

    /// Reverses each consecutive run of `k` elements.
    ///
    /// A trailing run shorter than `k` keeps its order. `k <= 1` does
    /// nothing and `k >= count` reverses the whole queue.
    ///
    /// # Example
    ///
    /// ```
    /// use nexus_ring::{Queue, RingStorage};
    ///
    /// let mut storage = RingStorage::new();
    /// let mut queue = Queue::create(&mut storage).unwrap();
    /// for text in ["1", "2", "3", "4", "5"] {
    ///     queue.push_back(&mut storage, text).unwrap();
    /// }
    ///
    /// queue.reverse_k(&mut storage, 2);
    /// let order: Vec<_> = queue.iter(&storage).map(|e| e.as_bytes()).collect();
    /// assert_eq!(order, [b"2", b"1", b"4", b"3", b"5"]);
    /// ```
    pub fn reverse_k(&mut self, storage: &mut S, k: usize) {
        if k <= 1 || !self.is_live(storage) {
            return;
        }

        let head = self.head;
        let count = link::len(storage, head);
        if count < 2 {
            return;
        }
        if k >= count {
            link::reverse(storage, head);
            return;
        }

        let mut anchor = head;
        let mut run = 0usize;
        let mut runs = 0usize;
        let mut walk = Walk::new(storage, head);
        while let Some(key) = walk.next(storage) {
            run += 1;
            if run < k {
                continue;
            }

            // the run's first element ends up last, right before the next run
            let first = link::next(storage, anchor);
            link::cut(storage, self.scratch, anchor, key);
            link::reverse(storage, self.scratch);
            link::splice(storage, self.scratch, anchor);

            anchor = first;
            run = 0;
            runs += 1;
        }

        tracing::trace!(k, runs, "reverse_k");
    }
}
