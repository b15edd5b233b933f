//! Double-ended text queue on a circular intrusive ring.
//!
//! A [`Queue`] is nothing but the key of its sentinel node. Sentinels and
//! elements are [`RingNode`]s living in shared storage, so several queues
//! can draw from one arena and whole queues can be spliced into each other
//! in O(1).
//!
//! # Storage Invariant
//!
//! A queue must always be used with the storage it was created in. Using a
//! different storage is caught when the handle does not name a sentinel
//! there (`QueueError::UnknownQueue`, `None`, `0` or `false` depending on
//! the operation), and is otherwise the caller's responsibility, the same
//! discipline as the `slab` crate.
//!
//! # Example
//!
//! ```
//! use nexus_ring::{Queue, RingStorage};
//!
//! let mut storage = RingStorage::new();
//! let mut queue = Queue::create(&mut storage).unwrap();
//!
//! queue.push_back(&mut storage, "b").unwrap();
//! queue.push_back(&mut storage, "c").unwrap();
//! queue.push_front(&mut storage, "a").unwrap();
//! assert_eq!(queue.count(&storage), 3);
//!
//! let mut buf = [0u8; 8];
//! let element = queue.pop_front_into(&mut storage, &mut buf).unwrap();
//! assert_eq!(element.as_bytes(), b"a");
//! assert_eq!(&buf[..2], b"a\0");
//!
//! queue.destroy(&mut storage);
//! assert!(storage.is_empty());
//! ```
//!
//! # Bounded Storage
//!
//! With [`BoundedRingStorage`] the slot budget plays the allocator: pushes
//! fail with [`QueueError::Exhausted`] once it is spent, and nothing is left
//! half-inserted.
//!
//! ```
//! use nexus_ring::{Queue, QueueError, RingBuilder};
//!
//! // one queue costs two sentinel slots
//! let mut storage = RingBuilder::default().bounded().capacity(3).build().unwrap();
//! let mut queue = Queue::create(&mut storage).unwrap();
//!
//! queue.push_back(&mut storage, "only").unwrap();
//! assert_eq!(queue.push_back(&mut storage, "more"), Err(QueueError::Exhausted));
//! assert_eq!(queue.count(&storage), 1);
//! ```

use std::marker::PhantomData;

use crate::link::{self, Walk};
use crate::{BoundedSlab, Element, Key, QueueError, RingNode, Storage};

/// Growable storage for ring nodes.
pub type RingStorage = slab::Slab<RingNode<usize>>;

/// Storage for ring nodes with a fixed slot budget.
pub type BoundedRingStorage = BoundedSlab<RingNode<usize>>;

/// A double-ended queue of text elements over shared ring storage.
///
/// The queue owns two sentinel slots: its head, which closes the ring, and a
/// scratch sentinel used as a cut target by [`Queue::reverse_k`] so that no
/// transform has to allocate.
///
/// # Type Parameters
///
/// - `S`: Storage type (e.g. [`RingStorage`])
/// - `K`: Key type (default `usize`)
#[derive(Debug)]
pub struct Queue<S, K: Key = usize>
where
    S: Storage<RingNode<K>, Key = K>,
{
    pub(crate) head: K,
    pub(crate) scratch: K,
    _marker: PhantomData<S>,
}

impl<S, K: Key> Queue<S, K>
where
    S: Storage<RingNode<K>, Key = K>,
{
    /// Creates an empty queue in `storage`.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Exhausted`] if the two sentinel slots cannot be
    /// allocated. Nothing is left behind in that case.
    pub fn create(storage: &mut S) -> Result<Self, QueueError> {
        let head = storage
            .try_insert(RingNode::sentinel())
            .map_err(|_| exhausted("sentinel"))?;

        let scratch = match storage.try_insert(RingNode::sentinel()) {
            Ok(key) => key,
            Err(_) => {
                storage.remove(head);
                return Err(exhausted("scratch sentinel"));
            }
        };

        link::init(storage, head);
        link::init(storage, scratch);

        Ok(Self {
            head,
            scratch,
            _marker: PhantomData,
        })
    }

    /// Releases every element, then both sentinels.
    ///
    /// Does nothing if the handle does not name a live queue in `storage`.
    pub fn destroy(self, storage: &mut S) {
        if !self.is_live(storage) {
            tracing::debug!(head = ?self.head, "destroy on a dead queue handle");
            return;
        }

        let mut walk = Walk::new(storage, self.head);
        while let Some(key) = walk.next(storage) {
            storage.remove(key);
        }

        storage.remove(self.scratch);
        storage.remove(self.head);
    }

    /// Returns the key of the sentinel that closes this queue's ring.
    #[inline]
    pub fn head(&self) -> K {
        self.head
    }

    /// Returns `true` if both sentinels of this queue are present in `storage`.
    #[inline]
    pub fn is_live(&self, storage: &S) -> bool {
        let sentinel = |key: K| storage.get(key).is_some_and(RingNode::is_sentinel);
        sentinel(self.head) && sentinel(self.scratch)
    }

    #[inline]
    pub(crate) fn ensure_live(&self, storage: &S) -> Result<(), QueueError> {
        if self.is_live(storage) {
            Ok(())
        } else {
            tracing::debug!(head = ?self.head, "queue handle is not live in this storage");
            Err(QueueError::UnknownQueue)
        }
    }

    /// Returns `true` if the queue has no elements (or is not live).
    #[inline]
    pub fn is_empty(&self, storage: &S) -> bool {
        !self.is_live(storage) || link::is_empty(storage, self.head)
    }

    /// Returns `true` if the queue has exactly one element.
    #[inline]
    pub fn is_singular(&self, storage: &S) -> bool {
        self.is_live(storage) && link::is_singular(storage, self.head)
    }

    /// Returns the number of elements. O(n).
    ///
    /// Returns 0 for a handle that is not live.
    pub fn count(&self, storage: &S) -> usize {
        if !self.is_live(storage) {
            return 0;
        }
        link::len(storage, self.head)
    }

    // ========================================================================
    // Insert
    // ========================================================================

    /// Pushes a copy of `text` to the front of the queue.
    ///
    /// Returns the key of the new element.
    ///
    /// # Errors
    ///
    /// - [`QueueError::UnknownQueue`] if the handle is not live in `storage`
    /// - [`QueueError::InvalidText`] if `text` contains a NUL byte
    /// - [`QueueError::BufferExhausted`] / [`QueueError::Exhausted`] on
    ///   allocation failure; the queue is unchanged
    pub fn push_front(&mut self, storage: &mut S, text: impl AsRef<[u8]>) -> Result<K, QueueError> {
        let key = self.allocate(storage, text)?;
        link::insert_after(storage, self.head, key);
        Ok(key)
    }

    /// Pushes a copy of `text` to the back of the queue.
    ///
    /// Returns the key of the new element.
    ///
    /// # Errors
    ///
    /// Same as [`Queue::push_front`].
    pub fn push_back(&mut self, storage: &mut S, text: impl AsRef<[u8]>) -> Result<K, QueueError> {
        let key = self.allocate(storage, text)?;
        link::insert_before(storage, self.head, key);
        Ok(key)
    }

    /// Builds an unlinked element node. The text buffer is allocated first so
    /// a slot failure only has to drop it.
    fn allocate(&self, storage: &mut S, text: impl AsRef<[u8]>) -> Result<K, QueueError> {
        self.ensure_live(storage)?;
        let element = Element::new(text)?;
        storage
            .try_insert(RingNode::with_element(element))
            .map_err(|_| exhausted("element"))
    }

    // ========================================================================
    // Remove
    // ========================================================================

    /// Removes the front element and hands it to the caller.
    ///
    /// Returns `None` if the queue is empty or not live.
    pub fn pop_front(&mut self, storage: &mut S) -> Option<Element> {
        if self.is_empty(storage) {
            return None;
        }
        let key = link::next(storage, self.head);
        self.take(storage, key)
    }

    /// Removes the back element and hands it to the caller.
    ///
    /// Returns `None` if the queue is empty or not live.
    pub fn pop_back(&mut self, storage: &mut S) -> Option<Element> {
        if self.is_empty(storage) {
            return None;
        }
        let key = link::prev(storage, self.head);
        self.take(storage, key)
    }

    /// Like [`Queue::pop_front`], also copying the text into `buf`.
    ///
    /// At most `buf.len() - 1` bytes are copied and `buf` is always
    /// NUL-terminated; longer text is truncated silently. The returned
    /// element keeps its full text.
    pub fn pop_front_into(&mut self, storage: &mut S, buf: &mut [u8]) -> Option<Element> {
        let element = self.pop_front(storage)?;
        element.copy_to(buf);
        Some(element)
    }

    /// Like [`Queue::pop_back`], also copying the text into `buf`.
    ///
    /// See [`Queue::pop_front_into`] for the truncation rule.
    pub fn pop_back_into(&mut self, storage: &mut S, buf: &mut [u8]) -> Option<Element> {
        let element = self.pop_back(storage)?;
        element.copy_to(buf);
        Some(element)
    }

    /// Unlinks `key` and returns its element.
    #[inline]
    pub(crate) fn take(&mut self, storage: &mut S, key: K) -> Option<Element> {
        link::unlink(storage, key);
        storage.remove(key).and_then(RingNode::into_element)
    }

    /// Unlinks `key` and drops its element.
    #[inline]
    pub(crate) fn release(&mut self, storage: &mut S, key: K) {
        drop(self.take(storage, key));
    }

    // ========================================================================
    // Access
    // ========================================================================

    /// Returns the front element.
    pub fn front<'a>(&self, storage: &'a S) -> Option<&'a Element> {
        if self.is_empty(storage) {
            return None;
        }
        element(storage, link::next(storage, self.head))
    }

    /// Returns the back element.
    pub fn back<'a>(&self, storage: &'a S) -> Option<&'a Element> {
        if self.is_empty(storage) {
            return None;
        }
        element(storage, link::prev(storage, self.head))
    }

    /// Returns the element at `key`, or `None` for a vacant slot or sentinel.
    #[inline]
    pub fn get<'a>(&self, storage: &'a S, key: K) -> Option<&'a Element> {
        element(storage, key)
    }

    /// Returns an iterator over elements, front to back.
    pub fn iter<'a>(&self, storage: &'a S) -> Iter<'a, S, K> {
        Iter {
            keys: self.keys(storage),
        }
    }

    /// Returns an iterator over element keys, front to back.
    pub fn keys<'a>(&self, storage: &'a S) -> Keys<'a, S, K> {
        let (front, back) = if self.is_empty(storage) {
            (K::NONE, K::NONE)
        } else {
            (
                link::next(storage, self.head),
                link::prev(storage, self.head),
            )
        };

        Keys {
            storage,
            front,
            back,
        }
    }

    /// Returns the text of the element at `key`; empty for a sentinel.
    #[inline]
    pub(crate) fn text(storage: &S, key: K) -> &[u8] {
        element(storage, key)
            .map(Element::as_bytes)
            .unwrap_or_default()
    }
}

#[inline]
fn element<S, K>(storage: &S, key: K) -> Option<&Element>
where
    K: Key,
    S: Storage<RingNode<K>, Key = K>,
{
    storage.get(key).and_then(RingNode::element)
}

#[inline]
fn exhausted(what: &'static str) -> QueueError {
    tracing::debug!(what, "ring storage exhausted");
    QueueError::Exhausted
}

// =============================================================================
// Iterators
// =============================================================================

/// Iterator over element keys in a queue.
pub struct Keys<'a, S, K: Key> {
    storage: &'a S,
    front: K,
    back: K,
}

impl<S, K: Key> Iterator for Keys<'_, S, K>
where
    S: Storage<RingNode<K>, Key = K>,
{
    type Item = K;

    #[inline]
    fn next(&mut self) -> Option<K> {
        if self.front.is_none() {
            return None;
        }

        let key = self.front;
        if self.front == self.back {
            self.front = K::NONE;
            self.back = K::NONE;
        } else {
            self.front = link::next(self.storage, key);
        }

        Some(key)
    }
}

impl<S, K: Key> DoubleEndedIterator for Keys<'_, S, K>
where
    S: Storage<RingNode<K>, Key = K>,
{
    #[inline]
    fn next_back(&mut self) -> Option<K> {
        if self.back.is_none() {
            return None;
        }

        let key = self.back;
        if self.front == self.back {
            self.front = K::NONE;
            self.back = K::NONE;
        } else {
            self.back = link::prev(self.storage, key);
        }

        Some(key)
    }
}

/// Iterator over references to the elements of a queue.
pub struct Iter<'a, S, K: Key> {
    keys: Keys<'a, S, K>,
}

impl<'a, S, K: Key> Iterator for Iter<'a, S, K>
where
    S: Storage<RingNode<K>, Key = K>,
{
    type Item = &'a Element;

    #[inline]
    fn next(&mut self) -> Option<&'a Element> {
        let key = self.keys.next()?;
        element(self.keys.storage, key)
    }
}

impl<'a, S, K: Key> DoubleEndedIterator for Iter<'a, S, K>
where
    S: Storage<RingNode<K>, Key = K>,
{
    #[inline]
    fn next_back(&mut self) -> Option<&'a Element> {
        let key = self.keys.next_back()?;
        element(self.keys.storage, key)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::RingBuilder;

    pub(crate) fn queue_of(storage: &mut RingStorage, texts: &[&str]) -> Queue<RingStorage> {
        let mut queue = Queue::create(storage).unwrap();
        for text in texts {
            queue.push_back(storage, text).unwrap();
        }
        queue
    }

    pub(crate) fn texts(queue: &Queue<RingStorage>, storage: &RingStorage) -> Vec<String> {
        queue
            .iter(storage)
            .map(|element| element.to_str().unwrap().to_owned())
            .collect()
    }

    pub(crate) fn assert_ring(queue: &Queue<RingStorage>, storage: &RingStorage) {
        let head = queue.head();
        let mut key = head;
        let mut steps = 0;
        loop {
            let after = link::next(storage, key);
            assert_eq!(link::prev(storage, after), key, "broken back link at {after}");
            key = after;
            if key == head {
                break;
            }
            steps += 1;
        }
        assert_eq!(steps, queue.count(storage));
        assert!(link::is_empty(storage, queue.scratch));
    }

    #[test]
    fn create_is_empty() {
        let mut storage = RingStorage::new();
        let queue = Queue::create(&mut storage).unwrap();

        assert!(queue.is_live(&storage));
        assert!(queue.is_empty(&storage));
        assert!(!queue.is_singular(&storage));
        assert_eq!(queue.count(&storage), 0);
        assert!(queue.front(&storage).is_none());
        assert!(queue.back(&storage).is_none());
        assert_ring(&queue, &storage);
    }

    #[test]
    fn push_back_keeps_order() {
        let mut storage = RingStorage::new();
        let queue = queue_of(&mut storage, &["a", "b", "c"]);

        assert_eq!(texts(&queue, &storage), ["a", "b", "c"]);
        assert_eq!(queue.count(&storage), 3);
        assert_ring(&queue, &storage);
    }

    #[test]
    fn push_front_reverses_order() {
        let mut storage = RingStorage::new();
        let mut queue = Queue::create(&mut storage).unwrap();

        for text in ["a", "b", "c"] {
            queue.push_front(&mut storage, text).unwrap();
        }

        assert_eq!(texts(&queue, &storage), ["c", "b", "a"]);
        assert_eq!(queue.front(&storage).unwrap().as_bytes(), b"c");
        assert_eq!(queue.back(&storage).unwrap().as_bytes(), b"a");
        assert_ring(&queue, &storage);
    }

    #[test]
    fn push_returns_element_key() {
        let mut storage = RingStorage::new();
        let mut queue = Queue::create(&mut storage).unwrap();

        let key = queue.push_back(&mut storage, "x").unwrap();
        assert_eq!(queue.get(&storage, key).unwrap().as_bytes(), b"x");
        assert!(queue.get(&storage, queue.head()).is_none());
    }

    fn ends<'a, S, K>(queue: &Queue<S, K>, storage: &'a S) -> Option<(&'a [u8], &'a [u8])>
    where
        K: Key,
        S: Storage<RingNode<K>, Key = K>,
    {
        let front = queue.front(storage)?;
        let back = queue.back(storage)?;
        Some((front.as_bytes(), back.as_bytes()))
    }

    #[test]
    fn borrows_outlive_generic_access() {
        let mut storage = RingStorage::new();
        let queue = queue_of(&mut storage, &["a", "b", "c"]);
        assert_eq!(ends(&queue, &storage), Some((&b"a"[..], &b"c"[..])));

        let mut bounded: BoundedRingStorage = RingBuilder::default()
            .bounded()
            .capacity(3)
            .build()
            .unwrap();
        let mut single = Queue::create(&mut bounded).unwrap();
        assert_eq!(ends(&single, &bounded), None);

        let key = single.push_back(&mut bounded, "only").unwrap();
        assert_eq!(ends(&single, &bounded), Some((&b"only"[..], &b"only"[..])));
        single.pop_back(&mut bounded).unwrap();
        assert!(single.get(&bounded, key).is_none());
    }

    #[test]
    fn push_rejects_nul() {
        let mut storage = RingStorage::new();
        let mut queue = Queue::create(&mut storage).unwrap();

        let err = queue.push_back(&mut storage, b"a\0b").unwrap_err();
        assert_eq!(err, QueueError::InvalidText { position: 1 });
        assert!(queue.is_empty(&storage));
        assert_eq!(storage.len(), 2);
    }

    #[test]
    fn pop_front_and_back() {
        let mut storage = RingStorage::new();
        let mut queue = queue_of(&mut storage, &["a", "b", "c"]);

        assert_eq!(queue.pop_front(&mut storage).unwrap().as_bytes(), b"a");
        assert_eq!(queue.pop_back(&mut storage).unwrap().as_bytes(), b"c");
        assert_eq!(texts(&queue, &storage), ["b"]);
        assert!(queue.is_singular(&storage));
        assert_ring(&queue, &storage);

        assert!(queue.pop_back(&mut storage).is_some());
        assert!(queue.pop_front(&mut storage).is_none());
        assert!(queue.pop_back(&mut storage).is_none());
        assert_ring(&queue, &storage);
    }

    #[test]
    fn pop_into_truncates_copy_only() {
        let mut storage = RingStorage::new();
        let mut queue = queue_of(&mut storage, &["abcdef", "xyz"]);

        let mut buf = [0xaau8; 4];
        let element = queue.pop_front_into(&mut storage, &mut buf).unwrap();
        assert_eq!(&buf, b"abc\0");
        assert_eq!(element.as_bytes(), b"abcdef");

        let mut buf = [0xaau8; 8];
        let element = queue.pop_back_into(&mut storage, &mut buf).unwrap();
        assert_eq!(&buf[..4], b"xyz\0");
        assert_eq!(element.as_bytes(), b"xyz");

        assert!(queue.pop_front_into(&mut storage, &mut buf).is_none());
    }

    #[test]
    fn pop_releases_slot() {
        let mut storage = RingStorage::new();
        let mut queue = queue_of(&mut storage, &["a"]);
        assert_eq!(storage.len(), 3);

        let element = queue.pop_front(&mut storage).unwrap();
        assert_eq!(storage.len(), 2);
        assert_eq!(element.into_c_string().as_bytes(), b"a");
    }

    #[test]
    fn destroy_releases_everything() {
        let mut storage = RingStorage::new();
        let queue = queue_of(&mut storage, &["a", "b", "c"]);
        let other = queue_of(&mut storage, &["z"]);

        queue.destroy(&mut storage);
        assert_eq!(storage.len(), 3);
        assert_eq!(texts(&other, &storage), ["z"]);

        other.destroy(&mut storage);
        assert!(storage.is_empty());
    }

    #[test]
    fn foreign_storage_is_rejected() {
        let mut storage = RingStorage::new();
        let mut queue = queue_of(&mut storage, &["a"]);
        let mut foreign = RingStorage::new();

        assert!(!queue.is_live(&foreign));
        assert_eq!(
            queue.push_back(&mut foreign, "b"),
            Err(QueueError::UnknownQueue)
        );
        assert!(queue.pop_front(&mut foreign).is_none());
        assert_eq!(queue.count(&foreign), 0);
        assert!(queue.is_empty(&foreign));
        assert!(foreign.is_empty());

        queue.destroy(&mut foreign);
        assert_eq!(storage.len(), 3);
    }

    #[test]
    fn create_exhaustion_leaves_nothing() {
        let mut storage = RingBuilder::default().bounded().capacity(1).build().unwrap();

        let err = Queue::create(&mut storage).unwrap_err();
        assert_eq!(err, QueueError::Exhausted);
        assert!(Storage::is_empty(&storage));
    }

    #[test]
    fn push_exhaustion_is_atomic() {
        let mut storage = RingBuilder::default().bounded().capacity(4).build().unwrap();
        let mut queue = Queue::create(&mut storage).unwrap();

        queue.push_back(&mut storage, "a").unwrap();
        queue.push_front(&mut storage, "b").unwrap();
        assert_eq!(queue.push_back(&mut storage, "c"), Err(QueueError::Exhausted));
        assert_eq!(queue.push_front(&mut storage, "d"), Err(QueueError::Exhausted));

        assert_eq!(queue.count(&storage), 2);
        assert_eq!(Storage::len(&storage), 4);

        queue.pop_back(&mut storage).unwrap();
        queue.push_back(&mut storage, "c").unwrap();
        let all: Vec<_> = queue.iter(&storage).map(Element::as_bytes).collect();
        assert_eq!(all, [b"b", b"c"]);
    }

    #[test]
    fn iter_double_ended() {
        let mut storage = RingStorage::new();
        let queue = queue_of(&mut storage, &["1", "2", "3", "4"]);

        let mut iter = queue.iter(&storage);
        assert_eq!(iter.next().unwrap().as_bytes(), b"1");
        assert_eq!(iter.next_back().unwrap().as_bytes(), b"4");
        assert_eq!(iter.next().unwrap().as_bytes(), b"2");
        assert_eq!(iter.next_back().unwrap().as_bytes(), b"3");
        assert!(iter.next().is_none());
        assert!(iter.next_back().is_none());

        let rev: Vec<_> = queue.iter(&storage).rev().map(Element::as_bytes).collect();
        assert_eq!(rev, [b"4", b"3", b"2", b"1"]);
    }

    #[test]
    fn keys_match_push_order() {
        let mut storage = RingStorage::new();
        let mut queue = Queue::create(&mut storage).unwrap();

        let a = queue.push_back(&mut storage, "a").unwrap();
        let b = queue.push_back(&mut storage, "b").unwrap();

        assert_eq!(queue.keys(&storage).collect::<Vec<_>>(), vec![a, b]);
        assert_eq!(queue.keys(&storage).rev().collect::<Vec<_>>(), vec![b, a]);
    }

    #[test]
    fn queues_share_storage() {
        let mut storage = RingStorage::new();
        let mut left = Queue::create(&mut storage).unwrap();
        let mut right = Queue::create(&mut storage).unwrap();

        left.push_back(&mut storage, "l").unwrap();
        right.push_back(&mut storage, "r").unwrap();
        left.push_back(&mut storage, "l2").unwrap();

        assert_eq!(texts(&left, &storage), ["l", "l2"]);
        assert_eq!(texts(&right, &storage), ["r"]);
        assert_ring(&left, &storage);
        assert_ring(&right, &storage);
    }
}
