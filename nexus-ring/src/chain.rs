//! Chain of queues for k-way consolidation.
//!
//! A [`QueueChain`] links context nodes, each holding one queue handle and
//! the queue's last known size. The context nodes have their own slab and
//! are chained with the same ring primitives the queues use, so the first
//! context is always `next(head)` of the chain.
//!
//! # Example
//!
//! ```
//! use nexus_ring::{Order, Queue, QueueChain, RingStorage};
//!
//! let mut storage = RingStorage::new();
//! let mut chain = QueueChain::new();
//!
//! for texts in [["3", "1"], ["4", "2"]] {
//!     let mut queue = Queue::create(&mut storage).unwrap();
//!     for text in texts {
//!         queue.push_back(&mut storage, text).unwrap();
//!     }
//!     chain.push(&storage, queue);
//! }
//!
//! assert_eq!(chain.merge(&mut storage, Order::Ascending), 4);
//! let sizes: Vec<_> = chain.iter().map(|(id, _)| chain.size(id).unwrap()).collect();
//! assert_eq!(sizes, [4, 0]);
//! ```

use crate::link::{self, Linked, Walk};
use crate::{Key, Order, Queue, RingNode, SortConfig, Storage};

/// One entry of a [`QueueChain`].
#[derive(Debug)]
struct ContextNode<S, K: Key>
where
    S: Storage<RingNode<K>, Key = K>,
{
    queue: Option<Queue<S, K>>,
    size: usize,
    prev: usize,
    next: usize,
}

impl<S, K: Key> ContextNode<S, K>
where
    S: Storage<RingNode<K>, Key = K>,
{
    fn sentinel() -> Self {
        Self {
            queue: None,
            size: 0,
            prev: usize::NONE,
            next: usize::NONE,
        }
    }
}

impl<S, K: Key> Linked<usize> for ContextNode<S, K>
where
    S: Storage<RingNode<K>, Key = K>,
{
    #[inline]
    fn next(&self) -> usize {
        self.next
    }

    #[inline]
    fn prev(&self) -> usize {
        self.prev
    }

    #[inline]
    fn set_next(&mut self, key: usize) {
        self.next = key;
    }

    #[inline]
    fn set_prev(&mut self, key: usize) {
        self.prev = key;
    }
}

/// An ordered set of queues that can be consolidated into the first one.
///
/// The chain holds queue handles only. Elements stay in the ring storage
/// until [`QueueChain::merge`] splices them into the first queue.
#[derive(Debug)]
pub struct QueueChain<S, K: Key = usize>
where
    S: Storage<RingNode<K>, Key = K>,
{
    nodes: slab::Slab<ContextNode<S, K>>,
    head: usize,
}

impl<S, K: Key> Default for QueueChain<S, K>
where
    S: Storage<RingNode<K>, Key = K>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S, K: Key> QueueChain<S, K>
where
    S: Storage<RingNode<K>, Key = K>,
{
    /// Creates an empty chain.
    pub fn new() -> Self {
        let mut nodes = slab::Slab::new();
        let head = nodes.insert(ContextNode::sentinel());
        link::init(&mut nodes, head);
        Self { nodes, head }
    }

    /// Appends `queue` and returns its context id.
    ///
    /// The first queue pushed is the accumulator of [`QueueChain::merge`].
    pub fn push(&mut self, storage: &S, queue: Queue<S, K>) -> usize {
        let size = queue.count(storage);
        let id = self.nodes.insert(ContextNode {
            queue: Some(queue),
            size,
            prev: usize::NONE,
            next: usize::NONE,
        });
        link::insert_before(&mut self.nodes, self.head, id);
        id
    }

    /// Returns the number of contexts.
    pub fn len(&self) -> usize {
        link::len(&self.nodes, self.head)
    }

    /// Returns `true` if the chain holds no queue.
    pub fn is_empty(&self) -> bool {
        link::is_empty(&self.nodes, self.head)
    }

    /// Returns the queue of context `id`.
    pub fn queue(&self, id: usize) -> Option<&Queue<S, K>> {
        self.nodes.get(id)?.queue.as_ref()
    }

    /// Returns the queue of context `id` mutably.
    ///
    /// Call [`QueueChain::refresh`] after changing its contents to keep the
    /// cached size current.
    pub fn queue_mut(&mut self, id: usize) -> Option<&mut Queue<S, K>> {
        self.nodes.get_mut(id)?.queue.as_mut()
    }

    /// Returns the cached size of context `id`.
    pub fn size(&self, id: usize) -> Option<usize> {
        let node = self.nodes.get(id)?;
        node.queue.as_ref().map(|_| node.size)
    }

    /// Recomputes every cached size from `storage`.
    pub fn refresh(&mut self, storage: &S) {
        let mut walk = Walk::new(&self.nodes, self.head);
        while let Some(id) = walk.next(&self.nodes) {
            let node = &mut self.nodes[id];
            node.size = node.queue.as_ref().map_or(0, |queue| queue.count(storage));
        }
    }

    /// Removes context `id` and hands its queue back.
    pub fn remove(&mut self, id: usize) -> Option<Queue<S, K>> {
        if id == self.head || !self.nodes.contains(id) {
            return None;
        }
        link::unlink(&mut self.nodes, id);
        self.nodes.remove(id).queue
    }

    /// Returns an iterator over `(id, queue)` in chain order.
    pub fn iter(&self) -> Contexts<'_, S, K> {
        Contexts {
            chain: self,
            id: link::next(&self.nodes, self.head),
        }
    }

    /// Consumes the chain, returning its queues in chain order.
    pub fn into_queues(mut self) -> Vec<Queue<S, K>> {
        let mut queues = Vec::with_capacity(self.nodes.len().saturating_sub(1));
        let mut walk = Walk::new(&self.nodes, self.head);
        while let Some(id) = walk.next(&self.nodes) {
            if let Some(queue) = self.nodes[id].queue.take() {
                queues.push(queue);
            }
        }
        queues
    }

    /// Destroys every queue in the chain.
    pub fn destroy(self, storage: &mut S) {
        for queue in self.into_queues() {
            queue.destroy(storage);
        }
    }

    /// Moves every element into the first queue, then sorts it.
    ///
    /// The other queues end up empty but stay live. Returns the first
    /// queue's count, or 0 for an empty chain.
    pub fn merge(&mut self, storage: &mut S, order: Order) -> usize {
        self.merge_with(storage, SortConfig::from(order))
    }

    /// Like [`QueueChain::merge`] with an explicit sort configuration.
    pub fn merge_with(&mut self, storage: &mut S, config: SortConfig) -> usize {
        let first = link::next(&self.nodes, self.head);
        let Some(target) = self.nodes.get(first).and_then(|node| node.queue.as_ref()) else {
            return 0;
        };
        if !target.is_live(storage) {
            tracing::debug!(context = first, "merge target is not live");
            return 0;
        }
        let target = target.head();

        let mut walk = Walk::new(&self.nodes, first);
        let mut merged = 0usize;
        while let Some(id) = walk.next(&self.nodes) {
            if id == self.head {
                continue;
            }
            let node = &mut self.nodes[id];
            // A handle from another storage can name the target's slots.
            let Some(source) = node
                .queue
                .as_ref()
                .filter(|queue| queue.head() != target && queue.is_live(storage))
            else {
                continue;
            };
            link::splice(storage, source.head(), target);
            node.size = 0;
            merged += 1;
        }

        let node = &mut self.nodes[first];
        let Some(queue) = node.queue.as_mut() else {
            return 0;
        };
        queue.sort_with(storage, config);
        node.size = queue.count(storage);

        tracing::trace!(queues = merged + 1, count = node.size, "merge");
        node.size
    }
}

/// Iterator over the contexts of a [`QueueChain`].
pub struct Contexts<'a, S, K: Key>
where
    S: Storage<RingNode<K>, Key = K>,
{
    chain: &'a QueueChain<S, K>,
    id: usize,
}

impl<'a, S, K: Key> Iterator for Contexts<'a, S, K>
where
    S: Storage<RingNode<K>, Key = K>,
{
    type Item = (usize, &'a Queue<S, K>);

    fn next(&mut self) -> Option<Self::Item> {
        let chain = self.chain;
        while self.id != chain.head {
            let id = self.id;
            self.id = link::next(&chain.nodes, id);
            if let Some(queue) = chain.nodes[id].queue.as_ref() {
                return Some((id, queue));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::tests::{queue_of, texts};
    use crate::RingStorage;

    fn chain_of(storage: &mut RingStorage, queues: &[&[&str]]) -> QueueChain<RingStorage> {
        let mut chain = QueueChain::new();
        for items in queues {
            let queue = queue_of(storage, items);
            chain.push(storage, queue);
        }
        chain
    }

    fn queue_texts(
        chain: &QueueChain<RingStorage>,
        storage: &RingStorage,
        id: usize,
    ) -> Vec<String> {
        texts(chain.queue(id).unwrap(), storage)
    }

    #[test]
    fn push_tracks_sizes() {
        let mut storage = RingStorage::new();
        let chain = chain_of(&mut storage, &[&["a", "b"], &[], &["c"]]);

        assert_eq!(chain.len(), 3);
        let sizes: Vec<_> = chain.iter().map(|(id, _)| chain.size(id).unwrap()).collect();
        assert_eq!(sizes, [2, 0, 1]);
    }

    #[test]
    fn merge_two_ascending() {
        let mut storage = RingStorage::new();
        let mut chain = chain_of(&mut storage, &[&["3", "1"], &["4", "2"]]);
        let ids: Vec<_> = chain.iter().map(|(id, _)| id).collect();

        assert_eq!(chain.merge(&mut storage, Order::Ascending), 4);
        assert_eq!(queue_texts(&chain, &storage, ids[0]), ["1", "2", "3", "4"]);

        let second = chain.queue(ids[1]).unwrap();
        assert!(second.is_live(&storage));
        assert_eq!(second.count(&storage), 0);
        assert_eq!(chain.size(ids[0]), Some(4));
        assert_eq!(chain.size(ids[1]), Some(0));
    }

    #[test]
    fn merge_many_descending() {
        let mut storage = RingStorage::new();
        let mut chain = chain_of(
            &mut storage,
            &[&["b"], &["e", "a"], &[], &["d", "c", "f"]],
        );
        let first = chain.iter().next().unwrap().0;

        assert_eq!(chain.merge(&mut storage, Order::Descending), 6);
        assert_eq!(
            queue_texts(&chain, &storage, first),
            ["f", "e", "d", "c", "b", "a"]
        );
        assert!(chain.iter().skip(1).all(|(_, queue)| queue.is_empty(&storage)));
    }

    #[test]
    fn merge_single_queue_sorts_it() {
        let mut storage = RingStorage::new();
        let mut chain = chain_of(&mut storage, &[&["z", "y", "x"]]);

        assert_eq!(chain.merge(&mut storage, Order::Ascending), 3);
        let (id, _) = chain.iter().next().unwrap();
        assert_eq!(queue_texts(&chain, &storage, id), ["x", "y", "z"]);
    }

    #[test]
    fn merge_empty_chain() {
        let mut storage = RingStorage::new();
        let mut chain: QueueChain<RingStorage> = QueueChain::new();

        assert!(chain.is_empty());
        assert_eq!(chain.merge(&mut storage, Order::Ascending), 0);
    }

    #[test]
    fn merge_skips_handle_aliasing_the_target() {
        let mut storage = RingStorage::new();
        let mut other = RingStorage::new();
        let target = queue_of(&mut storage, &["b", "a"]);
        let foreign = Queue::create(&mut other).unwrap();
        assert_eq!(foreign.head(), target.head());

        let mut chain = QueueChain::new();
        let first = chain.push(&storage, target);
        chain.push(&storage, foreign);

        assert_eq!(chain.merge(&mut storage, Order::Ascending), 2);
        assert_eq!(queue_texts(&chain, &storage, first), ["a", "b"]);
        assert_eq!(storage.len(), 4);
    }

    #[test]
    fn remove_and_reuse() {
        let mut storage = RingStorage::new();
        let mut chain = chain_of(&mut storage, &[&["a"], &["b"], &["c"]]);
        let ids: Vec<_> = chain.iter().map(|(id, _)| id).collect();

        let removed = chain.remove(ids[1]).unwrap();
        assert_eq!(texts(&removed, &storage), ["b"]);
        assert_eq!(chain.len(), 2);
        assert!(chain.remove(ids[1]).is_none());
        assert!(chain.queue(ids[1]).is_none());

        assert_eq!(chain.merge(&mut storage, Order::Ascending), 2);
        assert_eq!(queue_texts(&chain, &storage, ids[0]), ["a", "c"]);
        assert_eq!(texts(&removed, &storage), ["b"]);
    }

    #[test]
    fn refresh_after_queue_mut() {
        let mut storage = RingStorage::new();
        let mut chain = chain_of(&mut storage, &[&["a"]]);
        let (id, _) = chain.iter().next().unwrap();

        chain.queue_mut(id).unwrap().push_back(&mut storage, "b").unwrap();
        assert_eq!(chain.size(id), Some(1));

        chain.refresh(&storage);
        assert_eq!(chain.size(id), Some(2));
    }

    #[test]
    fn destroy_releases_all_queues() {
        let mut storage = RingStorage::new();
        let chain = chain_of(&mut storage, &[&["a", "b"], &["c"]]);

        chain.destroy(&mut storage);
        assert!(storage.is_empty());
    }

    #[test]
    fn into_queues_keeps_order() {
        let mut storage = RingStorage::new();
        let chain = chain_of(&mut storage, &[&["1"], &["2"], &["3"]]);

        let queues = chain.into_queues();
        let fronts: Vec<_> = queues
            .iter()
            .map(|queue| queue.front(&storage).unwrap().as_bytes())
            .collect();
        assert_eq!(fronts, [b"1", b"2", b"3"]);
    }
}
