//! Circular, intrusive link primitives.
//!
//! Nodes embed their own prev/next keys via the [`Linked`] trait and live in
//! a [`Storage`]. A chain is circular: the last node's `next` is the first
//! node, and a distinguished *sentinel* node closes the ring. A chain is
//! empty when the sentinel's `next` points at itself.
//!
//! Every function here is O(1) except [`reverse`] and [`len`], and every one
//! leaves the chain satisfying `next(prev(x)) == x` and `prev(next(x)) == x`
//! for all nodes still on it.
//!
//! # Example
//!
//! ```
//! use nexus_ring::link::{self, Linked};
//!
//! #[derive(Debug)]
//! struct Node {
//!     value: u64,
//!     prev: usize,
//!     next: usize,
//! }
//!
//! impl Node {
//!     fn new(value: u64) -> Self {
//!         Self { value, prev: usize::MAX, next: usize::MAX }
//!     }
//! }
//!
//! impl Linked<usize> for Node {
//!     fn next(&self) -> usize { self.next }
//!     fn prev(&self) -> usize { self.prev }
//!     fn set_next(&mut self, key: usize) { self.next = key; }
//!     fn set_prev(&mut self, key: usize) { self.prev = key; }
//! }
//!
//! let mut storage = slab::Slab::new();
//! let head = storage.insert(Node::new(0));
//! link::init(&mut storage, head);
//!
//! let a = storage.insert(Node::new(1));
//! let b = storage.insert(Node::new(2));
//! link::insert_before(&mut storage, head, a);
//! link::insert_before(&mut storage, head, b);
//!
//! assert_eq!(link::len(&storage, head), 2);
//!
//! link::reverse(&mut storage, head);
//! assert_eq!(link::next(&storage, head), b);
//! ```

use crate::{Key, Storage};

/// Trait for nodes that embed a prev/next link pair.
///
/// A freshly [`unlink`]ed node has both links set to `K::NONE`.
pub trait Linked<K: Key> {
    /// Returns the next node's key.
    fn next(&self) -> K;

    /// Returns the previous node's key.
    fn prev(&self) -> K;

    /// Sets the next node's key.
    fn set_next(&mut self, key: K);

    /// Sets the previous node's key.
    fn set_prev(&mut self, key: K);
}

#[inline]
fn node<N, S>(storage: &S, key: S::Key) -> &N
where
    S: Storage<N>,
{
    storage.get(key).expect("ring link points at a vacant slot")
}

#[inline]
fn node_mut<N, S>(storage: &mut S, key: S::Key) -> &mut N
where
    S: Storage<N>,
{
    storage
        .get_mut(key)
        .expect("ring link points at a vacant slot")
}

/// Returns the key after `key`.
///
/// # Panics
///
/// Panics if `key` is vacant.
#[inline]
pub fn next<N, S>(storage: &S, key: S::Key) -> S::Key
where
    N: Linked<S::Key>,
    S: Storage<N>,
{
    node(storage, key).next()
}

/// Returns the key before `key`.
///
/// # Panics
///
/// Panics if `key` is vacant.
#[inline]
pub fn prev<N, S>(storage: &S, key: S::Key) -> S::Key
where
    N: Linked<S::Key>,
    S: Storage<N>,
{
    node(storage, key).prev()
}

#[inline]
pub(crate) fn set_next<N, S>(storage: &mut S, key: S::Key, next: S::Key)
where
    N: Linked<S::Key>,
    S: Storage<N>,
{
    node_mut(storage, key).set_next(next);
}

#[inline]
pub(crate) fn set_prev<N, S>(storage: &mut S, key: S::Key, prev: S::Key)
where
    N: Linked<S::Key>,
    S: Storage<N>,
{
    node_mut(storage, key).set_prev(prev);
}

/// Points both links of `key` at itself.
///
/// Used for a new sentinel (an empty chain) or to reset a detached node.
#[inline]
pub fn init<N, S>(storage: &mut S, key: S::Key)
where
    N: Linked<S::Key>,
    S: Storage<N>,
{
    let node = node_mut(storage, key);
    node.set_next(key);
    node.set_prev(key);
}

/// Returns `true` if the chain closed by `head` has no other node.
#[inline]
pub fn is_empty<N, S>(storage: &S, head: S::Key) -> bool
where
    N: Linked<S::Key>,
    S: Storage<N>,
{
    next(storage, head) == head
}

/// Returns `true` if the chain closed by `head` has exactly one other node.
#[inline]
pub fn is_singular<N, S>(storage: &S, head: S::Key) -> bool
where
    N: Linked<S::Key>,
    S: Storage<N>,
{
    let first = next(storage, head);
    first != head && first == prev(storage, head)
}

/// Links `key` directly after `at`.
///
/// `key` must not currently be on any chain.
///
/// # Panics
///
/// Panics if `at` or `key` is vacant.
#[inline]
pub fn insert_after<N, S>(storage: &mut S, at: S::Key, key: S::Key)
where
    N: Linked<S::Key>,
    S: Storage<N>,
{
    let after = next(storage, at);
    {
        let node = node_mut(storage, key);
        node.set_prev(at);
        node.set_next(after);
    }
    set_prev(storage, after, key);
    set_next(storage, at, key);
}

/// Links `key` directly before `at`.
///
/// With `at` as the sentinel this appends to the back of the chain.
///
/// # Panics
///
/// Panics if `at` or `key` is vacant.
#[inline]
pub fn insert_before<N, S>(storage: &mut S, at: S::Key, key: S::Key)
where
    N: Linked<S::Key>,
    S: Storage<N>,
{
    let before = prev(storage, at);
    insert_after(storage, before, key);
}

/// Removes `key` from its chain.
///
/// The neighbors are joined and `key`'s own links are left at `K::NONE`;
/// it must be re-inserted or [`init`]ed before it is walked again.
///
/// # Panics
///
/// Panics if `key` is vacant or already detached.
#[inline]
pub fn unlink<N, S>(storage: &mut S, key: S::Key)
where
    N: Linked<S::Key>,
    S: Storage<N>,
{
    let (before, after) = {
        let node = node(storage, key);
        (node.prev(), node.next())
    };
    set_next(storage, before, after);
    set_prev(storage, after, before);

    let node = node_mut(storage, key);
    node.set_prev(S::Key::NONE);
    node.set_next(S::Key::NONE);
}

/// Moves `key` from its current position to directly after `after`.
#[inline]
pub fn relocate<N, S>(storage: &mut S, key: S::Key, after: S::Key)
where
    N: Linked<S::Key>,
    S: Storage<N>,
{
    unlink(storage, key);
    insert_after(storage, after, key);
}

/// Moves every node of the chain closed by `src` to directly after `at`.
///
/// Order is preserved and `src` is left empty. O(1).
pub fn splice<N, S>(storage: &mut S, src: S::Key, at: S::Key)
where
    N: Linked<S::Key>,
    S: Storage<N>,
{
    if is_empty(storage, src) {
        return;
    }

    let first = next(storage, src);
    let last = prev(storage, src);
    let after = next(storage, at);

    set_prev(storage, first, at);
    set_next(storage, at, first);
    set_next(storage, last, after);
    set_prev(storage, after, last);

    init(storage, src);
}

/// Moves the range `next(head) ..= through` into the empty chain `dst`.
///
/// `through` must be on `head`'s chain. If `through == head` nothing moves
/// and `dst` is reset to empty. O(1).
pub fn cut<N, S>(storage: &mut S, dst: S::Key, head: S::Key, through: S::Key)
where
    N: Linked<S::Key>,
    S: Storage<N>,
{
    debug_assert!(is_empty(storage, dst), "cut target must be empty");

    if through == head || is_empty(storage, head) {
        init(storage, dst);
        return;
    }

    let first = next(storage, head);
    let rest = next(storage, through);

    set_next(storage, dst, first);
    set_prev(storage, first, dst);
    set_prev(storage, dst, through);
    set_next(storage, through, dst);

    set_next(storage, head, rest);
    set_prev(storage, rest, head);
}

/// Reverses the chain closed by `head` in place.
///
/// Swaps both links of every node, the sentinel included. O(n).
pub fn reverse<N, S>(storage: &mut S, head: S::Key)
where
    N: Linked<S::Key>,
    S: Storage<N>,
{
    let mut key = head;
    loop {
        let node = node_mut(storage, key);
        let after = node.next();
        node.set_next(node.prev());
        node.set_prev(after);

        key = after;
        if key == head {
            break;
        }
    }
}

/// Counts the nodes on the chain closed by `head`, excluding `head`. O(n).
pub fn len<N, S>(storage: &S, head: S::Key) -> usize
where
    N: Linked<S::Key>,
    S: Storage<N>,
{
    let mut count = 0;
    let mut key = next(storage, head);
    while key != head {
        count += 1;
        key = next(storage, key);
    }
    count
}

/// Forward walk that tolerates removal of the node it just yielded.
///
/// The successor is fetched before the current key is handed out, and the
/// walk does not borrow the storage between steps, so the caller may unlink
/// and remove the yielded node before asking for the next one.
///
/// Removing any *other* node during the walk is not supported.
///
/// # Example
///
/// ```
/// use nexus_ring::link::{self, Walk};
/// use nexus_ring::{Queue, RingStorage};
///
/// let mut storage = RingStorage::new();
/// let mut queue = Queue::create(&mut storage).unwrap();
/// for text in ["a", "b", "c"] {
///     queue.push_back(&mut storage, text).unwrap();
/// }
///
/// let mut walk = Walk::new(&storage, queue.head());
/// while let Some(key) = walk.next(&storage) {
///     link::unlink(&mut storage, key);
///     storage.remove(key);
/// }
/// assert!(queue.is_empty(&storage));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Walk<K: Key> {
    head: K,
    upcoming: K,
}

impl<K: Key> Walk<K> {
    /// Starts a walk at the first node after `head`.
    #[inline]
    pub fn new<N, S>(storage: &S, head: K) -> Self
    where
        N: Linked<K>,
        S: Storage<N, Key = K>,
    {
        Self {
            head,
            upcoming: next(storage, head),
        }
    }

    /// Returns the next key, or `None` once the walk is back at the head.
    #[inline]
    #[allow(clippy::should_implement_trait)]
    pub fn next<N, S>(&mut self, storage: &S) -> Option<K>
    where
        N: Linked<K>,
        S: Storage<N, Key = K>,
    {
        if self.upcoming == self.head {
            return None;
        }

        let current = self.upcoming;
        self.upcoming = next(storage, current);
        Some(current)
    }
}
