//! Ring node: the one slot type shared by sentinels and elements.

use crate::link::Linked;
use crate::{Element, Key};

/// A slot in a ring: a sentinel, or an element with its links.
///
/// Users reach elements through the queue's accessors; the node layout is an
/// implementation detail.
#[derive(Debug)]
pub struct RingNode<K: Key = usize> {
    element: Option<Element>,
    prev: K,
    next: K,
}

impl<K: Key> RingNode<K> {
    /// Creates an unlinked sentinel.
    #[inline]
    pub(crate) fn sentinel() -> Self {
        Self {
            element: None,
            prev: K::NONE,
            next: K::NONE,
        }
    }

    /// Creates an unlinked element node.
    #[inline]
    pub(crate) fn with_element(element: Element) -> Self {
        Self {
            element: Some(element),
            prev: K::NONE,
            next: K::NONE,
        }
    }

    /// Returns `true` for a sentinel node.
    #[inline]
    pub fn is_sentinel(&self) -> bool {
        self.element.is_none()
    }

    /// Returns the element, or `None` for a sentinel.
    #[inline]
    pub fn element(&self) -> Option<&Element> {
        self.element.as_ref()
    }

    #[inline]
    pub(crate) fn into_element(self) -> Option<Element> {
        self.element
    }
}

impl<K: Key> Linked<K> for RingNode<K> {
    #[inline]
    fn next(&self) -> K {
        self.next
    }

    #[inline]
    fn prev(&self) -> K {
        self.prev
    }

    #[inline]
    fn set_next(&mut self, key: K) {
        self.next = key;
    }

    #[inline]
    fn set_prev(&mut self, key: K) {
        self.prev = key;
    }
}
