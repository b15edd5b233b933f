//! Text queues on circular intrusive rings with external storage.
//!
//! This crate provides a double-ended queue of owned text elements and a set
//! of whole-queue transforms, built on one idea: separate storage from
//! structure.
//!
//! # Design Philosophy
//!
//! Each node embeds its own prev/next links, and every node, sentinels
//! included, lives in a slab:
//!
//! ```text
//! Storage (Slab)  - owns nodes, provides stable keys
//! Queue           - the key of a sentinel that closes a ring
//! link            - O(1) insert/unlink/splice/cut over keys
//! ```
//!
//! Benefits:
//! - **Stable keys**: an element's key survives every transform
//! - **O(1) splice and cut**: whole runs change hands with a few key writes
//! - **Shared storage**: many queues draw from one pool and can be merged
//! - **No allocation in transforms**: sort, reversal and filters only rewire
//!
//! # Quick Start
//!
//! ```
//! use nexus_ring::{Order, Queue, RingStorage};
//!
//! let mut storage = RingStorage::new();
//! let mut queue = Queue::create(&mut storage).unwrap();
//!
//! for text in ["cherry", "apple", "banana", "apple"] {
//!     queue.push_back(&mut storage, text).unwrap();
//! }
//!
//! queue.sort(&mut storage, Order::Ascending);
//! queue.delete_dup(&mut storage);
//!
//! let left: Vec<_> = queue.iter(&storage).map(|e| e.to_str().unwrap()).collect();
//! assert_eq!(left, ["banana", "cherry"]);
//!
//! queue.destroy(&mut storage);
//! ```
//!
//! # Critical Invariant: Same Storage Instance
//!
//! All operations on a queue must use the storage it was created in. A
//! handle that does not name a sentinel in the storage it is given is
//! rejected, but a handle whose slots were reused by another queue in the
//! same storage is not detectable. Same discipline as the `slab` crate.
//!
//! # Storage Options
//!
//! | Storage | Capacity | Exhaustion |
//! |---------|----------|------------|
//! | [`RingStorage`] (`slab::Slab`) | Growable | Never reported for slots |
//! | [`BoundedRingStorage`] | Fixed slot budget | [`QueueError::Exhausted`] |
//!
//! Both are built with [`RingBuilder`]. Text buffers always come from the
//! global allocator through a fallible reservation.
//!
//! # Operations
//!
//! | Operation | Cost |
//! |-----------|------|
//! | push / pop at either end | O(1) |
//! | [`Queue::count`] | O(n) |
//! | [`Queue::reverse`], [`Queue::reverse_k`], [`Queue::swap`] | O(n) |
//! | [`Queue::delete_mid`], [`Queue::delete_dup`] | O(n) |
//! | [`Queue::ascend`], [`Queue::descend`] | O(n) |
//! | [`Queue::sort`] | O(n log n), O(log n) stack |
//! | [`QueueChain::merge`] | O(total log total) |
//!
//! # Logging
//!
//! Transforms emit `tracing` events at `trace` level; exhaustion and dead
//! handles are reported at `debug`. No subscriber is installed here.

#![warn(missing_docs)]

pub mod chain;
pub mod config;
pub mod element;
pub mod error;
pub mod key;
pub mod link;
pub mod node;
pub mod queue;
pub mod storage;

mod filter;
mod sort;
mod transform;

pub use chain::QueueChain;
pub use config::{BoundedRingBuilder, Order, RingBuilder, SortConfig, TieBreak};
pub use element::Element;
pub use error::{BuildError, QueueError};
pub use key::Key;
pub use link::Linked;
pub use node::RingNode;
pub use queue::{BoundedRingStorage, Queue, RingStorage};
pub use storage::{BoundedSlab, Full, Storage};
