//! Consistent hash ring implementation.
//!
//! The ring manages virtual node positions and finds the node responsible
//! for a key. Two variants share one implementation:
//!
//! - [`HashRing`]: no internal locking, mutation through `&mut self`.
//! - [`SharedRing`]: the same ring behind a reader/writer lock, usable
//!   from many threads through `&self`.
//!
//! [`Ring`] picks between them at runtime, for rings built from a
//! [`RingConfig`].

pub mod builder;
pub mod config;
pub mod position;
pub mod ring;
pub mod shared;

pub use builder::RingBuilder;
pub use config::{RemoveMode, RingConfig, DEFAULT_REPLICAS, MAX_REPLICAS};
pub use position::PositionIndex;
pub use ring::HashRing;
pub use shared::SharedRing;

use crate::error::Result;
use crate::node::NodeId;

/// A ring whose locking was chosen by configuration.
///
/// Every method forwards to the wrapped ring. Mutation takes `&mut self`
/// for both variants; reach into [`Ring::Shared`] to share one across
/// threads.
#[derive(Debug)]
pub enum Ring {
    /// Built when `synchronized` is true (the default).
    Shared(SharedRing),
    Unsynchronized(HashRing),
}

impl Ring {
    /// Build a ring from configuration, validating it first.
    pub fn from_config(config: &RingConfig) -> Result<Self> {
        Ok(RingBuilder::from_config(config)?.build_ring())
    }

    /// True when no position is on the ring.
    pub fn is_empty(&self) -> bool {
        match self {
            Ring::Shared(ring) => ring.is_empty(),
            Ring::Unsynchronized(ring) => ring.is_empty(),
        }
    }

    /// See [`HashRing::add`].
    pub fn add<I>(&mut self, nodes: I)
    where
        I: IntoIterator,
        I::Item: Into<NodeId>,
    {
        match self {
            Ring::Shared(ring) => ring.add(nodes),
            Ring::Unsynchronized(ring) => ring.add(nodes),
        }
    }

    /// Node owning `key`, or `None` on an empty ring.
    pub fn get(&self, key: impl AsRef<[u8]>) -> Option<NodeId> {
        match self {
            Ring::Shared(ring) => ring.get(key),
            Ring::Unsynchronized(ring) => ring.get(key),
        }
    }

    /// See [`HashRing::get_n`].
    pub fn get_n(&self, key: impl AsRef<[u8]>, n: usize) -> Vec<NodeId> {
        match self {
            Ring::Shared(ring) => ring.get_n(key, n),
            Ring::Unsynchronized(ring) => ring.get_n(key, n),
        }
    }

    /// See [`HashRing::remove`].
    pub fn remove(&mut self, node: &str) -> bool {
        match self {
            Ring::Shared(ring) => ring.remove(node),
            Ring::Unsynchronized(ring) => ring.remove(node),
        }
    }

    /// Number of positions on the ring.
    pub fn len(&self) -> usize {
        match self {
            Ring::Shared(ring) => ring.len(),
            Ring::Unsynchronized(ring) => ring.len(),
        }
    }

    /// Distinct nodes on the ring, sorted.
    pub fn nodes(&self) -> Vec<NodeId> {
        match self {
            Ring::Shared(ring) => ring.nodes(),
            Ring::Unsynchronized(ring) => ring.nodes(),
        }
    }

    /// Whether this is the locked variant.
    pub fn is_synchronized(&self) -> bool {
        matches!(self, Ring::Shared(_))
    }
}
