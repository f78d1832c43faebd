//! Builder for hash rings.

use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::hash::{HashFunction, HashKind};
use crate::node::NodeId;
use crate::ring::config::{RemoveMode, RingConfig, DEFAULT_REPLICAS};
use crate::ring::ring::HashRing;
use crate::ring::shared::SharedRing;
use crate::ring::Ring;

/// Fluent construction of a ring with an initial node set.
///
/// ```
/// use corelib::ring::RingBuilder;
/// use corelib::hash::HashKind;
///
/// let ring = RingBuilder::new()
///     .with_replicas(8)
///     .with_hash_kind(HashKind::Xxh3)
///     .add_node("node1")
///     .add_node("node2")
///     .build();
///
/// assert_eq!(ring.token_count(), 16);
/// ```
pub struct RingBuilder {
    replicas: usize,
    hash: Arc<dyn HashFunction>,
    remove_mode: RemoveMode,
    synchronized: bool,
    nodes: Vec<NodeId>,
}

impl RingBuilder {
    pub fn new() -> Self {
        Self {
            replicas: DEFAULT_REPLICAS,
            hash: HashKind::default().build(),
            remove_mode: RemoveMode::default(),
            synchronized: true,
            nodes: Vec::new(),
        }
    }

    /// Start from a validated configuration.
    pub fn from_config(config: &RingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new()
            .with_replicas(config.replicas)
            .with_hash_kind(config.hash)
            .with_remove_mode(config.remove_mode)
            .synchronized(config.synchronized))
    }

    /// Virtual positions per node. Zero selects the default.
    pub fn with_replicas(mut self, replicas: usize) -> Self {
        self.replicas = replicas;
        self
    }

    /// Use a custom hash function.
    pub fn with_hash(mut self, hash: impl HashFunction) -> Self {
        self.hash = Arc::new(hash);
        self
    }

    /// Use one of the built-in hash functions.
    pub fn with_hash_kind(mut self, kind: HashKind) -> Self {
        self.hash = kind.build();
        self
    }

    pub fn with_remove_mode(mut self, mode: RemoveMode) -> Self {
        self.remove_mode = mode;
        self
    }

    /// Whether [`build_ring`](Self::build_ring) wraps the ring in a lock.
    pub fn synchronized(mut self, synchronized: bool) -> Self {
        self.synchronized = synchronized;
        self
    }

    pub fn add_node(mut self, node: impl Into<NodeId>) -> Self {
        self.nodes.push(node.into());
        self
    }

    pub fn add_nodes<I>(mut self, nodes: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<NodeId>,
    {
        self.nodes.extend(nodes.into_iter().map(Into::into));
        self
    }

    /// Build the internally synchronized ring.
    pub fn build(self) -> SharedRing {
        SharedRing::from_ring(self.build_unsynchronized())
    }

    /// Build a ring without internal locking. The caller serializes access.
    pub fn build_unsynchronized(self) -> HashRing {
        let mut ring = HashRing::from_parts(self.replicas, self.hash, self.remove_mode);
        ring.add(self.nodes);
        ring
    }

    /// Build the variant selected by [`synchronized`](Self::synchronized).
    pub fn build_ring(self) -> Ring {
        if self.synchronized {
            Ring::Shared(self.build())
        } else {
            Ring::Unsynchronized(self.build_unsynchronized())
        }
    }
}

impl Default for RingBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RingBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingBuilder")
            .field("replicas", &self.replicas)
            .field("hash", &self.hash.name())
            .field("remove_mode", &self.remove_mode)
            .field("synchronized", &self.synchronized)
            .field("nodes", &self.nodes)
            .finish()
    }
}
