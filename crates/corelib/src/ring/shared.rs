//! Internally synchronized hash ring.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::hash::{Crc32, HashFunction};
use crate::node::NodeId;
use crate::ring::config::RemoveMode;
use crate::ring::ring::{placements, removal_candidates, HashRing};
use crate::topology::Topology;

/// A [`HashRing`] behind a single reader/writer lock.
///
/// The lock guards the position sequence and the owner table as one unit.
/// `add` and `remove` take it for writing; `get` and every other read hold
/// it for reading across the whole lookup. Hashing happens before the lock
/// is taken, so the critical section covers only the containers.
///
/// All methods take `&self`; share the ring with `Arc<SharedRing>`.
pub struct SharedRing {
    hash: Arc<dyn HashFunction>,
    replicas: usize,
    remove_mode: RemoveMode,
    inner: RwLock<HashRing>,
}

impl SharedRing {
    /// Create an empty ring. `replicas == 0` selects the default.
    pub fn new(replicas: usize, hash: impl HashFunction) -> Self {
        Self::from_ring(HashRing::new(replicas, hash))
    }

    /// Create an empty ring hashed with CRC-32.
    pub fn with_replicas(replicas: usize) -> Self {
        Self::new(replicas, Crc32)
    }

    /// Wrap an existing ring, keeping its nodes and settings.
    pub fn from_ring(ring: HashRing) -> Self {
        Self {
            hash: ring.hasher(),
            replicas: ring.replicas(),
            remove_mode: ring.remove_mode(),
            inner: RwLock::new(ring),
        }
    }

    /// True when no position is on the ring.
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Place each node on the ring `replicas` times.
    ///
    /// Replica positions are hashed before the write lock is taken; the lock
    /// covers only the push and the sort. Re-adding a present node duplicates
    /// its positions, as with [`HashRing::add`].
    pub fn add<I>(&self, nodes: I)
    where
        I: IntoIterator,
        I::Item: Into<NodeId>,
    {
        let vnodes = placements(self.hash.as_ref(), self.replicas, nodes);
        self.inner.write().insert(vnodes);
    }

    /// Node owning `key`, or `None` on an empty ring.
    pub fn get(&self, key: impl AsRef<[u8]>) -> Option<NodeId> {
        let hash = self.hash.hash(key.as_ref());
        self.inner.read().get_by_hash(hash).cloned()
    }

    /// Up to `n` distinct nodes walking clockwise from `key`.
    pub fn get_n(&self, key: impl AsRef<[u8]>, n: usize) -> Vec<NodeId> {
        if n == 0 {
            return Vec::new();
        }
        let hash = self.hash.hash(key.as_ref());
        self.inner.read().walk_distinct(hash, n)
    }

    /// Take `node` off the ring; see [`HashRing::remove`].
    pub fn remove(&self, node: &str) -> bool {
        let candidates =
            removal_candidates(self.hash.as_ref(), self.replicas, self.remove_mode, node);
        self.inner.write().remove_positions(node, &candidates)
    }

    /// Number of positions on the ring, duplicates included.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Alias of [`len`](Self::len).
    pub fn token_count(&self) -> usize {
        self.len()
    }

    /// Number of distinct nodes still owning at least one position.
    pub fn node_count(&self) -> usize {
        self.inner.read().node_count()
    }

    /// Distinct nodes still owning at least one position, sorted.
    ///
    /// Taken under one read lock, so the list is consistent with itself but
    /// may be stale by the time it is returned.
    pub fn nodes(&self) -> Vec<NodeId> {
        self.inner.read().nodes()
    }

    /// Whether any position still routes to `node`.
    pub fn contains(&self, node: &str) -> bool {
        self.inner.read().contains(node)
    }

    /// `(position, node)` pairs in ascending position order.
    pub fn tokens(&self) -> Vec<(u64, NodeId)> {
        self.inner.read().tokens()
    }

    /// Ownership view of the ring as it is now.
    pub fn topology(&self) -> Topology {
        self.inner.read().topology()
    }

    /// Point-in-time copy of the ring, detached from the lock.
    pub fn snapshot(&self) -> HashRing {
        self.inner.read().clone()
    }

    /// Unwrap into the unsynchronized ring.
    pub fn into_inner(self) -> HashRing {
        self.inner.into_inner()
    }

    /// Positions placed per added node.
    pub fn replicas(&self) -> usize {
        self.replicas
    }

    pub fn remove_mode(&self) -> RemoveMode {
        self.remove_mode
    }

    /// Name of the ring's hash function, `"custom"` for closures.
    pub fn hasher_name(&self) -> &'static str {
        self.hash.name()
    }
}

impl Default for SharedRing {
    fn default() -> Self {
        Self::from_ring(HashRing::default())
    }
}

impl From<HashRing> for SharedRing {
    fn from(ring: HashRing) -> Self {
        Self::from_ring(ring)
    }
}

impl fmt::Debug for SharedRing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedRing")
            .field("ring", &*self.inner.read())
            .finish()
    }
}
