//! Unsynchronized hash ring.
//!
//! `HashRing` is the ring data structure with no locking of its own.
//! Mutation takes `&mut self`, so sharing it between threads needs an outer
//! lock; [`SharedRing`](super::SharedRing) is that lock built in.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::hash::{Crc32, HashFunction};
use crate::node::NodeId;
use crate::ring::config::{effective_replicas, RemoveMode, DEFAULT_REPLICAS};
use crate::ring::position::PositionIndex;
use crate::topology::Topology;
use crate::vnode::{replica_key, VirtualNode};

/// Consistent hash ring mapping keys to nodes.
///
/// Every node added is placed at `replicas` positions. A key belongs to the
/// node owning the first position at or clockwise of `hash(key)`, wrapping
/// to the smallest position past the end.
///
/// # Example
///
/// ```
/// use corelib::ring::HashRing;
///
/// let mut ring = HashRing::with_replicas(3);
/// ring.add(["cache-a", "cache-b"]);
///
/// let owner = ring.get("user:42").unwrap();
/// assert!(owner == "cache-a" || owner == "cache-b");
/// ```
#[derive(Clone)]
pub struct HashRing {
    hash: Arc<dyn HashFunction>,
    replicas: usize,
    remove_mode: RemoveMode,
    index: PositionIndex,
}

impl HashRing {
    /// Create an empty ring. `replicas == 0` selects [`DEFAULT_REPLICAS`].
    pub fn new(replicas: usize, hash: impl HashFunction) -> Self {
        Self::from_parts(replicas, Arc::new(hash), RemoveMode::default())
    }

    /// Create an empty ring hashed with CRC-32.
    pub fn with_replicas(replicas: usize) -> Self {
        Self::new(replicas, Crc32)
    }

    pub(crate) fn from_parts(
        replicas: usize,
        hash: Arc<dyn HashFunction>,
        remove_mode: RemoveMode,
    ) -> Self {
        Self {
            hash,
            replicas: effective_replicas(replicas),
            remove_mode,
            index: PositionIndex::new(),
        }
    }

    /// True when no position is on the ring.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Place each node on the ring `replicas` times.
    ///
    /// Replica `i` of node `id` lands at `hash(decimal(i) ++ id)`. The
    /// sequence is sorted once after the whole batch. Adding a node that is
    /// already present places it again: its positions appear twice in the
    /// sequence. Remove it first to re-add cleanly.
    ///
    /// Two placements hashing to the same position share one owner entry,
    /// and the later one wins.
    ///
    /// # Performance
    /// - **Time**: O(m log m) for m positions after the add
    /// - **Space**: O(n * replicas) for n nodes added
    ///
    /// # Example
    /// ```
    /// use corelib::ring::HashRing;
    ///
    /// let mut ring = HashRing::with_replicas(3);
    /// ring.add(["a", "b"]);
    /// assert_eq!(ring.token_count(), 6);
    /// assert_eq!(ring.node_count(), 2);
    /// ```
    pub fn add<I>(&mut self, nodes: I)
    where
        I: IntoIterator,
        I::Item: Into<NodeId>,
    {
        let vnodes = placements(self.hash.as_ref(), self.replicas, nodes);
        self.insert(vnodes);
    }

    /// Node owning `key`, or `None` on an empty ring.
    ///
    /// Binary search finds the first position at or after `hash(key)`; a
    /// hash past the largest position wraps to the smallest.
    ///
    /// # Performance
    /// - **Time**: O(log m) for m positions, plus hashing the key
    /// - **Space**: O(1); the returned id shares its allocation
    pub fn get(&self, key: impl AsRef<[u8]>) -> Option<NodeId> {
        if self.is_empty() {
            return None;
        }
        let hash = self.hash.hash(key.as_ref());
        self.get_by_hash(hash).cloned()
    }

    /// Node owning the first position at or clockwise of `hash`.
    pub fn get_by_hash(&self, hash: u64) -> Option<&NodeId> {
        let owner = self.index.successor(hash);
        trace!(hash, owner = ?owner.map(NodeId::as_str), "ring lookup");
        owner
    }

    /// Up to `n` distinct nodes met walking clockwise from `key`. The first
    /// is always `get(key)`.
    pub fn get_n(&self, key: impl AsRef<[u8]>, n: usize) -> Vec<NodeId> {
        if self.is_empty() || n == 0 {
            return Vec::new();
        }
        let hash = self.hash.hash(key.as_ref());
        self.walk_distinct(hash, n)
    }

    pub(crate) fn walk_distinct(&self, hash: u64, n: usize) -> Vec<NodeId> {
        let mut owners: Vec<NodeId> = Vec::with_capacity(n);
        for (_, node) in self.index.walk(hash) {
            if !owners.contains(node) {
                owners.push(node.clone());
                if owners.len() == n {
                    break;
                }
            }
        }
        owners
    }

    /// Take `node` off the ring according to the ring's [`RemoveMode`].
    ///
    /// With [`RemoveMode::SinglePosition`] only `hash(node)` is removed,
    /// whichever node owns it, and the node's replica positions normally
    /// stay. [`RemoveMode::AllReplicas`] removes every replica position still
    /// owned by `node`.
    ///
    /// Returns whether any position was removed. Removing a node that is not
    /// there is a no-op, so repeated removal is safe.
    ///
    /// # Arguments
    /// * `node` - Node id as passed to [`add`](Self::add)
    ///
    /// # Example
    /// ```
    /// use corelib::ring::{RemoveMode, RingBuilder};
    ///
    /// let mut ring = RingBuilder::new()
    ///     .with_replicas(3)
    ///     .with_remove_mode(RemoveMode::AllReplicas)
    ///     .add_nodes(["a", "b"])
    ///     .build_unsynchronized();
    ///
    /// assert!(ring.remove("a"));
    /// assert!(!ring.contains("a"));
    /// assert!(!ring.remove("a"));
    /// ```
    pub fn remove(&mut self, node: &str) -> bool {
        let candidates = removal_candidates(
            self.hash.as_ref(),
            self.replicas,
            self.remove_mode,
            node,
        );
        self.remove_positions(node, &candidates)
    }

    pub(crate) fn insert(&mut self, vnodes: Vec<VirtualNode>) {
        if vnodes.is_empty() {
            return;
        }
        let added = vnodes.len();
        for vnode in vnodes {
            self.index.push(vnode.position, vnode.node);
        }
        self.index.sort();
        debug_assert!(self.index.is_consistent());
        debug!(
            added,
            replicas = self.replicas,
            ring_size = self.index.len(),
            "added virtual nodes to ring"
        );
    }

    pub(crate) fn remove_positions(&mut self, node: &str, candidates: &[u64]) -> bool {
        let doomed: Vec<u64> = match self.remove_mode {
            // The single position goes whoever owns it.
            RemoveMode::SinglePosition => candidates.to_vec(),
            RemoveMode::AllReplicas => candidates
                .iter()
                .copied()
                .filter(|p| self.index.owner(*p).is_some_and(|owner| owner == node))
                .collect(),
        };

        let removed = self.index.remove_all(&doomed);
        debug_assert!(self.index.is_consistent());
        if removed == 0 {
            debug!(node, mode = ?self.remove_mode, "remove: no matching position, ignoring");
            return false;
        }
        debug!(
            node,
            mode = ?self.remove_mode,
            removed,
            ring_size = self.index.len(),
            "removed positions from ring"
        );
        true
    }

    /// Number of positions on the ring, duplicates included.
    #[inline]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Alias of [`len`](Self::len).
    #[inline]
    pub fn token_count(&self) -> usize {
        self.index.len()
    }

    /// Number of distinct nodes still owning at least one position.
    pub fn node_count(&self) -> usize {
        self.nodes().len()
    }

    /// Distinct nodes still owning at least one position, sorted.
    pub fn nodes(&self) -> Vec<NodeId> {
        let mut nodes: Vec<NodeId> = self.index.owners().cloned().collect();
        nodes.sort();
        nodes.dedup();
        nodes
    }

    /// Whether any position still routes to `node`.
    pub fn contains(&self, node: &str) -> bool {
        self.index.owners().any(|owner| owner == node)
    }

    /// `(position, node)` pairs in ascending position order.
    pub fn tokens(&self) -> Vec<(u64, NodeId)> {
        self.index
            .iter()
            .map(|(position, node)| (position, node.clone()))
            .collect()
    }

    /// The sorted positions and owner table backing this ring.
    pub fn position_index(&self) -> &PositionIndex {
        &self.index
    }

    /// Read-only view for ownership analysis.
    pub fn topology(&self) -> Topology {
        Topology::new(self.tokens(), self.hash.output_bits())
    }

    #[inline]
    pub fn replicas(&self) -> usize {
        self.replicas
    }

    #[inline]
    pub fn remove_mode(&self) -> RemoveMode {
        self.remove_mode
    }

    pub fn hasher_name(&self) -> &'static str {
        self.hash.name()
    }

    pub(crate) fn hasher(&self) -> Arc<dyn HashFunction> {
        Arc::clone(&self.hash)
    }
}

impl Default for HashRing {
    fn default() -> Self {
        Self::with_replicas(DEFAULT_REPLICAS)
    }
}

impl fmt::Debug for HashRing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashRing")
            .field("hash", &self.hash.name())
            .field("replicas", &self.replicas)
            .field("remove_mode", &self.remove_mode)
            .field("positions", &self.index.len())
            .finish()
    }
}

/// Virtual nodes for `nodes`, `replicas` each, in input order.
pub(crate) fn placements<I>(hash: &dyn HashFunction, replicas: usize, nodes: I) -> Vec<VirtualNode>
where
    I: IntoIterator,
    I::Item: Into<NodeId>,
{
    let mut vnodes = Vec::new();
    for node in nodes {
        let node: NodeId = node.into();
        vnodes.reserve(replicas);
        for i in 0..replicas {
            vnodes.push(VirtualNode::from_index(hash, node.clone(), i));
        }
    }
    vnodes
}

/// Positions `remove` considers for `node` under `mode`.
pub(crate) fn removal_candidates(
    hash: &dyn HashFunction,
    replicas: usize,
    mode: RemoveMode,
    node: &str,
) -> Vec<u64> {
    match mode {
        RemoveMode::SinglePosition => vec![hash.hash(node.as_bytes())],
        RemoveMode::AllReplicas => (0..replicas)
            .map(|i| hash.hash(&replica_key(i, node)))
            .collect(),
    }
}
