//! Virtual node abstractions.
//!
//! # Virtual Nodes (VNodes) Concept
//!
//! Each real node is placed on the ring `replicas` times instead of once.
//! Replica `i` of node `id` sits at `hash(decimal(i) ++ id)`, so node `"a"`
//! with three replicas lands at `hash("0a")`, `hash("1a")` and `hash("2a")`.
//!
//! More replicas give a smoother key distribution at the cost of a larger
//! position index and slower Add.

use std::fmt;

use crate::hash::HashFunction;
use crate::node::NodeId;

/// Bytes hashed to place replica `index` of `node` on the ring.
///
/// The replica index is rendered in decimal and prefixed to the node id with
/// no separator. Rings built elsewhere with the same hash and this layout
/// place nodes at the same positions.
pub fn replica_key(index: usize, node: &str) -> Vec<u8> {
    let mut key = index.to_string().into_bytes();
    key.extend_from_slice(node.as_bytes());
    key
}

/// A virtual node on the hash ring: one position owned by a real node.
///
/// Ordered by position first, so a sorted `Vec<VirtualNode>` reads clockwise.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VirtualNode {
    /// Position on the ring.
    pub position: u64,
    /// The real node that owns this position.
    pub node: NodeId,
}

impl VirtualNode {
    #[inline]
    pub fn new(position: u64, node: NodeId) -> Self {
        Self { position, node }
    }

    /// Create replica `index` of `node`, hashed with `hash`.
    ///
    /// # Algorithm
    ///
    /// 1. Build the replica key: `decimal(index) ++ node`
    /// 2. Hash the key to get the position
    ///
    /// # Performance
    /// - **Time**: O(k) where k = length of the node id plus index digits
    /// - **Space**: O(k) temporary for the replica key
    ///
    /// # Arguments
    /// * `hash` - The ring's hash function
    /// * `node` - The real node this replica belongs to
    /// * `index` - Replica index, `0..replicas`
    ///
    /// # Example
    /// ```
    /// use corelib::hash::{Crc32, HashFunction};
    /// use corelib::{NodeId, VirtualNode};
    ///
    /// let vnode = VirtualNode::from_index(&Crc32, NodeId::from("node1"), 2);
    /// assert_eq!(vnode.position, Crc32.hash(b"2node1"));
    /// ```
    pub fn from_index(hash: &dyn HashFunction, node: NodeId, index: usize) -> Self {
        let position = hash.hash(&replica_key(index, node.as_str()));
        Self::new(position, node)
    }

    /// Clockwise distance from `self` to `other` on a ring of `2^bits`
    /// positions.
    ///
    /// `bits` is clamped to `1..=64` and the result is taken modulo the
    /// ring size, so positions wider than `bits` never overflow.
    ///
    /// # Performance
    /// - **Time**: O(1)
    /// - **Space**: O(1)
    pub fn distance_to(&self, other: &Self, bits: u32) -> u128 {
        clockwise_distance(self.position, other.position, bits)
    }
}

/// Clockwise distance from `from` to `to` on a ring of `2^bits` positions.
pub(crate) fn clockwise_distance(from: u64, to: u64, bits: u32) -> u128 {
    let bits = bits.clamp(1, 64);
    let mask = if bits == 64 { u64::MAX } else { (1u64 << bits) - 1 };
    u128::from(to.wrapping_sub(from) & mask)
}

impl fmt::Display for VirtualNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VNode(position={:016x}, node={})", self.position, self.node)
    }
}
