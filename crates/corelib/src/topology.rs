//! Ring topology analysis.
//!
//! A [`Topology`] is a detached, read-only view of a ring's positions used
//! to answer "how much of the key space does each node own?". That is the
//! number to watch when picking a replica count: with few replicas the
//! shares are lumpy, with many they converge on `1 / nodes`.

use std::collections::BTreeMap;

use crate::node::NodeId;
use crate::vnode::clockwise_distance;

/// One arc of the ring: the keys hashing into `(start, end]` belong to
/// `node`. The first arc wraps around from the largest position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Span {
    /// Exclusive start (the previous position clockwise).
    pub start: u64,
    /// Inclusive end (the owning position).
    pub end: u64,
    pub node: NodeId,
    /// Number of hash values in the arc.
    pub len: u128,
}

/// Snapshot of ring positions over a hash space of `2^bits` values.
#[derive(Clone, Debug)]
pub struct Topology {
    tokens: Vec<(u64, NodeId)>,
    bits: u32,
}

impl Topology {
    /// Build a snapshot from `(position, node)` pairs in any order.
    ///
    /// `bits` is clamped to `1..=64`. If a position does not fit in
    /// `2^bits` (a hash that under-reports its width) the space widens
    /// to `2^64`.
    pub fn new(mut tokens: Vec<(u64, NodeId)>, bits: u32) -> Self {
        tokens.sort_by_key(|(position, _)| *position);
        let mut bits = bits.clamp(1, 64);
        if let Some((max, _)) = tokens.last() {
            if bits < 64 && *max >> bits != 0 {
                bits = 64;
            }
        }
        Self { tokens, bits }
    }

    /// Width of the hash space in bits, after clamping and widening.
    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// Size of the hash space.
    pub fn space(&self) -> u128 {
        1u128 << self.bits
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Arcs in ascending order of their end position.
    ///
    /// When every token sits at the same position (one token, a node added
    /// twice with one replica, a constant hash) a single span covers the
    /// whole space.
    pub fn spans(&self) -> Vec<Span> {
        let n = self.tokens.len();
        let (Some((first, _)), Some((last, _))) = (self.tokens.first(), self.tokens.last()) else {
            return Vec::new();
        };
        if first == last {
            let (position, node) = &self.tokens[n - 1];
            return vec![Span {
                start: *position,
                end: *position,
                node: node.clone(),
                len: self.space(),
            }];
        }

        (0..n)
            .map(|i| {
                let (prev, _) = &self.tokens[(i + n - 1) % n];
                let (end, node) = &self.tokens[i];
                Span {
                    start: *prev,
                    end: *end,
                    node: node.clone(),
                    len: clockwise_distance(*prev, *end, self.bits),
                }
            })
            .collect()
    }

    /// Fraction of the hash space owned by each node.
    pub fn ownership(&self) -> Ownership {
        let space = self.space() as f64;
        let mut shares: BTreeMap<NodeId, f64> = BTreeMap::new();
        for span in self.spans() {
            *shares.entry(span.node).or_insert(0.0) += span.len as f64 / space;
        }
        Ownership { shares }
    }
}

/// Per-node share of the key space, each in `[0, 1]`, summing to 1.
#[derive(Clone, Debug, Default)]
pub struct Ownership {
    shares: BTreeMap<NodeId, f64>,
}

impl Ownership {
    /// Share owned by `node`; zero for unknown nodes.
    pub fn share(&self, node: &str) -> f64 {
        self.shares.get(node).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, f64)> + '_ {
        self.shares.iter().map(|(node, share)| (node, *share))
    }

    pub fn len(&self) -> usize {
        self.shares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }

    /// Largest share divided by the ideal `1 / nodes`. 1.0 is perfectly even.
    pub fn imbalance(&self) -> f64 {
        if self.shares.is_empty() {
            return 0.0;
        }
        let max = self.shares.values().copied().fold(0.0, f64::max);
        max * self.shares.len() as f64
    }
}
