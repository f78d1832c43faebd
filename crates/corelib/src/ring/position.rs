//! Sorted position index.
//!
//! Holds the two containers a ring is made of: the ascending sequence of
//! virtual positions and the table from position to owning node. The two
//! are only ever mutated together.

use std::collections::HashMap;

use crate::node::NodeId;

/// Ascending virtual positions plus their owners.
///
/// # Invariants
///
/// - Every value in `positions` has an entry in `owners` and every key of
///   `owners` appears in `positions`.
/// - `positions` is sorted whenever a public ring operation returns.
/// - Two placements hashing to the same position share one `owners` entry
///   (last writer wins) but both occurrences stay in `positions`.
#[derive(Clone, Debug, Default)]
pub struct PositionIndex {
    positions: Vec<u64>,
    owners: HashMap<u64, NodeId>,
}

impl PositionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Number of positions in the sequence, duplicates included.
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Append a position without restoring order. Callers batch pushes and
    /// finish with [`sort`](Self::sort).
    pub(crate) fn push(&mut self, position: u64, node: NodeId) {
        self.owners.insert(position, node);
        self.positions.push(position);
    }

    pub(crate) fn sort(&mut self) {
        self.positions.sort_unstable();
    }

    /// Owner recorded for exactly `position`.
    #[inline]
    pub fn owner(&self, position: u64) -> Option<&NodeId> {
        self.owners.get(&position)
    }

    /// Index of the first position at or clockwise of `hash`, wrapping to 0
    /// past the largest position. `None` on an empty index.
    #[inline]
    pub fn successor_index(&self, hash: u64) -> Option<usize> {
        if self.positions.is_empty() {
            return None;
        }
        let idx = self.positions.partition_point(|&p| p < hash);
        Some(if idx == self.positions.len() { 0 } else { idx })
    }

    /// Owner of the first position at or clockwise of `hash`.
    pub fn successor(&self, hash: u64) -> Option<&NodeId> {
        let idx = self.successor_index(hash)?;
        self.owners.get(&self.positions[idx])
    }

    /// Walk clockwise from `hash` once around the ring.
    pub fn walk(&self, hash: u64) -> impl Iterator<Item = (u64, &NodeId)> + '_ {
        let start = self.successor_index(hash).unwrap_or(0);
        let len = self.positions.len();
        (0..len).filter_map(move |step| {
            let position = self.positions[(start + step) % len];
            self.owners.get(&position).map(|node| (position, node))
        })
    }

    /// Drop every listed position from both containers.
    ///
    /// Positions not present are ignored. Returns how many sequence entries
    /// were removed. The sequence is rebuilt with `retain`, which keeps it
    /// sorted.
    pub(crate) fn remove_all(&mut self, doomed: &[u64]) -> usize {
        let mut doomed: Vec<u64> = doomed
            .iter()
            .copied()
            .filter(|p| self.owners.remove(p).is_some())
            .collect();
        if doomed.is_empty() {
            return 0;
        }
        doomed.sort_unstable();
        doomed.dedup();

        let before = self.positions.len();
        self.positions.retain(|p| doomed.binary_search(p).is_err());
        before - self.positions.len()
    }

    /// Positions in ascending order.
    pub fn positions(&self) -> &[u64] {
        &self.positions
    }

    /// `(position, owner)` pairs in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, &NodeId)> + '_ {
        self.positions
            .iter()
            .filter_map(move |p| self.owners.get(p).map(|node| (*p, node)))
    }

    /// Owners currently referenced by the table, one entry per position.
    pub fn owners(&self) -> impl Iterator<Item = &NodeId> + '_ {
        self.owners.values()
    }

    /// Check the invariants listed on the type: the sequence is sorted,
    /// every position has an owner, and no owner entry is orphaned.
    pub fn is_consistent(&self) -> bool {
        self.positions.windows(2).all(|w| w[0] <= w[1])
            && self.positions.iter().all(|p| self.owners.contains_key(p))
            && self
                .owners
                .keys()
                .all(|p| self.positions.binary_search(p).is_ok())
    }
}
