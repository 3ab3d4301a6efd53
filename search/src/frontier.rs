//! Open list and closed set for one episode.
//!
//! The heap holds arena indices, not nodes. A block can be pushed more than
//! once when a cheaper route turns up; stale entries are skipped when popped
//! because their block is already settled.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use voxelpath_kernel::geometry::Vec3i;

use crate::node::FrontierKey;

/// `BinaryHeap` is a max-heap, hence `Reverse`.
#[derive(Debug, PartialEq, Eq)]
struct FrontierEntry {
    key: Reverse<FrontierKey>,
    node_id: usize,
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.key.cmp(&other.key)
    }
}

/// Best-first frontier keyed by block.
#[derive(Debug, Default)]
pub struct BestFirstFrontier {
    heap: BinaryHeap<FrontierEntry>,
    settled: HashSet<Vec3i>,
    best_g: HashMap<Vec3i, i64>,
    high_water: u64,
}

impl BestFirstFrontier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `g` for `block` if it beats every earlier offer.
    ///
    /// Returns `false` when the block is settled or already reachable at
    /// `g` or less; the caller should then drop the candidate.
    pub fn offer(&mut self, block: Vec3i, g: i64) -> bool {
        if self.settled.contains(&block) {
            return false;
        }
        match self.best_g.get(&block) {
            Some(&known) if known <= g => false,
            _ => {
                self.best_g.insert(block, g);
                true
            }
        }
    }

    pub fn push(&mut self, key: FrontierKey, node_id: usize) {
        self.heap.push(FrontierEntry {
            key: Reverse(key),
            node_id,
        });
        self.high_water = self.high_water.max(self.heap.len() as u64);
    }

    /// Arena index of the best entry.
    #[must_use]
    pub fn pop(&mut self) -> Option<usize> {
        self.heap.pop().map(|e| e.node_id)
    }

    /// Close `block`. Returns `false` if it was already closed.
    pub fn settle(&mut self, block: Vec3i) -> bool {
        self.settled.insert(block)
    }

    #[must_use]
    pub fn is_settled(&self, block: Vec3i) -> bool {
        self.settled.contains(&block)
    }

    #[must_use]
    pub fn settled_count(&self) -> usize {
        self.settled.len()
    }

    /// Open entries, including stale ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    #[must_use]
    pub fn high_water(&self) -> u64 {
        self.high_water
    }
}
