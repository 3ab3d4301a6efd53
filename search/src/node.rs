//! Search nodes and the frontier ordering key.

use voxelpath_kernel::geometry::Vec3i;

use crate::state::BotState;

/// One node in the episode's arena.
///
/// Nodes are never removed from the arena; parents are referenced by index.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchNode {
    /// Index in the arena.
    pub node_id: usize,
    /// `None` for the start node.
    pub parent_id: Option<usize>,
    pub state: BotState,
    /// Number of actions from the start.
    pub depth: u32,
    /// Cost from the start (equals `state.cost`).
    pub g_cost: i64,
    /// Goal heuristic at this node.
    pub h_cost: i64,
    /// Global counter for deterministic tie-breaking.
    pub creation_order: u64,
}

impl SearchNode {
    /// `g_cost + h_cost`.
    #[must_use]
    pub fn f_cost(&self) -> i64 {
        self.g_cost.saturating_add(self.h_cost)
    }

    /// The block this node occupies (closed-set key).
    #[must_use]
    pub fn block(&self) -> Vec3i {
        self.state.block()
    }
}

/// Frontier ordering: `(f_cost, h_cost, creation_order)`, lower first.
///
/// Ties on `f` prefer the node believed closer to the goal, then the older
/// node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrontierKey {
    pub f_cost: i64,
    pub h_cost: i64,
    pub creation_order: u64,
}

impl PartialOrd for FrontierKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.f_cost
            .cmp(&other.f_cost)
            .then(self.h_cost.cmp(&other.h_cost))
            .then(self.creation_order.cmp(&other.creation_order))
    }
}

impl From<&SearchNode> for FrontierKey {
    fn from(node: &SearchNode) -> Self {
        Self {
            f_cost: node.f_cost(),
            h_cost: node.h_cost,
            creation_order: node.creation_order,
        }
    }
}
