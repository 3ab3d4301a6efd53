//! Bot state as seen by the search.

use serde::{Deserialize, Serialize};
use voxelpath_kernel::geometry::{Vec3d, Vec3i};

use crate::action::GraphAction;

/// What the bot is able to do besides moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Capabilities {
    pub can_break_blocks: bool,
}

impl Capabilities {
    pub const WALK_ONLY: Self = Self {
        can_break_blocks: false,
    };

    pub const WITH_TOOLS: Self = Self {
        can_break_blocks: true,
    };
}

/// A point in the search space.
///
/// Values are never mutated after construction; each expansion builds new
/// ones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BotState {
    pub position: Vec3d,
    pub capabilities: Capabilities,
    /// Accumulated cost from the episode start.
    pub cost: i64,
    /// The action that produced this state (`None` for the start).
    pub produced_by: Option<GraphAction>,
}

impl BotState {
    /// A fresh state at `position` with zero accumulated cost.
    #[must_use]
    pub const fn spawn(position: Vec3d, capabilities: Capabilities) -> Self {
        Self {
            position,
            capabilities,
            cost: 0,
            produced_by: None,
        }
    }

    /// Feet block.
    #[must_use]
    pub fn block(&self) -> Vec3i {
        self.position.block()
    }

    /// Successor standing at the center of `destination`.
    #[must_use]
    pub fn advanced(&self, action: GraphAction, destination: Vec3i, step_cost: i64) -> Self {
        Self {
            position: Vec3d::block_center(destination),
            capabilities: self.capabilities,
            cost: self.cost.saturating_add(step_cost),
            produced_by: Some(action),
        }
    }
}
