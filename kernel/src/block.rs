//! Block classification.
//!
//! The engine never sees concrete block types. The world subsystem reduces
//! every cell to one of four movement-relevant classes before handing it
//! over.

use serde::{Deserialize, Serialize};

/// Movement classification of a single world cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockState {
    /// No collision, no fluid. The bot can occupy it.
    Air,
    /// Full block that cannot be broken (bedrock, barriers).
    Solid,
    /// Full block the bot can mine, taking `break_ticks` game ticks with
    /// its best available tool.
    Breakable { break_ticks: u16 },
    /// Lava, fire, cactus and similar. Never entered, never stood on,
    /// never broken.
    Hazard,
}

impl BlockState {
    /// Whether the bot's body may occupy this cell.
    #[must_use]
    pub const fn is_passable(self) -> bool {
        matches!(self, Self::Air)
    }

    /// Whether the bot can stand on top of this cell.
    #[must_use]
    pub const fn is_safe_to_stand_on(self) -> bool {
        matches!(self, Self::Solid | Self::Breakable { .. })
    }

    /// Mining time in ticks, or `None` if the cell cannot be broken.
    #[must_use]
    pub const fn break_ticks(self) -> Option<u16> {
        match self {
            Self::Breakable { break_ticks } => Some(break_ticks),
            Self::Air | Self::Solid | Self::Hazard => None,
        }
    }

    #[must_use]
    pub const fn is_hazard(self) -> bool {
        matches!(self, Self::Hazard)
    }
}
