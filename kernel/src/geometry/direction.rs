//! The four horizontal cardinal directions.
//!
//! Opposites and right-hand neighbours come from `const` tables derived from
//! the ordered variant list [`Direction::ALL`]. Nothing is assigned after the
//! variants exist.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::vec3::Vec3i;

/// A horizontal cardinal direction.
///
/// Axis convention: north is `-z`, east is `+x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    North,
    East,
    South,
    West,
}

const fn build_shifted(shift: usize) -> [Direction; 4] {
    let mut table = [Direction::North; 4];
    let mut i = 0;
    while i < 4 {
        table[i] = Direction::ALL[(i + shift) % 4];
        i += 1;
    }
    table
}

/// `OPPOSITE[d.index()]` is the direction facing away from `d`.
const OPPOSITE: [Direction; 4] = build_shifted(2);

/// `ROTATE_RIGHT[d.index()]` is `d` turned 90 degrees clockwise (seen from above).
const ROTATE_RIGHT: [Direction; 4] = build_shifted(1);

impl Direction {
    /// All directions in clockwise order starting at north.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Position of this direction in [`Direction::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::North => 0,
            Self::East => 1,
            Self::South => 2,
            Self::West => 3,
        }
    }

    /// Unit block offset.
    #[must_use]
    pub const fn offset(self) -> Vec3i {
        match self {
            Self::North => Vec3i::new(0, 0, -1),
            Self::East => Vec3i::new(1, 0, 0),
            Self::South => Vec3i::new(0, 0, 1),
            Self::West => Vec3i::new(-1, 0, 0),
        }
    }

    #[must_use]
    pub const fn opposite(self) -> Self {
        OPPOSITE[self.index()]
    }

    #[must_use]
    pub const fn rotate_right(self) -> Self {
        ROTATE_RIGHT[self.index()]
    }

    /// Lower-case name, as used in serialized plans.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::North => "north",
            Self::East => "east",
            Self::South => "south",
            Self::West => "west",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
