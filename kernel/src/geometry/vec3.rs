//! Integer block coordinates and fractional positions.
//!
//! `Vec3i` addresses a single world cell and is the key type for every
//! block lookup, offset table and visited set. `Vec3d` is the bot's
//! fractional position; it only exists so jump and fall phases can sit
//! between block boundaries.

use std::fmt;
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// A block coordinate or a relative block offset.
///
/// Derives `Ord` so offsets can key `BTreeMap`s with a stable iteration order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Vec3i {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Vec3i {
    /// The origin offset (the bot's own feet block).
    pub const ZERO: Self = Self::new(0, 0, 0);

    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Component-wise sum.
    #[must_use]
    pub const fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }

    /// Component-wise difference.
    #[must_use]
    pub const fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    /// Shift up by `n` blocks.
    #[must_use]
    pub const fn up(self, n: i32) -> Self {
        Self::new(self.x, self.y + n, self.z)
    }

    /// Shift down by `n` blocks.
    #[must_use]
    pub const fn down(self, n: i32) -> Self {
        Self::new(self.x, self.y - n, self.z)
    }

    /// Scale every component by `factor`.
    #[must_use]
    pub const fn scale(self, factor: i32) -> Self {
        Self::new(self.x * factor, self.y * factor, self.z * factor)
    }

    /// Euclidean length of the horizontal (x, z) component.
    #[must_use]
    pub fn horizontal_length(self) -> f64 {
        f64::from(self.x).hypot(f64::from(self.z))
    }
}

impl Add for Vec3i {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Vec3i::add(self, rhs)
    }
}

impl Sub for Vec3i {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Vec3i::sub(self, rhs)
    }
}

impl fmt::Display for Vec3i {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// A fractional position in world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3d {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3d {
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// The point a bot occupies when standing in the middle of `block`.
    ///
    /// Feet rest on the block's floor, so `y` is not offset.
    #[must_use]
    pub fn block_center(block: Vec3i) -> Self {
        Self::new(
            f64::from(block.x) + 0.5,
            f64::from(block.y),
            f64::from(block.z) + 0.5,
        )
    }

    /// The block containing this position.
    ///
    /// Coordinates outside the `i32` range saturate.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn block(self) -> Vec3i {
        Vec3i::new(
            self.x.floor() as i32,
            self.y.floor() as i32,
            self.z.floor() as i32,
        )
    }

    /// Whether every component is finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl fmt::Display for Vec3d {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3})", self.x, self.y, self.z)
    }
}
