//! Geometry module: block coordinates, fractional positions, directions.
//!
//! Leaf layer. No other kernel module is imported here.

pub mod direction;
pub mod vec3;

pub use direction::Direction;
pub use vec3::{Vec3d, Vec3i};
