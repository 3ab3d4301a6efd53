//! Voxelpath kernel: the shared vocabulary of the pathfinding engine.
//!
//! # Modules
//!
//! - [`geometry`]: block coordinates, fractional positions, directions
//! - [`block`]: movement classification of a world cell
//! - [`world`]: the read-only [`world::WorldView`] contract
//! - [`proof`]: canonical bytes and domain-separated digests
//!
//! # Module Dependency Direction
//!
//! `geometry` ← `block` ← `world`; `proof` depends on nothing internal.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod block;
pub mod geometry;
pub mod proof;
pub mod world;
