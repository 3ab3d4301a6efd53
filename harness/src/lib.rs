//! Voxelpath Harness: worlds and runners around the search engine.
//!
//! The harness owns everything the engine treats as an outside
//! collaborator in tests and load runs: an in-memory chunked world
//! snapshot, fixture worlds, goal specs, batch orchestration, reports,
//! configuration and logging setup. It does NOT implement planning; that
//! lives in `voxelpath_search`.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod logging;
pub mod runner;
pub mod worlds;
