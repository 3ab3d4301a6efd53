//! World snapshots and canned fixture worlds.

pub mod fixtures;
pub mod snapshot;
