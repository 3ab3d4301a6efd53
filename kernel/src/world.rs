//! World view contract.
//!
//! The world/chunk cache lives outside this workspace. The engine consumes it
//! only through [`WorldView`].

use std::sync::Arc;

use crate::block::BlockState;
use crate::geometry::Vec3i;

/// Read-only block lookup.
///
/// # Contract
///
/// - Implementations must behave as an immutable snapshot for the lifetime of
///   a search episode: the same coordinate always classifies the same way.
/// - `None` means the cell cannot be resolved right now (unloaded chunk,
///   below the world floor). Callers treat it as an obstacle, never as a
///   fatal error.
/// - Lookups must be safe to issue from many threads at once.
pub trait WorldView: Send + Sync {
    /// Classify the block at `pos`.
    fn lookup_block(&self, pos: Vec3i) -> Option<BlockState>;
}

impl<W: WorldView + ?Sized> WorldView for &W {
    fn lookup_block(&self, pos: Vec3i) -> Option<BlockState> {
        (**self).lookup_block(pos)
    }
}

impl<W: WorldView + ?Sized> WorldView for Arc<W> {
    fn lookup_block(&self, pos: Vec3i) -> Option<BlockState> {
        (**self).lookup_block(pos)
    }
}

impl<W: WorldView + ?Sized> WorldView for Box<W> {
    fn lookup_block(&self, pos: Vec3i) -> Option<BlockState> {
        (**self).lookup_block(pos)
    }
}
