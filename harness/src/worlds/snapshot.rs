//! In-memory chunked world snapshot.
//!
//! Stands in for the platform's chunk cache in tests, benchmarks and load
//! runs. Cells are stored per 16x16 chunk column between `min_y` and
//! `max_y` inclusive. A snapshot is frozen once built, so it satisfies the
//! episode-long immutability the engine expects.

use std::collections::BTreeMap;

use serde::Serialize;
use voxelpath_kernel::block::BlockState;
use voxelpath_kernel::geometry::Vec3i;
use voxelpath_kernel::proof::canon::{to_canonical_bytes, CanonError};
use voxelpath_kernel::proof::hash::{canonical_hash, ContentHash};
use voxelpath_kernel::proof::hash_domain::HashDomain;
use voxelpath_kernel::world::WorldView;

/// Chunk edge length in blocks.
pub const CHUNK_SIZE: i32 = 16;

const COLUMN_AREA: usize = (CHUNK_SIZE * CHUNK_SIZE) as usize;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotError {
    #[error("height range {min_y}..={max_y} is empty")]
    EmptyHeightRange { min_y: i32, max_y: i32 },

    #[error("y = {y} at {pos} lies outside {min_y}..={max_y}")]
    OutOfHeightRange {
        pos: Vec3i,
        y: i32,
        min_y: i32,
        max_y: i32,
    },
}

/// Chunk coordinates of the column containing `pos`.
#[must_use]
pub const fn chunk_of(pos: Vec3i) -> (i32, i32) {
    (pos.x.div_euclid(CHUNK_SIZE), pos.z.div_euclid(CHUNK_SIZE))
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ChunkColumn {
    cells: Vec<BlockState>,
}

impl ChunkColumn {
    fn empty(height: usize) -> Self {
        Self {
            cells: vec![BlockState::Air; height * COLUMN_AREA],
        }
    }
}

/// Geometry shared by builder and snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HeightRange {
    min_y: i32,
    max_y: i32,
}

impl HeightRange {
    #[allow(clippy::cast_sign_loss)]
    fn height(self) -> usize {
        (self.max_y - self.min_y + 1) as usize
    }

    /// Index of `pos` inside its column, or `None` outside the height range.
    #[allow(clippy::cast_sign_loss)]
    fn index(self, pos: Vec3i) -> Option<usize> {
        if pos.y < self.min_y || pos.y > self.max_y {
            return None;
        }
        let lx = pos.x.rem_euclid(CHUNK_SIZE) as usize;
        let lz = pos.z.rem_euclid(CHUNK_SIZE) as usize;
        let ly = (pos.y - self.min_y) as usize;
        Some(ly * COLUMN_AREA + lz * CHUNK_SIZE as usize + lx)
    }
}

/// Frozen, thread-safe world view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkedSnapshot {
    range: HeightRange,
    chunks: BTreeMap<(i32, i32), ChunkColumn>,
}

impl ChunkedSnapshot {
    #[must_use]
    pub fn min_y(&self) -> i32 {
        self.range.min_y
    }

    #[must_use]
    pub fn max_y(&self) -> i32 {
        self.range.max_y
    }

    #[must_use]
    pub fn is_loaded(&self, chunk_x: i32, chunk_z: i32) -> bool {
        self.chunks.contains_key(&(chunk_x, chunk_z))
    }

    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Digest over the height range and run-length encoded chunk contents.
    ///
    /// # Errors
    ///
    /// [`CanonError`] if serialization fails.
    pub fn digest(&self) -> Result<ContentHash, CanonError> {
        #[derive(Serialize)]
        struct ChunkDigest {
            x: i32,
            z: i32,
            runs: Vec<(BlockState, u64)>,
        }

        #[derive(Serialize)]
        struct SnapshotDigest {
            min_y: i32,
            max_y: i32,
            chunks: Vec<ChunkDigest>,
        }

        let chunks = self
            .chunks
            .iter()
            .map(|(&(x, z), column)| ChunkDigest {
                x,
                z,
                runs: run_length(&column.cells),
            })
            .collect();
        let bytes = to_canonical_bytes(&SnapshotDigest {
            min_y: self.range.min_y,
            max_y: self.range.max_y,
            chunks,
        })?;
        Ok(canonical_hash(HashDomain::WorldSnapshot, &bytes))
    }
}

fn run_length(cells: &[BlockState]) -> Vec<(BlockState, u64)> {
    let mut runs: Vec<(BlockState, u64)> = Vec::new();
    for &cell in cells {
        match runs.last_mut() {
            Some((block, count)) if *block == cell => *count += 1,
            _ => runs.push((cell, 1)),
        }
    }
    runs
}

impl WorldView for ChunkedSnapshot {
    fn lookup_block(&self, pos: Vec3i) -> Option<BlockState> {
        if pos.y > self.range.max_y {
            return Some(BlockState::Air);
        }
        let index = self.range.index(pos)?;
        let column = self.chunks.get(&chunk_of(pos))?;
        column.cells.get(index).copied()
    }
}

/// Mutable staging area for a [`ChunkedSnapshot`].
#[derive(Debug, Clone)]
pub struct SnapshotBuilder {
    range: HeightRange,
    chunks: BTreeMap<(i32, i32), ChunkColumn>,
}

impl SnapshotBuilder {
    /// # Errors
    ///
    /// [`SnapshotError::EmptyHeightRange`] if `min_y > max_y`.
    pub fn new(min_y: i32, max_y: i32) -> Result<Self, SnapshotError> {
        if min_y > max_y {
            return Err(SnapshotError::EmptyHeightRange { min_y, max_y });
        }
        Ok(Self {
            range: HeightRange { min_y, max_y },
            chunks: BTreeMap::new(),
        })
    }

    /// Mark a chunk column as loaded (all air). No-op if already loaded.
    pub fn load_chunk(&mut self, chunk_x: i32, chunk_z: i32) -> &mut Self {
        let height = self.range.height();
        self.chunks
            .entry((chunk_x, chunk_z))
            .or_insert_with(|| ChunkColumn::empty(height));
        self
    }

    /// Load every chunk overlapping the horizontal rectangle `min..=max`.
    pub fn load_area(&mut self, min: Vec3i, max: Vec3i) -> &mut Self {
        let (cx0, cz0) = chunk_of(min);
        let (cx1, cz1) = chunk_of(max);
        for cx in cx0.min(cx1)..=cx0.max(cx1) {
            for cz in cz0.min(cz1)..=cz0.max(cz1) {
                self.load_chunk(cx, cz);
            }
        }
        self
    }

    /// Set one cell, loading its chunk if needed.
    ///
    /// # Errors
    ///
    /// [`SnapshotError::OutOfHeightRange`] if `pos.y` is outside the range.
    pub fn set(&mut self, pos: Vec3i, block: BlockState) -> Result<&mut Self, SnapshotError> {
        let range = self.range;
        let index = range.index(pos).ok_or(SnapshotError::OutOfHeightRange {
            pos,
            y: pos.y,
            min_y: range.min_y,
            max_y: range.max_y,
        })?;
        let (cx, cz) = chunk_of(pos);
        let column = self
            .chunks
            .entry((cx, cz))
            .or_insert_with(|| ChunkColumn::empty(range.height()));
        column.cells[index] = block;
        Ok(self)
    }

    /// Set every cell in the box spanned by `a` and `b` (inclusive).
    ///
    /// # Errors
    ///
    /// See [`SnapshotBuilder::set`]. Cells before the failing one stay set.
    pub fn fill(&mut self, a: Vec3i, b: Vec3i, block: BlockState) -> Result<&mut Self, SnapshotError> {
        for y in a.y.min(b.y)..=a.y.max(b.y) {
            for z in a.z.min(b.z)..=a.z.max(b.z) {
                for x in a.x.min(b.x)..=a.x.max(b.x) {
                    self.set(Vec3i::new(x, y, z), block)?;
                }
            }
        }
        Ok(self)
    }

    #[must_use]
    pub fn build(self) -> ChunkedSnapshot {
        ChunkedSnapshot {
            range: self.range,
            chunks: self.chunks,
        }
    }
}
