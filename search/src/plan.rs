//! Plans: the successful output of a search.

use serde::{Deserialize, Serialize};
use voxelpath_kernel::geometry::Vec3i;
use voxelpath_kernel::proof::canon::{to_canonical_bytes, CanonError};
use voxelpath_kernel::proof::hash::{canonical_hash, ContentHash};
use voxelpath_kernel::proof::hash_domain::HashDomain;

use crate::action::GraphAction;

/// One movement in a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStepV1 {
    pub action: GraphAction,
    /// Feet block after the step.
    pub destination: Vec3i,
    /// Cost of this step alone.
    pub cost: i64,
}

/// Ordered movement actions from the start block to a goal block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanV1 {
    /// Feet block the plan starts from.
    pub start: Vec3i,
    /// The bot must first center itself on `start`.
    pub reposition_first: bool,
    pub steps: Vec<PlanStepV1>,
    pub total_cost: i64,
}

impl PlanV1 {
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Feet block after the last step (the start for an empty plan).
    #[must_use]
    pub fn destination(&self) -> Vec3i {
        self.steps.last().map_or(self.start, |s| s.destination)
    }

    /// # Errors
    ///
    /// [`CanonError`] if serialization fails.
    pub fn to_canonical_json(&self) -> Result<Vec<u8>, CanonError> {
        to_canonical_bytes(self)
    }

    /// # Errors
    ///
    /// [`CanonError`] if serialization fails.
    pub fn digest(&self) -> Result<ContentHash, CanonError> {
        Ok(canonical_hash(HashDomain::Plan, &self.to_canonical_json()?))
    }
}
