//! Goal scorers.
//!
//! A [`GoalScorer`] answers two questions about a state: is it finished,
//! and how much does it cost at least to get there. The second answer must
//! never overestimate; the search's optimality rests on it.
//!
//! Every heuristic here is `STRAIGHT` times a distance that no single
//! action can shrink faster than its own cost pays for (see
//! [`crate::costs`]).

use std::fmt;

use voxelpath_kernel::geometry::{Vec3d, Vec3i};

use crate::costs::STRAIGHT;
use crate::state::BotState;

/// Largest absolute horizontal coordinate a goal may name.
pub const WORLD_BORDER: f64 = 30_000_000.0;

/// How close, in blocks, a state must be to an [`XzGoal`] target on each
/// horizontal axis.
pub const FINISH_TOLERANCE: f64 = 1e-3;

/// Target condition for one search.
pub trait GoalScorer: Send + Sync {
    /// Admissible lower bound of the remaining cost from `state`.
    fn compute_score(&self, state: &BotState) -> i64;

    fn is_finished(&self, state: &BotState) -> bool;

    /// Human-readable target, for logs.
    fn describe(&self) -> String;
}

impl<G: GoalScorer + ?Sized> GoalScorer for Box<G> {
    fn compute_score(&self, state: &BotState) -> i64 {
        (**self).compute_score(state)
    }

    fn is_finished(&self, state: &BotState) -> bool {
        (**self).is_finished(state)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Rejected goal parameters.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GoalError {
    #[error("goal coordinate {axis} is not finite: {value}")]
    NonFinite { axis: char, value: f64 },

    #[error("goal coordinate {axis} = {value} lies outside the world border")]
    OutsideWorldBorder { axis: char, value: f64 },

    #[error("any-of goal needs at least one member")]
    EmptyAnyOf,

    #[error("away-from distance must be finite and positive, got {value}")]
    InvalidDistance { value: f64 },
}

fn check_horizontal(axis: char, value: f64) -> Result<(), GoalError> {
    if !value.is_finite() {
        return Err(GoalError::NonFinite { axis, value });
    }
    if value.abs() > WORLD_BORDER {
        return Err(GoalError::OutsideWorldBorder { axis, value });
    }
    Ok(())
}

/// `floor(blocks * STRAIGHT)`.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn to_cost_floor(blocks: f64) -> i64 {
    (blocks * STRAIGHT as f64).floor() as i64
}

/// Reach a horizontal position at any height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct XzGoal {
    x: f64,
    z: f64,
}

impl XzGoal {
    /// Target the center of the block column containing `(x, z)`.
    ///
    /// # Errors
    ///
    /// [`GoalError::NonFinite`] or [`GoalError::OutsideWorldBorder`].
    pub fn new(x: f64, z: f64) -> Result<Self, GoalError> {
        check_horizontal('x', x)?;
        check_horizontal('z', z)?;
        Ok(Self {
            x: x.floor() + 0.5,
            z: z.floor() + 0.5,
        })
    }

    /// Snapped target `(x, z)`.
    #[must_use]
    pub const fn target(&self) -> (f64, f64) {
        (self.x, self.z)
    }

    fn deltas(&self, position: Vec3d) -> (f64, f64) {
        (self.x - position.x, self.z - position.z)
    }
}

impl GoalScorer for XzGoal {
    fn compute_score(&self, state: &BotState) -> i64 {
        let (dx, dz) = self.deltas(state.position);
        to_cost_floor(dx.hypot(dz))
    }

    fn is_finished(&self, state: &BotState) -> bool {
        let (dx, dz) = self.deltas(state.position);
        dx.abs() <= FINISH_TOLERANCE && dz.abs() <= FINISH_TOLERANCE
    }

    fn describe(&self) -> String {
        format!("xz({:.1}, {:.1})", self.x, self.z)
    }
}

/// Stand in one exact block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PosGoal {
    target: Vec3i,
}

impl PosGoal {
    /// # Errors
    ///
    /// [`GoalError::OutsideWorldBorder`] for an out-of-world column.
    pub fn new(target: Vec3i) -> Result<Self, GoalError> {
        check_horizontal('x', f64::from(target.x))?;
        check_horizontal('z', f64::from(target.z))?;
        Ok(Self { target })
    }

    #[must_use]
    pub const fn target(&self) -> Vec3i {
        self.target
    }
}

impl GoalScorer for PosGoal {
    fn compute_score(&self, state: &BotState) -> i64 {
        let delta = self.target - state.block();
        let vertical = f64::from(delta.y.unsigned_abs());
        to_cost_floor(delta.horizontal_length().max(vertical))
    }

    fn is_finished(&self, state: &BotState) -> bool {
        state.block() == self.target
    }

    fn describe(&self) -> String {
        format!("pos{}", self.target)
    }
}

/// Reach a feet level, anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YGoal {
    y: i32,
}

impl YGoal {
    #[must_use]
    pub const fn new(y: i32) -> Self {
        Self { y }
    }
}

impl GoalScorer for YGoal {
    fn compute_score(&self, state: &BotState) -> i64 {
        i64::from(self.y.abs_diff(state.block().y)) * STRAIGHT
    }

    fn is_finished(&self, state: &BotState) -> bool {
        state.block().y == self.y
    }

    fn describe(&self) -> String {
        format!("y({})", self.y)
    }
}

/// Get at least `min_distance` blocks away from `origin`, horizontally.
///
/// Distance is measured from the center of the origin block to the bot's
/// position, ignoring height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AwayFromPosGoal {
    origin: Vec3i,
    min_distance: f64,
}

impl AwayFromPosGoal {
    /// # Errors
    ///
    /// [`GoalError::InvalidDistance`] unless `min_distance` is finite and
    /// positive; [`GoalError::OutsideWorldBorder`] for an out-of-world
    /// origin.
    pub fn new(origin: Vec3i, min_distance: f64) -> Result<Self, GoalError> {
        if !min_distance.is_finite() || min_distance <= 0.0 {
            return Err(GoalError::InvalidDistance {
                value: min_distance,
            });
        }
        check_horizontal('x', f64::from(origin.x))?;
        check_horizontal('z', f64::from(origin.z))?;
        Ok(Self {
            origin,
            min_distance,
        })
    }

    fn distance(&self, position: Vec3d) -> f64 {
        let center = Vec3d::block_center(self.origin);
        (position.x - center.x).hypot(position.z - center.z)
    }
}

impl GoalScorer for AwayFromPosGoal {
    fn compute_score(&self, state: &BotState) -> i64 {
        to_cost_floor((self.min_distance - self.distance(state.position)).max(0.0))
    }

    fn is_finished(&self, state: &BotState) -> bool {
        self.distance(state.position) >= self.min_distance
    }

    fn describe(&self) -> String {
        format!("away({}, {:.1})", self.origin, self.min_distance)
    }
}

/// Finished when any member is. Scores as the cheapest member.
pub struct AnyOfGoal {
    members: Vec<Box<dyn GoalScorer>>,
}

impl AnyOfGoal {
    /// # Errors
    ///
    /// [`GoalError::EmptyAnyOf`] if `members` is empty.
    pub fn new(members: Vec<Box<dyn GoalScorer>>) -> Result<Self, GoalError> {
        if members.is_empty() {
            return Err(GoalError::EmptyAnyOf);
        }
        Ok(Self { members })
    }
}

impl fmt::Debug for AnyOfGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyOfGoal")
            .field("members", &self.describe())
            .finish()
    }
}

impl GoalScorer for AnyOfGoal {
    fn compute_score(&self, state: &BotState) -> i64 {
        self.members
            .iter()
            .map(|m| m.compute_score(state))
            .min()
            .unwrap_or(0)
    }

    fn is_finished(&self, state: &BotState) -> bool {
        self.members.iter().any(|m| m.is_finished(state))
    }

    fn describe(&self) -> String {
        let parts: Vec<String> = self.members.iter().map(|m| m.describe()).collect();
        format!("any[{}]", parts.join(", "))
    }
}
