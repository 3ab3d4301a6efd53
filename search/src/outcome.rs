//! Episode states, failures and statistics.

use std::fmt;

use serde::Serialize;
use voxelpath_kernel::geometry::Vec3i;

use crate::plan::PlanV1;

/// Which budget ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetKind {
    Expansions,
    WallClock,
}

impl fmt::Display for BudgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Expansions => "expansion budget",
            Self::WallClock => "wall-clock budget",
        })
    }
}

/// Where a collaborator panic was caught.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PanicStage {
    GoalScore,
    GoalCheck,
    Expand,
}

impl fmt::Display for PanicStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::GoalScore => "goal scoring",
            Self::GoalCheck => "goal check",
            Self::Expand => "expansion",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureReason {
    Unreachable,
    Timeout(BudgetKind),
    CollaboratorPanic(PanicStage),
}

/// `Ready -> Running -> {Succeeded, Failed, Cancelled}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EpisodeState {
    Ready,
    Running,
    Succeeded,
    Failed(FailureReason),
    Cancelled,
}

impl EpisodeState {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Ready | Self::Running)
    }
}

/// Why a search produced no plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, thiserror::Error)]
#[serde(tag = "failure", rename_all = "snake_case")]
pub enum SearchFailure {
    #[error("goal is unreachable from the start")]
    Unreachable,

    #[error("search ran out of its {budget}")]
    Timeout { budget: BudgetKind },

    #[error("search was cancelled")]
    Cancelled,

    #[error("collaborator panicked during {stage}")]
    CollaboratorPanic { stage: PanicStage },
}

impl SearchFailure {
    /// Short tag for reports and logs.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Unreachable => "unreachable",
            Self::Timeout { .. } => "timeout",
            Self::Cancelled => "cancelled",
            Self::CollaboratorPanic { .. } => "collaborator_panic",
        }
    }
}

impl From<FailureReason> for SearchFailure {
    fn from(reason: FailureReason) -> Self {
        match reason {
            FailureReason::Unreachable => Self::Unreachable,
            FailureReason::Timeout(budget) => Self::Timeout { budget },
            FailureReason::CollaboratorPanic(stage) => Self::CollaboratorPanic { stage },
        }
    }
}

/// Counters gathered during one episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    pub expansions: u64,
    pub nodes_created: u64,
    pub block_lookups: u64,
    pub unresolved_lookups: u64,
    pub frontier_high_water: u64,
    /// Popped block with the lowest heuristic so far.
    pub closest_position: Vec3i,
    pub closest_score: i64,
    /// Not deterministic; excluded from digests.
    #[serde(skip)]
    pub elapsed_ms: u64,
}

impl Default for SearchStats {
    fn default() -> Self {
        Self {
            expansions: 0,
            nodes_created: 0,
            block_lookups: 0,
            unresolved_lookups: 0,
            frontier_high_water: 0,
            closest_position: Vec3i::ZERO,
            closest_score: i64::MAX,
            elapsed_ms: 0,
        }
    }
}

/// Final output of a terminated episode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub outcome: Result<PlanV1, SearchFailure>,
    pub stats: SearchStats,
}

impl SearchResult {
    #[must_use]
    pub fn plan(&self) -> Option<&PlanV1> {
        self.outcome.as_ref().ok()
    }

    #[must_use]
    pub fn failure(&self) -> Option<SearchFailure> {
        self.outcome.as_ref().err().copied()
    }
}
