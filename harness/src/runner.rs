//! Episode runner: turns plan requests into reports.
//!
//! ```text
//! PlanRequest → GoalSpec::build() → search() → EpisodeReportV1
//! [PlanRequest] → run_batch (rayon pool, `workers` threads) → [EpisodeReportV1]
//! ```
//!
//! Every episode in a batch shares one world snapshot and one expander.
//! Reports come back in request order whatever the worker count.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span};
use voxelpath_kernel::geometry::{Vec3d, Vec3i};
use voxelpath_kernel::proof::canon::{to_canonical_bytes, CanonError};
use voxelpath_kernel::proof::hash::{canonical_hash, ContentHash};
use voxelpath_kernel::proof::hash_domain::HashDomain;
use voxelpath_kernel::world::WorldView;
use voxelpath_search::cancel::CancelSignal;
use voxelpath_search::error::SearchError;
use voxelpath_search::expander::GraphExpander;
use voxelpath_search::goal::{
    AnyOfGoal, AwayFromPosGoal, GoalError, GoalScorer, PosGoal, XzGoal, YGoal,
};
use voxelpath_search::outcome::{SearchFailure, SearchStats};
use voxelpath_search::plan::PlanV1;
use voxelpath_search::policy::SearchPolicyV1;
use voxelpath_search::search::search;
use voxelpath_search::state::{BotState, Capabilities};

#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("invalid goal: {0}")]
    Goal(#[from] GoalError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error("report serialization failed: {0}")]
    Canon(#[from] CanonError),

    #[error("worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// Serializable goal description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GoalSpec {
    Xz { x: f64, z: f64 },
    Pos { x: i32, y: i32, z: i32 },
    Y { y: i32 },
    /// At least `min_distance` blocks horizontally from a block.
    AwayFrom {
        x: i32,
        y: i32,
        z: i32,
        min_distance: f64,
    },
    AnyOf { goals: Vec<GoalSpec> },
}

impl GoalSpec {
    #[must_use]
    pub const fn pos(pos: Vec3i) -> Self {
        Self::Pos {
            x: pos.x,
            y: pos.y,
            z: pos.z,
        }
    }

    /// # Errors
    ///
    /// Whatever the goal constructor rejects.
    pub fn build(&self) -> Result<Box<dyn GoalScorer>, GoalError> {
        Ok(match self {
            Self::Xz { x, z } => Box::new(XzGoal::new(*x, *z)?),
            Self::Pos { x, y, z } => Box::new(PosGoal::new(Vec3i::new(*x, *y, *z))?),
            Self::Y { y } => Box::new(YGoal::new(*y)),
            Self::AwayFrom {
                x,
                y,
                z,
                min_distance,
            } => Box::new(AwayFromPosGoal::new(Vec3i::new(*x, *y, *z), *min_distance)?),
            Self::AnyOf { goals } => {
                let members = goals
                    .iter()
                    .map(GoalSpec::build)
                    .collect::<Result<Vec<_>, _>>()?;
                Box::new(AnyOfGoal::new(members)?)
            }
        })
    }
}

/// One bot's planning request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub bot_id: String,
    pub start: Vec3d,
    #[serde(default)]
    pub capabilities: Capabilities,
    pub goal: GoalSpec,
}

impl PlanRequest {
    /// Request starting at the center of `block`.
    #[must_use]
    pub fn at_block(
        bot_id: impl Into<String>,
        block: Vec3i,
        capabilities: Capabilities,
        goal: GoalSpec,
    ) -> Self {
        Self {
            bot_id: bot_id.into(),
            start: Vec3d::block_center(block),
            capabilities,
            goal,
        }
    }
}

/// Deterministic record of one episode.
///
/// Wall-clock time is left out, so identical inputs give identical bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EpisodeReportV1 {
    pub bot_id: String,
    pub goal: String,
    /// `"succeeded"` or the failure tag.
    pub outcome: String,
    pub failure: Option<SearchFailure>,
    pub plan: Option<PlanV1>,
    pub plan_digest: Option<ContentHash>,
    pub policy_digest: ContentHash,
    pub stats: SearchStats,
}

impl EpisodeReportV1 {
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
        Ok(canonical_hash(
            HashDomain::EpisodeReport,
            &self.to_canonical_json()?,
        ))
    }

    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.plan.is_some()
    }
}

/// Plan one request and package the outcome.
///
/// # Errors
///
/// [`RunnerError::Goal`] for an unbuildable goal, [`RunnerError::Search`]
/// for pre-flight failures. Failed searches are reports, not errors.
pub fn run_episode(
    world: &dyn WorldView,
    expander: &GraphExpander,
    request: &PlanRequest,
    policy: &SearchPolicyV1,
    cancel: &dyn CancelSignal,
) -> Result<EpisodeReportV1, RunnerError> {
    let span = info_span!("episode", bot = %request.bot_id);
    let _guard = span.enter();

    let goal = request.goal.build()?;
    let start = BotState::spawn(request.start, request.capabilities);
    let result = search(start, world, expander, goal.as_ref(), policy, cancel)?;

    let (outcome, failure, plan) = match result.outcome {
        Ok(plan) => ("succeeded".to_owned(), None, Some(plan)),
        Err(failure) => (failure.tag().to_owned(), Some(failure), None),
    };
    let plan_digest = plan.as_ref().map(PlanV1::digest).transpose()?;
    info!(outcome = %outcome, expansions = result.stats.expansions, "episode finished");

    Ok(EpisodeReportV1 {
        bot_id: request.bot_id.clone(),
        goal: goal.describe(),
        outcome,
        failure,
        plan,
        plan_digest,
        policy_digest: policy.digest()?,
        stats: result.stats,
    })
}

/// Plan every request on a dedicated pool of up to `workers` threads.
///
/// Returns one entry per request, in request order.
///
/// # Errors
///
/// [`RunnerError::Pool`] if the thread pool cannot be built. Per-request
/// failures are reported in the returned entries.
pub fn run_batch(
    world: &dyn WorldView,
    expander: &GraphExpander,
    requests: &[PlanRequest],
    policy: &SearchPolicyV1,
    workers: usize,
    cancel: &dyn CancelSignal,
) -> Result<Vec<Result<EpisodeReportV1, RunnerError>>, RunnerError> {
    let workers = workers.clamp(1, requests.len().max(1));
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("voxelpath-batch-{i}"))
        .build()?;
    debug!(workers, requests = requests.len(), "running batch");

    Ok(pool.install(|| {
        requests
            .par_iter()
            .map(|request| run_episode(world, expander, request, policy, cancel))
            .collect()
    }))
}

/// Digest over the ordered report digests of a batch.
///
/// # Errors
///
/// [`CanonError`] if any report fails to serialize.
pub fn batch_digest(reports: &[EpisodeReportV1]) -> Result<ContentHash, CanonError> {
    let digests = reports
        .iter()
        .map(|r| r.digest().map(|d| d.as_str().to_owned()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(canonical_hash(
        HashDomain::BatchReport,
        &to_canonical_bytes(&digests)?,
    ))
}
