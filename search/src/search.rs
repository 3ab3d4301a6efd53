//! Search episodes and the expansion loop.
//!
//! An episode owns all of its mutable state (node arena, frontier, stats)
//! and borrows its collaborators (world, expander, goal), so many episodes
//! can run in parallel over one world snapshot and one expander.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::{Duration, Instant};

use tracing::{debug, info, trace};
use voxelpath_kernel::geometry::{Vec3d, Vec3i};
use voxelpath_kernel::world::WorldView;

use crate::cancel::CancelSignal;
use crate::error::SearchError;
use crate::expander::GraphExpander;
use crate::frontier::BestFirstFrontier;
use crate::goal::GoalScorer;
use crate::node::{FrontierKey, SearchNode};
use crate::outcome::{
    BudgetKind, EpisodeState, FailureReason, PanicStage, SearchFailure, SearchResult, SearchStats,
};
use crate::plan::{PlanStepV1, PlanV1};
use crate::policy::SearchPolicyV1;
use crate::state::BotState;

/// Run `f`, turning a panic into `None`.
fn guarded<T>(f: impl FnOnce() -> T) -> Option<T> {
    catch_unwind(AssertUnwindSafe(f)).ok()
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// One planning request, driven step by step or to completion.
pub struct SearchEpisode<'a> {
    world: &'a dyn WorldView,
    expander: &'a GraphExpander,
    goal: &'a dyn GoalScorer,
    policy: SearchPolicyV1,
    root: BotState,
    reposition_first: bool,
    state: EpisodeState,
    frontier: BestFirstFrontier,
    nodes: Vec<SearchNode>,
    next_creation_order: u64,
    stats: SearchStats,
    started_at: Option<Instant>,
    last_progress_at: Option<Instant>,
    outcome: Option<Result<PlanV1, SearchFailure>>,
}

impl<'a> SearchEpisode<'a> {
    /// Prepare an episode. Nothing is looked up or scored until the first
    /// [`advance`](Self::advance).
    ///
    /// The start is snapped to the center of its block.
    ///
    /// # Errors
    ///
    /// [`SearchError::InvalidPolicy`] or [`SearchError::InvalidStart`].
    pub fn new(
        start: BotState,
        world: &'a dyn WorldView,
        expander: &'a GraphExpander,
        goal: &'a dyn GoalScorer,
        policy: &SearchPolicyV1,
    ) -> Result<Self, SearchError> {
        policy.validate()?;
        if !start.position.is_finite() {
            return Err(SearchError::InvalidStart {
                position: start.position.to_string(),
            });
        }
        let centered = Vec3d::block_center(start.position.block());
        let root = BotState {
            position: centered,
            cost: 0,
            produced_by: None,
            ..start
        };
        Ok(Self {
            world,
            expander,
            goal,
            policy: policy.clone(),
            root,
            reposition_first: centered != start.position,
            state: EpisodeState::Ready,
            frontier: BestFirstFrontier::new(),
            nodes: Vec::new(),
            next_creation_order: 0,
            stats: SearchStats::default(),
            started_at: None,
            last_progress_at: None,
            outcome: None,
        })
    }

    #[must_use]
    pub fn state(&self) -> EpisodeState {
        self.state
    }

    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Feet block the search starts from.
    #[must_use]
    pub fn start_block(&self) -> Vec3i {
        self.root.block()
    }

    #[must_use]
    pub fn reposition_first(&self) -> bool {
        self.reposition_first
    }

    /// Run at most `max_steps` iterations. Returns the state afterwards.
    ///
    /// A terminated episode is left untouched.
    pub fn advance(&mut self, cancel: &dyn CancelSignal, max_steps: u64) -> EpisodeState {
        if self.state == EpisodeState::Ready {
            self.begin();
        }
        let mut steps = 0;
        while self.state == EpisodeState::Running && steps < max_steps {
            self.step(cancel);
            steps += 1;
        }
        self.state
    }

    /// Run until the episode terminates.
    pub fn run(&mut self, cancel: &dyn CancelSignal) -> EpisodeState {
        self.advance(cancel, u64::MAX)
    }

    /// # Errors
    ///
    /// [`SearchError::EpisodeNotFinished`] if the episode is still `Ready`
    /// or `Running`.
    pub fn into_result(self) -> Result<SearchResult, SearchError> {
        match self.outcome {
            Some(outcome) => Ok(SearchResult {
                outcome,
                stats: self.stats,
            }),
            None => Err(SearchError::EpisodeNotFinished { state: self.state }),
        }
    }

    fn begin(&mut self) {
        let now = Instant::now();
        self.started_at = Some(now);
        self.last_progress_at = Some(now);
        self.state = EpisodeState::Running;

        let root = self.root;
        let Some(h) = guarded(|| self.goal.compute_score(&root)) else {
            self.fail(FailureReason::CollaboratorPanic(PanicStage::GoalScore));
            return;
        };
        debug!(
            goal = %self.goal.describe(),
            start = %root.block(),
            start_score = h,
            reposition_first = self.reposition_first,
            "search started"
        );
        self.push_node(None, root, 0, h);
    }

    fn step(&mut self, cancel: &dyn CancelSignal) {
        if cancel.is_cancelled() {
            self.terminate(EpisodeState::Cancelled, Err(SearchFailure::Cancelled));
            return;
        }
        if let Some(limit) = self.policy.timeout_ms {
            if self.elapsed() >= Duration::from_millis(limit) {
                self.fail(FailureReason::Timeout(BudgetKind::WallClock));
                return;
            }
        }
        if self.stats.expansions >= self.policy.max_expansions {
            self.fail(FailureReason::Timeout(BudgetKind::Expansions));
            return;
        }
        let Some(node_id) = self.frontier.pop() else {
            self.fail(FailureReason::Unreachable);
            return;
        };
        let node = self.nodes[node_id].clone();
        if !self.frontier.settle(node.block()) {
            // Superseded by a cheaper entry for the same block.
            return;
        }
        if node.h_cost < self.stats.closest_score {
            self.stats.closest_score = node.h_cost;
            self.stats.closest_position = node.block();
        }

        match guarded(|| self.goal.is_finished(&node.state)) {
            None => {
                self.fail(FailureReason::CollaboratorPanic(PanicStage::GoalCheck));
                return;
            }
            Some(true) => {
                let plan = self.reconstruct(node_id);
                self.terminate(EpisodeState::Succeeded, Ok(plan));
                return;
            }
            Some(false) => {}
        }

        let Some(expansion) = guarded(|| self.expander.expand(self.world, &node.state)) else {
            self.fail(FailureReason::CollaboratorPanic(PanicStage::Expand));
            return;
        };
        self.stats.expansions += 1;
        self.stats.block_lookups += expansion.block_lookups;
        self.stats.unresolved_lookups += expansion.unresolved_lookups;
        trace!(
            node = node_id,
            block = %node.block(),
            g = node.g_cost,
            h = node.h_cost,
            successors = expansion.successors.len(),
            "expand"
        );

        for successor in expansion.successors {
            if !self.policy.permits(successor.action) {
                continue;
            }
            if !self
                .frontier
                .offer(successor.state.block(), successor.state.cost)
            {
                continue;
            }
            let Some(h) = guarded(|| self.goal.compute_score(&successor.state)) else {
                self.fail(FailureReason::CollaboratorPanic(PanicStage::GoalScore));
                return;
            };
            self.push_node(Some(node_id), successor.state, node.depth + 1, h);
        }

        self.maybe_log_progress();
    }

    fn push_node(&mut self, parent_id: Option<usize>, state: BotState, depth: u32, h_cost: i64) {
        let node = SearchNode {
            node_id: self.nodes.len(),
            parent_id,
            state,
            depth,
            g_cost: state.cost,
            h_cost,
            creation_order: self.next_creation_order,
        };
        self.next_creation_order += 1;
        self.frontier.push(FrontierKey::from(&node), node.node_id);
        self.stats.frontier_high_water = self.frontier.high_water();
        self.stats.nodes_created += 1;
        self.nodes.push(node);
    }

    fn reconstruct(&self, goal_id: usize) -> PlanV1 {
        let mut steps = Vec::new();
        let mut cursor = &self.nodes[goal_id];
        while let Some(parent_id) = cursor.parent_id {
            let parent = &self.nodes[parent_id];
            if let Some(action) = cursor.state.produced_by {
                steps.push(PlanStepV1 {
                    action,
                    destination: cursor.block(),
                    cost: cursor.g_cost - parent.g_cost,
                });
            }
            cursor = parent;
        }
        steps.reverse();
        PlanV1 {
            start: self.root.block(),
            reposition_first: self.reposition_first,
            steps,
            total_cost: self.nodes[goal_id].g_cost,
        }
    }

    fn elapsed(&self) -> Duration {
        self.started_at.map_or(Duration::ZERO, |t| t.elapsed())
    }

    fn maybe_log_progress(&mut self) {
        let now = Instant::now();
        let interval = Duration::from_millis(self.policy.progress_log_interval_ms);
        let due = match self.last_progress_at {
            Some(last) => now.duration_since(last) >= interval,
            None => true,
        };
        if due {
            self.last_progress_at = Some(now);
            info!(
                expansions = self.stats.expansions,
                open = self.frontier.len(),
                closest = %self.stats.closest_position,
                closest_score = self.stats.closest_score,
                "search in progress"
            );
        }
    }

    fn fail(&mut self, reason: FailureReason) {
        self.terminate(EpisodeState::Failed(reason), Err(reason.into()));
    }

    fn terminate(&mut self, state: EpisodeState, outcome: Result<PlanV1, SearchFailure>) {
        self.stats.elapsed_ms = millis(self.elapsed());
        match &outcome {
            Ok(plan) => info!(
                steps = plan.len(),
                total_cost = plan.total_cost,
                expansions = self.stats.expansions,
                elapsed_ms = self.stats.elapsed_ms,
                "plan found"
            ),
            Err(failure) => info!(
                %failure,
                expansions = self.stats.expansions,
                elapsed_ms = self.stats.elapsed_ms,
                closest = %self.stats.closest_position,
                "search ended without a plan"
            ),
        }
        self.state = state;
        self.outcome = Some(outcome);
    }
}

/// Plan from `start` to `goal` in one call.
///
/// # Errors
///
/// Pre-flight errors from [`SearchEpisode::new`]. Search outcomes, failed
/// ones included, come back inside the `Ok` value.
pub fn search(
    start: BotState,
    world: &dyn WorldView,
    expander: &GraphExpander,
    goal: &dyn GoalScorer,
    policy: &SearchPolicyV1,
    cancel: &dyn CancelSignal,
) -> Result<SearchResult, SearchError> {
    let mut episode = SearchEpisode::new(start, world, expander, goal, policy)?;
    episode.run(cancel);
    episode.into_result()
}
