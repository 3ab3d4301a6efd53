//! Cooperative cancellation, budgets and resumable episodes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::Duration;

use voxelpath_harness::worlds::fixtures::{self, Fixture};
use voxelpath_search::cancel::{CancelSignal, CancellationToken, NeverCancel};
use voxelpath_search::expander::GraphExpander;
use voxelpath_kernel::block::BlockState;
use voxelpath_kernel::geometry::{Vec3d, Vec3i};
use voxelpath_kernel::world::WorldView;
use voxelpath_search::goal::{GoalScorer, XzGoal};
use voxelpath_search::outcome::{BudgetKind, EpisodeState, SearchFailure};
use voxelpath_search::policy::SearchPolicyV1;
use voxelpath_search::search::{search, SearchEpisode};
use voxelpath_search::state::{BotState, Capabilities};

/// Fires once it has been polled `remaining` times.
struct Countdown {
    remaining: AtomicU64,
}

impl Countdown {
    fn new(polls: u64) -> Self {
        Self {
            remaining: AtomicU64::new(polls),
        }
    }
}

impl CancelSignal for Countdown {
    fn is_cancelled(&self) -> bool {
        self.remaining
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1))
            .is_err()
    }
}

/// Endless floor at y = -1 that sleeps on every block read.
struct SlowPlain {
    delay: Duration,
    reads: AtomicU64,
}

impl WorldView for SlowPlain {
    fn lookup_block(&self, pos: Vec3i) -> Option<BlockState> {
        thread::sleep(self.delay);
        self.reads.fetch_add(1, Ordering::Relaxed);
        Some(if pos.y < 0 {
            BlockState::Solid
        } else {
            BlockState::Air
        })
    }
}

fn goal_of(fixture: &Fixture) -> Box<dyn GoalScorer> {
    fixture.goal.build().unwrap()
}

#[test]
fn countdown_cancel_bounds_expansions() {
    let fixture = fixtures::sealed_room().unwrap();
    let policy = SearchPolicyV1::default();
    let expander = GraphExpander::new(&policy.expander_config());
    for polls in [0, 1, 10, 50] {
        let result = search(
            fixture.start_state(),
            &fixture.world,
            &expander,
            goal_of(&fixture).as_ref(),
            &policy,
            &Countdown::new(polls),
        )
        .unwrap();
        assert_eq!(result.failure(), Some(SearchFailure::Cancelled), "polls={polls}");
        assert!(result.plan().is_none());
        assert!(
            result.stats.expansions <= polls,
            "polls={polls} expansions={}",
            result.stats.expansions
        );
    }
}

#[test]
fn cancel_between_slices_stops_without_more_work() {
    let fixture = fixtures::sealed_room().unwrap();
    let policy = SearchPolicyV1::default();
    let expander = GraphExpander::new(&policy.expander_config());
    let goal = goal_of(&fixture);
    let mut episode = SearchEpisode::new(
        fixture.start_state(),
        &fixture.world,
        &expander,
        goal.as_ref(),
        &policy,
    )
    .unwrap();

    assert_eq!(episode.advance(&NeverCancel, 20), EpisodeState::Running);
    let done_so_far = episode.stats().expansions;
    assert!(done_so_far > 0);

    let token = CancellationToken::new();
    let observer = token.clone();
    token.cancel();
    assert!(observer.is_cancelled());
    assert_eq!(episode.run(&observer), EpisodeState::Cancelled);
    assert_eq!(episode.stats().expansions, done_so_far);

    let result = episode.into_result().unwrap();
    assert_eq!(result.failure(), Some(SearchFailure::Cancelled));
}

#[test]
fn terminated_episode_ignores_further_advances() {
    let fixture = fixtures::flat_plane(12).unwrap();
    let policy = SearchPolicyV1::default();
    let expander = GraphExpander::new(&policy.expander_config());
    let goal = goal_of(&fixture);
    let mut episode = SearchEpisode::new(
        fixture.start_state(),
        &fixture.world,
        &expander,
        goal.as_ref(),
        &policy,
    )
    .unwrap();
    assert_eq!(episode.run(&NeverCancel), EpisodeState::Succeeded);
    let token = CancellationToken::new();
    token.cancel();
    assert_eq!(episode.advance(&token, 10), EpisodeState::Succeeded);
    assert!(episode.into_result().unwrap().plan().is_some());
}

#[test]
fn expansion_budget_is_a_timeout() {
    let fixture = fixtures::sealed_room().unwrap();
    let policy = SearchPolicyV1 {
        max_expansions: 7,
        ..SearchPolicyV1::default()
    };
    let expander = GraphExpander::new(&policy.expander_config());
    let result = search(
        fixture.start_state(),
        &fixture.world,
        &expander,
        goal_of(&fixture).as_ref(),
        &policy,
        &NeverCancel,
    )
    .unwrap();
    assert_eq!(
        result.failure(),
        Some(SearchFailure::Timeout {
            budget: BudgetKind::Expansions
        })
    );
    assert_eq!(result.stats.expansions, 7);
}

#[test]
fn wall_clock_budget_is_a_timeout() {
    let world = SlowPlain {
        delay: Duration::from_micros(200),
        reads: AtomicU64::new(0),
    };
    let policy = SearchPolicyV1 {
        timeout_ms: Some(50),
        max_expansions: 1_000_000,
        ..SearchPolicyV1::default()
    };
    let expander = GraphExpander::new(&policy.expander_config());
    let goal = XzGoal::new(1000.0, 0.0).unwrap();
    let start = BotState::spawn(Vec3d::block_center(Vec3i::ZERO), Capabilities::WALK_ONLY);

    let result = search(start, &world, &expander, &goal, &policy, &NeverCancel).unwrap();

    assert_eq!(
        result.failure(),
        Some(SearchFailure::Timeout {
            budget: BudgetKind::WallClock
        })
    );
    assert!(result.plan().is_none());
    assert!(result.stats.expansions > 0);
    assert!(result.stats.expansions < policy.max_expansions);
    assert!(result.stats.elapsed_ms >= 50, "elapsed_ms={}", result.stats.elapsed_ms);
    assert!(world.reads.load(Ordering::Relaxed) > 0);
}
