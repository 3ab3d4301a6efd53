//! End-to-end planning scenarios: movement rules seen through whole
//! searches over frozen snapshots.

use voxelpath_harness::runner::GoalSpec;
use voxelpath_harness::worlds::fixtures::{self, Fixture, FixtureExpectations};
use voxelpath_harness::worlds::snapshot::SnapshotBuilder;
use voxelpath_kernel::block::BlockState;
use voxelpath_kernel::geometry::{Direction, Vec3i};
use voxelpath_search::action::{ActionKind, GraphAction};
use voxelpath_search::cancel::NeverCancel;
use voxelpath_search::costs;
use voxelpath_search::expander::GraphExpander;
use voxelpath_search::outcome::{SearchFailure, SearchResult};
use voxelpath_search::policy::SearchPolicyV1;
use voxelpath_search::search::search;
use voxelpath_search::state::Capabilities;

fn plan_with(fixture: &Fixture, policy: &SearchPolicyV1) -> SearchResult {
    let expander = GraphExpander::new(&policy.expander_config());
    let goal = fixture.goal.build().expect("goal builds");
    search(
        fixture.start_state(),
        &fixture.world,
        &expander,
        goal.as_ref(),
        policy,
        &NeverCancel,
    )
    .expect("pre-flight passes")
}

fn plan(fixture: &Fixture) -> SearchResult {
    plan_with(fixture, &SearchPolicyV1::default())
}

fn cost_of(result: &SearchResult) -> i64 {
    result.plan().expect("plan found").total_cost
}

/// Stone floor over `-4..=4` on both axes, goal at `goal`.
fn open_floor(goal: Vec3i, extra: &[(Vec3i, Vec3i)]) -> Fixture {
    let mut builder = SnapshotBuilder::new(-4, 8).unwrap();
    builder
        .fill(Vec3i::new(-4, -1, -4), Vec3i::new(4, -1, 4), BlockState::Solid)
        .unwrap();
    for &(a, b) in extra {
        builder.fill(a, b, BlockState::Solid).unwrap();
    }
    Fixture {
        name: "open_floor".into(),
        world: builder.build(),
        start: Vec3i::ZERO,
        capabilities: Capabilities::WALK_ONLY,
        goal: GoalSpec::pos(goal),
        expectations: FixtureExpectations {
            reachable: true,
            optimal_cost: None,
        },
    }
}

#[test]
fn every_fixture_meets_its_expectations() {
    for fixture in fixtures::all().unwrap() {
        let result = plan(&fixture);
        assert_eq!(
            result.plan().is_some(),
            fixture.expectations.reachable,
            "{}: {:?}",
            fixture.name,
            result.failure()
        );
        if let Some(optimal) = fixture.expectations.optimal_cost {
            assert_eq!(cost_of(&result), optimal, "{}", fixture.name);
        }
        if !fixture.expectations.reachable {
            assert_eq!(result.failure(), Some(SearchFailure::Unreachable), "{}", fixture.name);
        }
    }
}

#[test]
fn flat_walk_is_five_straight_steps() {
    let result = plan(&fixtures::flat_plane(12).unwrap());
    let plan = result.plan().unwrap();
    assert_eq!(plan.len(), 5);
    assert_eq!(plan.total_cost, 5 * costs::STRAIGHT);
    for step in &plan.steps {
        assert_eq!(
            step.action,
            GraphAction::Straight {
                direction: Direction::East
            }
        );
    }
    assert_eq!(plan.destination(), Vec3i::new(5, 0, 0));
    assert!(!plan.reposition_first);
}

#[test]
fn single_straight_step() {
    let result = plan(&open_floor(Vec3i::new(0, 0, 1), &[]));
    let plan = result.plan().unwrap();
    assert_eq!(plan.len(), 1);
    assert_eq!(plan.total_cost, costs::STRAIGHT);
}

#[test]
fn diagonal_step_on_open_floor() {
    let result = plan(&open_floor(Vec3i::new(1, 0, 1), &[]));
    let plan = result.plan().unwrap();
    assert_eq!(plan.len(), 1);
    assert_eq!(plan.steps[0].action.kind(), ActionKind::Diagonal);
    assert_eq!(plan.total_cost, costs::DIAGONAL);
}

#[test]
fn blocked_side_cell_forbids_corner_cutting() {
    let wall = (Vec3i::new(1, 0, 0), Vec3i::new(1, 1, 0));
    let result = plan(&open_floor(Vec3i::new(1, 0, 1), &[wall]));
    let plan = result.plan().unwrap();
    assert_eq!(plan.total_cost, 2 * costs::STRAIGHT);
    assert!(plan
        .steps
        .iter()
        .all(|s| s.action.kind() == ActionKind::Straight));
}

#[test]
fn goal_on_unconnected_island_is_unreachable() {
    let mut builder = SnapshotBuilder::new(-4, 8).unwrap();
    builder
        .fill(Vec3i::new(-1, -1, -1), Vec3i::new(1, -1, 1), BlockState::Solid)
        .unwrap();
    builder
        .fill(Vec3i::new(6, -1, -1), Vec3i::new(8, -1, 1), BlockState::Solid)
        .unwrap();
    let fixture = Fixture {
        name: "islands".into(),
        world: builder.build(),
        start: Vec3i::ZERO,
        capabilities: Capabilities::WITH_TOOLS,
        goal: GoalSpec::pos(Vec3i::new(7, 0, 0)),
        expectations: FixtureExpectations {
            reachable: false,
            optimal_cost: None,
        },
    };
    let result = plan(&fixture);
    assert_eq!(result.failure(), Some(SearchFailure::Unreachable));
    assert!(result.stats.expansions > 0);
}

#[test]
fn sealed_goal_is_unreachable() {
    let result = plan(&fixtures::sealed_room().unwrap());
    assert_eq!(result.failure(), Some(SearchFailure::Unreachable));
    assert!(result.plan().is_none());
}

#[test]
fn one_block_step_up_is_climbable() {
    let result = plan(&fixtures::staircase(1, 1).unwrap());
    let plan = result.plan().unwrap();
    assert_eq!(plan.len(), 1);
    assert_eq!(plan.steps[0].action.kind(), ActionKind::Ascend);
    assert_eq!(plan.total_cost, costs::ASCEND);
}

#[test]
fn two_block_step_up_is_not() {
    let result = plan(&fixtures::staircase(2, 1).unwrap());
    assert_eq!(result.failure(), Some(SearchFailure::Unreachable));
}

#[test]
fn safe_falls_up_to_three_blocks() {
    for height in 1..=costs::MAX_SAFE_FALL {
        let result = plan(&fixtures::staircase(-i32::from(height), 1).unwrap());
        let plan = result.plan().unwrap();
        assert_eq!(
            plan.steps[0].action,
            GraphAction::Descend {
                direction: Direction::East,
                height
            }
        );
        assert_eq!(Some(plan.total_cost), costs::descend(height));
    }
}

#[test]
fn four_block_fall_is_refused() {
    let result = plan(&fixtures::staircase(-4, 1).unwrap());
    assert_eq!(result.failure(), Some(SearchFailure::Unreachable));
}

#[test]
fn policy_fall_limit_is_respected() {
    let policy = SearchPolicyV1 {
        max_fall_height: 2,
        ..SearchPolicyV1::default()
    };
    let fixture = fixtures::staircase(-3, 1).unwrap();
    assert_eq!(plan_with(&fixture, &policy).failure(), Some(SearchFailure::Unreachable));
    assert!(plan_with(&fixtures::staircase(-2, 2).unwrap(), &policy).plan().is_some());
}

#[test]
fn one_block_gap_is_jumped() {
    let result = plan(&fixtures::gap_course(1).unwrap());
    let plan = result.plan().unwrap();
    assert_eq!(
        plan.steps
            .iter()
            .filter(|s| s.action.kind() == ActionKind::Parkour)
            .count(),
        1
    );
    assert_eq!(plan.total_cost, 4 * costs::STRAIGHT + costs::ONE_GAP_JUMP);
}

#[test]
fn wider_gaps_and_disabled_parkour_are_unreachable() {
    assert_eq!(
        plan(&fixtures::gap_course(2).unwrap()).failure(),
        Some(SearchFailure::Unreachable)
    );
    let no_parkour = SearchPolicyV1 {
        allow_parkour: false,
        ..SearchPolicyV1::default()
    };
    assert_eq!(
        plan_with(&fixtures::gap_course(1).unwrap(), &no_parkour).failure(),
        Some(SearchFailure::Unreachable)
    );
}

#[test]
fn breakable_wall_is_mined_through() {
    let fixture = fixtures::breakable_wall(30, false).unwrap();
    let result = plan(&fixture);
    let plan = result.plan().unwrap();
    let breaks: Vec<_> = plan
        .steps
        .iter()
        .filter(|s| s.action.kind() == ActionKind::BreakAssisted)
        .collect();
    assert_eq!(breaks.len(), 1);
    assert_eq!(breaks[0].destination, Vec3i::new(3, 0, 0));
    assert_eq!(breaks[0].cost, costs::STRAIGHT + 2 * costs::break_block(30));
    assert_eq!(Some(plan.total_cost), fixture.expectations.optimal_cost);
}

#[test]
fn breaking_needs_tools_and_policy() {
    let mut no_tools = fixtures::breakable_wall(30, false).unwrap();
    no_tools.capabilities = Capabilities::WALK_ONLY;
    assert_eq!(plan(&no_tools).failure(), Some(SearchFailure::Unreachable));

    let no_breaking = SearchPolicyV1 {
        allow_block_breaking: false,
        ..SearchPolicyV1::default()
    };
    assert_eq!(
        plan_with(&fixtures::breakable_wall(30, false).unwrap(), &no_breaking).failure(),
        Some(SearchFailure::Unreachable)
    );
}

#[test]
fn wall_under_lava_is_left_alone() {
    let result = plan(&fixtures::breakable_wall(30, true).unwrap());
    assert_eq!(result.failure(), Some(SearchFailure::Unreachable));
}

#[test]
fn maze_takes_the_corridor() {
    let fixture = fixtures::maze().unwrap();
    let result = plan(&fixture);
    let plan = result.plan().unwrap();
    assert_eq!(plan.total_cost, 14 * costs::STRAIGHT);
    assert_eq!(plan.destination(), Vec3i::new(7, 0, 5));
}
