//! Shared helpers for voxelpath benchmark suites.

use voxelpath_harness::runner::GoalSpec;
use voxelpath_harness::worlds::fixtures::{Fixture, FixtureExpectations};
use voxelpath_harness::worlds::snapshot::SnapshotBuilder;
use voxelpath_kernel::block::BlockState;
use voxelpath_kernel::geometry::Vec3i;
use voxelpath_search::cancel::NeverCancel;
use voxelpath_search::expander::GraphExpander;
use voxelpath_search::goal::GoalScorer;
use voxelpath_search::outcome::SearchResult;
use voxelpath_search::policy::SearchPolicyV1;
use voxelpath_search::search::search;

/// Prepared inputs for calling `search()` directly, bypassing the runner.
pub struct SearchSetup {
    pub policy: SearchPolicyV1,
    pub expander: GraphExpander,
    pub goal: Box<dyn GoalScorer>,
}

/// Build the goal and expander once for a fixture.
///
/// # Panics
///
/// Panics if the fixture's goal is invalid. Benchmark setup failures are
/// fatal.
#[must_use]
pub fn prepare_search_setup(fixture: &Fixture, policy: &SearchPolicyV1) -> SearchSetup {
    SearchSetup {
        policy: policy.clone(),
        expander: GraphExpander::new(&policy.expander_config()),
        goal: fixture.goal.build().expect("fixture goal builds"),
    }
}

/// Run `search()` with prepared setup.
///
/// # Panics
///
/// Panics on a pre-flight error. Benchmark inputs are expected to be valid.
#[must_use]
pub fn run_search_only(setup: &SearchSetup, fixture: &Fixture) -> SearchResult {
    search(
        fixture.start_state(),
        &fixture.world,
        &setup.expander,
        setup.goal.as_ref(),
        &setup.policy,
        &NeverCancel,
    )
    .expect("search pre-flight")
}

/// A `size` x `size` floor scattered with two-high pillars on a fixed
/// pattern, goal in the far corner. Wide enough to put real pressure on
/// the frontier.
///
/// # Panics
///
/// Panics if the snapshot cannot be built.
#[must_use]
pub fn pillar_field(size: i32) -> Fixture {
    let mut builder = SnapshotBuilder::new(-4, 8).expect("height range");
    builder
        .fill(Vec3i::new(0, -1, 0), Vec3i::new(size - 1, -1, size - 1), BlockState::Solid)
        .expect("floor");
    for x in (2..size - 1).step_by(3) {
        for z in 0..size - 1 {
            if (x * 7 + z * 13) % 5 != 0 {
                builder
                    .fill(Vec3i::new(x, 0, z), Vec3i::new(x, 1, z), BlockState::Solid)
                    .expect("pillar");
            }
        }
    }
    Fixture {
        name: format!("pillar_field_{size}"),
        world: builder.build(),
        start: Vec3i::ZERO,
        capabilities: voxelpath_search::state::Capabilities::WALK_ONLY,
        goal: GoalSpec::pos(Vec3i::new(size - 1, 0, size - 1)),
        expectations: FixtureExpectations {
            reachable: true,
            optimal_cost: None,
        },
    }
}
