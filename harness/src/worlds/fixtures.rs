//! Canned fixture worlds.
//!
//! Each constructor returns a matched `(world, start, goal, expectations)`
//! bundle so tests and benchmarks never pair a world with the wrong goal.
//! Expected costs are derived from [`voxelpath_search::costs`], not
//! hard-coded.

use voxelpath_kernel::block::BlockState;
use voxelpath_kernel::geometry::{Vec3d, Vec3i};
use voxelpath_search::costs;
use voxelpath_search::state::{BotState, Capabilities};

use super::snapshot::{ChunkedSnapshot, SnapshotBuilder, SnapshotError};
use crate::runner::{GoalSpec, PlanRequest};

/// What a correct search must report on a fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixtureExpectations {
    pub reachable: bool,
    /// Known optimum, when the layout makes it easy to state.
    pub optimal_cost: Option<i64>,
}

impl FixtureExpectations {
    const UNREACHABLE: Self = Self {
        reachable: false,
        optimal_cost: None,
    };

    const fn optimal(cost: i64) -> Self {
        Self {
            reachable: true,
            optimal_cost: Some(cost),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Fixture {
    pub name: String,
    pub world: ChunkedSnapshot,
    pub start: Vec3i,
    pub capabilities: Capabilities,
    pub goal: GoalSpec,
    pub expectations: FixtureExpectations,
}

impl Fixture {
    #[must_use]
    pub fn request(&self, bot_id: impl Into<String>) -> PlanRequest {
        PlanRequest::at_block(bot_id, self.start, self.capabilities, self.goal.clone())
    }

    #[must_use]
    pub fn start_state(&self) -> BotState {
        BotState::spawn(Vec3d::block_center(self.start), self.capabilities)
    }
}

const STONE: BlockState = BlockState::Solid;

/// Open stone floor at `y = -1` over `[-radius, radius]` on both axes.
///
/// Goal: column `(5, 0)`. Five straight steps east.
///
/// # Errors
///
/// Never for `radius` in `i32` range; the signature matches the other
/// constructors.
pub fn flat_plane(radius: i32) -> Result<Fixture, SnapshotError> {
    let world = plane(radius)?.build();
    Ok(Fixture {
        name: format!("flat_plane_{radius}"),
        world,
        start: Vec3i::ZERO,
        capabilities: Capabilities::WALK_ONLY,
        goal: GoalSpec::Xz { x: 5.0, z: 0.0 },
        expectations: FixtureExpectations::optimal(5 * costs::STRAIGHT),
    })
}

fn plane(radius: i32) -> Result<SnapshotBuilder, SnapshotError> {
    let mut builder = SnapshotBuilder::new(-4, 8)?;
    builder.fill(
        Vec3i::new(-radius, -1, -radius),
        Vec3i::new(radius, -1, radius),
        STONE,
    )?;
    Ok(builder)
}

/// Flat plane with the goal block boxed in by unbreakable walls and a
/// ceiling.
///
/// # Errors
///
/// Propagates builder errors.
pub fn sealed_room() -> Result<Fixture, SnapshotError> {
    let goal = Vec3i::new(6, 0, 0);
    let mut builder = plane(10)?;
    for side in [
        Vec3i::new(1, 0, 0),
        Vec3i::new(-1, 0, 0),
        Vec3i::new(0, 0, 1),
        Vec3i::new(0, 0, -1),
    ] {
        builder.fill(goal + side, (goal + side).up(2), STONE)?;
    }
    builder.set(goal.up(2), STONE)?;
    Ok(Fixture {
        name: "sealed_room".into(),
        world: builder.build(),
        start: Vec3i::ZERO,
        capabilities: Capabilities::WITH_TOOLS,
        goal: GoalSpec::pos(goal),
        expectations: FixtureExpectations::UNREACHABLE,
    })
}

/// One-block-wide walkway along `z = 0` with a hole of `gap_len` blocks
/// starting at `x = 3`. Only one-block holes can be jumped.
///
/// # Errors
///
/// Propagates builder errors.
pub fn gap_course(gap_len: i32) -> Result<Fixture, SnapshotError> {
    let gap_len = gap_len.max(0);
    let end = 5 + gap_len;
    let mut builder = SnapshotBuilder::new(-4, 8)?;
    for x in 0..=end {
        if !(3..3 + gap_len).contains(&x) {
            builder.set(Vec3i::new(x, -1, 0), STONE)?;
        }
    }
    let expectations = match gap_len {
        0 => FixtureExpectations::optimal(i64::from(end) * costs::STRAIGHT),
        1 => FixtureExpectations::optimal(4 * costs::STRAIGHT + costs::ONE_GAP_JUMP),
        _ => FixtureExpectations::UNREACHABLE,
    };
    Ok(Fixture {
        name: format!("gap_course_{gap_len}"),
        world: builder.build(),
        start: Vec3i::ZERO,
        capabilities: Capabilities::WALK_ONLY,
        goal: GoalSpec::pos(Vec3i::new(end, 0, 0)),
        expectations,
    })
}

/// A one-wide staircase along `z = 0`: `steps` pillars, each `rise` blocks
/// higher than the last (negative `rise` descends). Climbable while
/// `rise <= 1`; descendable while the drop is a safe fall.
///
/// # Errors
///
/// Propagates builder errors.
pub fn staircase(rise: i32, steps: i32) -> Result<Fixture, SnapshotError> {
    let steps = steps.max(1);
    let last_top = steps * rise - 1;
    let min_y = (-1).min(last_top) - 2;
    let max_y = (-1).max(last_top) + 4;
    let mut builder = SnapshotBuilder::new(min_y, max_y)?;
    for i in 0..=steps {
        let top = i * rise - 1;
        builder.fill(Vec3i::new(i, min_y, 0), Vec3i::new(i, top, 0), STONE)?;
    }

    let drop = rise.unsigned_abs();
    let per_step = match rise {
        0 => Some(costs::STRAIGHT),
        1 => Some(costs::ASCEND),
        r if r < 0 && drop <= u32::from(costs::MAX_SAFE_FALL) => {
            u8::try_from(drop).ok().and_then(costs::descend)
        }
        _ => None,
    };
    let expectations = per_step.map_or(FixtureExpectations::UNREACHABLE, |cost| {
        FixtureExpectations::optimal(i64::from(steps) * cost)
    });
    Ok(Fixture {
        name: format!("staircase_{rise}x{steps}"),
        world: builder.build(),
        start: Vec3i::ZERO,
        capabilities: Capabilities::WALK_ONLY,
        goal: GoalSpec::pos(Vec3i::new(steps, steps * rise, 0)),
        expectations,
    })
}

/// Enclosed corridor along `z = 0` from `x = 0` to `x = 6`, blocked at
/// `x = 3` by a two-high breakable wall. With `hazard_above`, lava sits
/// over the wall's head block, so breaking through is unsafe.
///
/// # Errors
///
/// Propagates builder errors.
pub fn breakable_wall(break_ticks: u16, hazard_above: bool) -> Result<Fixture, SnapshotError> {
    let mut builder = SnapshotBuilder::new(-4, 8)?;
    builder.fill(Vec3i::new(-1, -1, -1), Vec3i::new(7, -1, 1), STONE)?;
    builder.fill(Vec3i::new(-1, 0, -1), Vec3i::new(7, 2, -1), STONE)?;
    builder.fill(Vec3i::new(-1, 0, 1), Vec3i::new(7, 2, 1), STONE)?;
    builder.fill(Vec3i::new(-1, 0, 0), Vec3i::new(-1, 2, 0), STONE)?;
    builder.fill(Vec3i::new(7, 0, 0), Vec3i::new(7, 2, 0), STONE)?;
    builder.fill(Vec3i::new(0, 2, 0), Vec3i::new(6, 2, 0), STONE)?;
    let wall = BlockState::Breakable { break_ticks };
    builder.fill(Vec3i::new(3, 0, 0), Vec3i::new(3, 1, 0), wall)?;
    if hazard_above {
        builder.set(Vec3i::new(3, 2, 0), BlockState::Hazard)?;
    }

    let expectations = if hazard_above {
        FixtureExpectations::UNREACHABLE
    } else {
        FixtureExpectations::optimal(6 * costs::STRAIGHT + 2 * costs::break_block(break_ticks))
    };
    Ok(Fixture {
        name: format!("breakable_wall_{break_ticks}_{hazard_above}"),
        world: builder.build(),
        start: Vec3i::ZERO,
        capabilities: Capabilities::WITH_TOOLS,
        goal: GoalSpec::pos(Vec3i::new(6, 0, 0)),
        expectations,
    })
}

/// Rows are `z`, columns are `x`. `#` is a two-high stone wall.
const MAZE: [&str; 7] = [
    "#########",
    "#S..#...#",
    "#.#.#.#.#",
    "#.#...#.#",
    "#.#####.#",
    "#...#..G#",
    "#########",
];

/// Small walled maze with a single 14-step corridor route.
///
/// # Errors
///
/// Propagates builder errors.
pub fn maze() -> Result<Fixture, SnapshotError> {
    let mut builder = SnapshotBuilder::new(-4, 8)?;
    let mut start = Vec3i::ZERO;
    let mut goal = Vec3i::ZERO;
    for (z, row) in (0i32..).zip(MAZE) {
        for (x, cell) in (0i32..).zip(row.chars()) {
            let floor = Vec3i::new(x, -1, z);
            builder.set(floor, STONE)?;
            match cell {
                '#' => {
                    builder.fill(floor.up(1), floor.up(2), STONE)?;
                }
                'S' => start = floor.up(1),
                'G' => goal = floor.up(1),
                _ => {}
            }
        }
    }
    Ok(Fixture {
        name: "maze".into(),
        world: builder.build(),
        start,
        capabilities: Capabilities::WALK_ONLY,
        goal: GoalSpec::pos(goal),
        expectations: FixtureExpectations::optimal(14 * costs::STRAIGHT),
    })
}

/// Every fixture, for sweeps.
///
/// # Errors
///
/// Propagates builder errors.
pub fn all() -> Result<Vec<Fixture>, SnapshotError> {
    Ok(vec![
        flat_plane(12)?,
        sealed_room()?,
        gap_course(1)?,
        gap_course(2)?,
        staircase(1, 4)?,
        staircase(-3, 3)?,
        staircase(2, 2)?,
        breakable_wall(30, false)?,
        breakable_wall(30, true)?,
        maze()?,
    ])
}
