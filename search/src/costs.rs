//! Movement cost constants.
//!
//! Costs are integers in units where walking one block costs [`STRAIGHT`].
//! Durations measured in game ticks convert at 20 ticks per second and a
//! walking speed of 4.317 blocks per second, rounded up, so one tick is
//! worth `4.317 / 20 * 1000 = 215.85` units.
//!
//! Every action cost is at least `STRAIGHT` times the larger of its
//! horizontal Euclidean displacement and its vertical displacement. The
//! goal heuristics in [`crate::goal`] depend on that floor.

/// One block of flat walking.
pub const STRAIGHT: i64 = 1000;

/// One block diagonally. `ceil(sqrt(2) * STRAIGHT)`.
pub const DIAGONAL: i64 = 1415;

/// Extra time for jumping up one block.
pub const JUMP_UP_BLOCK: i64 = ticks_cost(900);

/// Airtime of a running jump that clears a one-block gap.
pub const JUMP_LAND_GROUND: i64 = ticks_cost(1200);

/// Extra time spent falling `h` blocks, indexed by `h - 1`.
pub const FALL: [i64; 3] = [ticks_cost(563), ticks_cost(779), ticks_cost(948)];

/// Highest fall that costs no health.
pub const MAX_SAFE_FALL: u8 = 3;

/// Fixed overhead added to every broken block (tool swap, hand swing).
pub const BREAK_BLOCK_ADDITION: i64 = 2000;

/// Stepping up onto the next block.
pub const ASCEND: i64 = STRAIGHT + JUMP_UP_BLOCK;

/// Jumping over a one-block gap, landing two blocks out.
pub const ONE_GAP_JUMP: i64 = JUMP_LAND_GROUND + 2 * STRAIGHT;

const CENTITICK_NUMERATOR: i64 = 4317;
const CENTITICK_DENOMINATOR: i64 = 2000;

/// Cost of a duration given in hundredths of a tick, rounded up.
#[must_use]
pub const fn ticks_cost(centiticks: i64) -> i64 {
    (centiticks * CENTITICK_NUMERATOR + CENTITICK_DENOMINATOR - 1) / CENTITICK_DENOMINATOR
}

/// Cost of stepping off a ledge and falling `height` blocks, or `None`
/// outside `1..=MAX_SAFE_FALL`.
#[must_use]
pub fn descend(height: u8) -> Option<i64> {
    let fall = FALL.get(usize::from(height).checked_sub(1)?)?;
    Some(STRAIGHT + fall)
}

/// Cost of mining a block that takes `break_ticks` ticks.
#[must_use]
pub fn break_block(break_ticks: u16) -> i64 {
    ticks_cost(i64::from(break_ticks) * 100) + BREAK_BLOCK_ADDITION
}
