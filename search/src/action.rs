//! Movement action catalog.
//!
//! A [`GraphAction`] is a stateless template: a movement kind plus its
//! direction. Templates declare their subscriptions once, judge each
//! resolved block through [`GraphAction::process_block`], and price the
//! step in [`GraphAction::finish`].
//!
//! Offsets are relative to the bot's feet block. Below, `d` is the action's
//! direction offset and `r` is `d` rotated right.

use serde::{Deserialize, Serialize};
use tracing::trace;
use voxelpath_kernel::block::BlockState;
use voxelpath_kernel::geometry::{Direction, Vec3i};

use crate::costs;
use crate::expander::ExpanderConfig;
use crate::subscription::{
    ActionEval, BlockCheck, ExpandContext, Subscription, SubscriptionRegistrar, Verdict,
};

/// Movement kind, without direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Straight,
    Diagonal,
    Ascend,
    Descend,
    Parkour,
    BreakAssisted,
}

/// One directed movement template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GraphAction {
    /// Walk one block forward on the same level.
    Straight { direction: Direction },
    /// Walk one block forward and one to the right.
    Diagonal { direction: Direction },
    /// Jump up onto the next block.
    Ascend { direction: Direction },
    /// Step off a ledge and fall `height` blocks.
    Descend { direction: Direction, height: u8 },
    /// Running jump across a one-block gap.
    Parkour { direction: Direction },
    /// Walk forward after mining the feet and/or head block in the way.
    BreakAssisted { direction: Direction },
}

impl GraphAction {
    #[must_use]
    pub const fn kind(self) -> ActionKind {
        match self {
            Self::Straight { .. } => ActionKind::Straight,
            Self::Diagonal { .. } => ActionKind::Diagonal,
            Self::Ascend { .. } => ActionKind::Ascend,
            Self::Descend { .. } => ActionKind::Descend,
            Self::Parkour { .. } => ActionKind::Parkour,
            Self::BreakAssisted { .. } => ActionKind::BreakAssisted,
        }
    }

    #[must_use]
    pub const fn direction(self) -> Direction {
        match self {
            Self::Straight { direction }
            | Self::Diagonal { direction }
            | Self::Ascend { direction }
            | Self::Descend { direction, .. }
            | Self::Parkour { direction }
            | Self::BreakAssisted { direction } => direction,
        }
    }

    /// Where the feet end up, relative to where they started.
    #[must_use]
    pub fn displacement(self) -> Vec3i {
        let d = self.direction().offset();
        match self {
            Self::Straight { .. } | Self::BreakAssisted { .. } => d,
            Self::Diagonal { direction } => d + direction.rotate_right().offset(),
            Self::Ascend { .. } => d.up(1),
            Self::Descend { height, .. } => d.down(i32::from(height)),
            Self::Parkour { .. } => d.scale(2),
        }
    }

    /// Register this template's cell requirements, in evaluation order.
    pub fn subscribe(&self, registrar: &mut SubscriptionRegistrar) {
        use BlockCheck::{BreakSafety, Clearable, Floor, Free, Gap};

        let d = self.direction().offset();
        match *self {
            Self::Straight { .. } => {
                registrar.subscribe(d, Free);
                registrar.subscribe(d.up(1), Free);
                registrar.subscribe(d.down(1), Floor);
            }
            Self::Diagonal { direction } => {
                let r = direction.rotate_right().offset();
                let corner = d + r;
                for side in [d, r, corner] {
                    registrar.subscribe(side, Free);
                    registrar.subscribe(side.up(1), Free);
                }
                registrar.subscribe(corner.down(1), Floor);
            }
            Self::Ascend { .. } => {
                registrar.subscribe(Vec3i::ZERO.up(2), Free);
                registrar.subscribe(d.up(1), Free);
                registrar.subscribe(d.up(2), Free);
                registrar.subscribe(d, Floor);
            }
            Self::Descend { height, .. } => {
                let height = i32::from(height);
                registrar.subscribe(d.up(1), Free);
                registrar.subscribe(d, Free);
                for depth in 1..=height {
                    registrar.subscribe(d.down(depth), Free);
                }
                registrar.subscribe(d.down(height + 1), Floor);
            }
            Self::Parkour { .. } => {
                let far = d.scale(2);
                registrar.subscribe(Vec3i::ZERO.up(2), Free);
                for column in [d, far] {
                    registrar.subscribe(column, Free);
                    registrar.subscribe(column.up(1), Free);
                    registrar.subscribe(column.up(2), Free);
                }
                registrar.subscribe(d.down(1), Gap);
                registrar.subscribe(far.down(1), Floor);
            }
            Self::BreakAssisted { .. } => {
                registrar.subscribe(d, Clearable { slot: 0 });
                registrar.subscribe(d.up(1), Clearable { slot: 1 });
                registrar.subscribe(d.down(1), Floor);
                registrar.subscribe(d.up(2), BreakSafety { slot: 1 });
                registrar.subscribe(d.scale(2), BreakSafety { slot: 0 });
                registrar.subscribe(d.scale(2).up(1), BreakSafety { slot: 1 });
            }
        }
    }

    /// Declared subscriptions as a fresh list.
    #[must_use]
    pub fn subscriptions(&self) -> Vec<Subscription> {
        let mut registrar = SubscriptionRegistrar::new();
        self.subscribe(&mut registrar);
        registrar.into_subscriptions()
    }

    /// Judge one resolved block against one of this template's subscriptions.
    pub fn process_block(
        &self,
        ctx: &ExpandContext,
        eval: &mut ActionEval,
        subscription: &Subscription,
        block: BlockState,
        absolute: Vec3i,
    ) -> Verdict {
        match self {
            Self::BreakAssisted { .. } => {
                break_handler(ctx, eval, subscription.check, block, absolute)
            }
            Self::Straight { .. }
            | Self::Diagonal { .. }
            | Self::Ascend { .. }
            | Self::Descend { .. }
            | Self::Parkour { .. } => movement_handler(subscription.check, block),
        }
    }

    /// Step cost once every subscription answered `Continue`.
    ///
    /// `None` means the action adds nothing over a cheaper template, or is a
    /// fall outside the safe range, and yields no successor.
    #[must_use]
    pub fn finish(&self, eval: &ActionEval) -> Option<i64> {
        match *self {
            Self::Straight { .. } => Some(costs::STRAIGHT),
            Self::Diagonal { .. } => Some(costs::DIAGONAL),
            Self::Ascend { .. } => Some(costs::ASCEND),
            Self::Descend { height, .. } => costs::descend(height),
            Self::Parkour { .. } => Some(costs::ONE_GAP_JUMP),
            Self::BreakAssisted { .. } => {
                (eval.blocks_broken() > 0).then(|| costs::STRAIGHT + eval.break_cost())
            }
        }
    }
}

fn movement_handler(check: BlockCheck, block: BlockState) -> Verdict {
    match check {
        BlockCheck::Free => Verdict::from_bool(block.is_passable()),
        BlockCheck::Floor => Verdict::from_bool(block.is_safe_to_stand_on()),
        BlockCheck::Gap => Verdict::from_bool(!block.is_safe_to_stand_on()),
        // Plain moves never clear anything.
        BlockCheck::Clearable { .. } | BlockCheck::BreakSafety { .. } => Verdict::Impossible,
    }
}

fn break_handler(
    ctx: &ExpandContext,
    eval: &mut ActionEval,
    check: BlockCheck,
    block: BlockState,
    absolute: Vec3i,
) -> Verdict {
    match check {
        BlockCheck::Free | BlockCheck::Floor | BlockCheck::Gap => movement_handler(check, block),
        BlockCheck::Clearable { slot } => match block {
            BlockState::Air => Verdict::Continue,
            BlockState::Breakable { break_ticks } if ctx.may_break() => {
                trace!(%absolute, break_ticks, slot, "break planned");
                eval.record_break(slot, break_ticks);
                Verdict::Continue
            }
            BlockState::Breakable { .. } | BlockState::Solid | BlockState::Hazard => {
                Verdict::Impossible
            }
        },
        BlockCheck::BreakSafety { slot } => {
            Verdict::from_bool(!(eval.was_broken(slot) && block.is_hazard()))
        }
    }
}

/// Every enabled template, grouped by kind, each kind in [`Direction::ALL`]
/// order.
#[must_use]
pub fn catalog(options: &ExpanderConfig) -> Vec<GraphAction> {
    let max_fall = options.max_fall_height.clamp(1, costs::MAX_SAFE_FALL);
    let mut actions = Vec::new();
    for direction in Direction::ALL {
        actions.push(GraphAction::Straight { direction });
    }
    if options.allow_diagonal {
        for direction in Direction::ALL {
            actions.push(GraphAction::Diagonal { direction });
        }
    }
    for direction in Direction::ALL {
        actions.push(GraphAction::Ascend { direction });
    }
    for height in 1..=max_fall {
        for direction in Direction::ALL {
            actions.push(GraphAction::Descend { direction, height });
        }
    }
    if options.allow_parkour {
        for direction in Direction::ALL {
            actions.push(GraphAction::Parkour { direction });
        }
    }
    if options.allow_block_breaking {
        for direction in Direction::ALL {
            actions.push(GraphAction::BreakAssisted { direction });
        }
    }
    actions
}
