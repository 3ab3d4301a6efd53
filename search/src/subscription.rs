//! Subscription protocol between movement actions and the expander.
//!
//! Each action template declares, once, the relative cells it depends on and
//! what it needs from each one. The expander resolves those cells against
//! the world and feeds every block back to the action's handler, which
//! answers [`Verdict::Continue`] or [`Verdict::Impossible`].

use serde::Serialize;
use voxelpath_kernel::geometry::Vec3i;

use crate::costs;
use crate::state::Capabilities;

/// Number of cells a single action may break.
pub const MAX_BREAK_SLOTS: usize = 2;

/// Answer of an action handler for one subscribed cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Continue,
    Impossible,
}

impl Verdict {
    #[must_use]
    pub const fn from_bool(ok: bool) -> Self {
        if ok {
            Self::Continue
        } else {
            Self::Impossible
        }
    }
}

/// Requirement placed on a subscribed cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "check", rename_all = "snake_case")]
pub enum BlockCheck {
    /// Must be passable.
    Free,
    /// Must be safe to stand on.
    Floor,
    /// Must not be safe to stand on.
    Gap,
    /// Passable, or breakable when breaking is allowed. A break is recorded
    /// in `slot`.
    Clearable { slot: u8 },
    /// If `slot` was broken, this neighbour must not be a hazard.
    BreakSafety { slot: u8 },
}

/// One declared dependency of an action template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Subscription {
    /// Relative to the bot's feet block.
    pub offset: Vec3i,
    pub check: BlockCheck,
}

/// Collects subscriptions in declaration order.
#[derive(Debug, Default)]
pub struct SubscriptionRegistrar {
    subscriptions: Vec<Subscription>,
}

impl SubscriptionRegistrar {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, offset: Vec3i, check: BlockCheck) {
        self.subscriptions.push(Subscription { offset, check });
    }

    #[must_use]
    pub fn into_subscriptions(self) -> Vec<Subscription> {
        self.subscriptions
    }
}

/// Inputs shared by every handler call within one expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpandContext {
    pub capabilities: Capabilities,
    /// Policy switch; breaking also requires the capability.
    pub allow_block_breaking: bool,
}

impl ExpandContext {
    #[must_use]
    pub const fn may_break(&self) -> bool {
        self.allow_block_breaking && self.capabilities.can_break_blocks
    }
}

/// Scratch state for evaluating one action once.
///
/// Created fresh for every `(action, expansion)` pair and discarded after
/// [`crate::action::GraphAction::finish`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionEval {
    broken: [Option<u16>; MAX_BREAK_SLOTS],
}

impl ActionEval {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that the block in `slot` must be mined, taking `break_ticks`.
    ///
    /// Out-of-range slots are ignored; templates only declare valid ones.
    pub fn record_break(&mut self, slot: u8, break_ticks: u16) {
        if let Some(entry) = self.broken.get_mut(usize::from(slot)) {
            *entry = Some(break_ticks);
        }
    }

    #[must_use]
    pub fn was_broken(&self, slot: u8) -> bool {
        self.broken
            .get(usize::from(slot))
            .is_some_and(Option::is_some)
    }

    #[must_use]
    pub fn blocks_broken(&self) -> usize {
        self.broken.iter().flatten().count()
    }

    /// Sum of [`costs::break_block`] over every recorded break.
    #[must_use]
    pub fn break_cost(&self) -> i64 {
        self.broken
            .iter()
            .flatten()
            .map(|&ticks| costs::break_block(ticks))
            .sum()
    }
}
