//! Graph expander: lazy successor generation.
//!
//! The search space is never materialized. For one state, every template in
//! the catalog is checked against the world through its subscriptions, and
//! the survivors become successors.

use std::collections::HashMap;

use tracing::trace;
use voxelpath_kernel::block::BlockState;
use voxelpath_kernel::geometry::Vec3i;
use voxelpath_kernel::world::WorldView;

use crate::action::{catalog, GraphAction};
use crate::costs;
use crate::state::{BotState, Capabilities};
use crate::subscription::{ActionEval, ExpandContext, Subscription, Verdict};

/// Which movement kinds the expander offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpanderConfig {
    /// Clamped to `1..=MAX_SAFE_FALL`.
    pub max_fall_height: u8,
    pub allow_diagonal: bool,
    pub allow_parkour: bool,
    pub allow_block_breaking: bool,
}

impl Default for ExpanderConfig {
    fn default() -> Self {
        Self {
            max_fall_height: costs::MAX_SAFE_FALL,
            allow_diagonal: true,
            allow_parkour: true,
            allow_block_breaking: true,
        }
    }
}

/// A template with its subscriptions resolved once.
#[derive(Debug, Clone)]
struct ActionTemplate {
    action: GraphAction,
    subscriptions: Vec<Subscription>,
}

/// One surviving action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Successor {
    pub action: GraphAction,
    pub state: BotState,
    /// Step cost (not cumulative).
    pub cost: i64,
}

/// Result of expanding one state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expansion {
    /// In catalog order.
    pub successors: Vec<Successor>,
    /// Distinct cells read from the world.
    pub block_lookups: u64,
    /// Distinct cells the world could not resolve.
    pub unresolved_lookups: u64,
}

/// Per-expansion memo of world lookups.
struct LookupCache<'w> {
    world: &'w dyn WorldView,
    cells: HashMap<Vec3i, Option<BlockState>>,
    unresolved: u64,
}

impl<'w> LookupCache<'w> {
    fn new(world: &'w dyn WorldView) -> Self {
        Self {
            world,
            cells: HashMap::new(),
            unresolved: 0,
        }
    }

    fn get(&mut self, pos: Vec3i) -> Option<BlockState> {
        if let Some(&known) = self.cells.get(&pos) {
            return known;
        }
        let block = self.world.lookup_block(pos);
        if block.is_none() {
            self.unresolved += 1;
        }
        self.cells.insert(pos, block);
        block
    }

    fn lookups(&self) -> u64 {
        self.cells.len() as u64
    }
}

/// Successor generator shared by every episode.
///
/// Immutable after construction, so one instance can serve many threads.
#[derive(Debug, Clone)]
pub struct GraphExpander {
    templates: Vec<ActionTemplate>,
    allow_block_breaking: bool,
}

impl GraphExpander {
    #[must_use]
    pub fn new(config: &ExpanderConfig) -> Self {
        let templates = catalog(config)
            .into_iter()
            .map(|action| ActionTemplate {
                subscriptions: action.subscriptions(),
                action,
            })
            .collect();
        Self {
            templates,
            allow_block_breaking: config.allow_block_breaking,
        }
    }

    /// Catalog templates in evaluation order.
    pub fn actions(&self) -> impl Iterator<Item = GraphAction> + '_ {
        self.templates.iter().map(|t| t.action)
    }

    /// All valid successors of `state` in `world`.
    #[must_use]
    pub fn expand(&self, world: &dyn WorldView, state: &BotState) -> Expansion {
        let origin = state.block();
        let ctx = self.context(state.capabilities);
        let mut cache = LookupCache::new(world);
        let mut successors = Vec::new();

        for template in &self.templates {
            let Some(cost) = run_template(
                &ctx,
                template.action,
                &template.subscriptions,
                origin,
                &mut cache,
            ) else {
                continue;
            };
            let destination = origin + template.action.displacement();
            successors.push(Successor {
                action: template.action,
                state: state.advanced(template.action, destination, cost),
                cost,
            });
        }

        trace!(
            %origin,
            successors = successors.len(),
            lookups = cache.lookups(),
            "expanded"
        );
        Expansion {
            successors,
            block_lookups: cache.lookups(),
            unresolved_lookups: cache.unresolved,
        }
    }

    /// Re-run a single action from `origin`. Returns its step cost, or
    /// `None` if any subscription fails.
    ///
    /// The action does not need to be in this expander's catalog.
    #[must_use]
    pub fn evaluate(
        &self,
        world: &dyn WorldView,
        origin: Vec3i,
        action: GraphAction,
        capabilities: Capabilities,
    ) -> Option<i64> {
        let ctx = self.context(capabilities);
        let mut cache = LookupCache::new(world);
        run_template(&ctx, action, &action.subscriptions(), origin, &mut cache)
    }

    fn context(&self, capabilities: Capabilities) -> ExpandContext {
        ExpandContext {
            capabilities,
            allow_block_breaking: self.allow_block_breaking,
        }
    }
}

fn run_template(
    ctx: &ExpandContext,
    action: GraphAction,
    subscriptions: &[Subscription],
    origin: Vec3i,
    cache: &mut LookupCache<'_>,
) -> Option<i64> {
    let mut eval = ActionEval::new();
    for subscription in subscriptions {
        let absolute = origin + subscription.offset;
        // Unresolvable cells block this action only.
        let block = cache.get(absolute)?;
        if action.process_block(ctx, &mut eval, subscription, block, absolute)
            == Verdict::Impossible
        {
            return None;
        }
    }
    action.finish(&eval)
}
