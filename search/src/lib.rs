//! Voxelpath Search: cost-optimal movement planning over a voxel world.
//!
//! Depends only on `voxelpath_kernel`.
//!
//! # Crate dependency graph
//!
//! ```text
//! voxelpath_kernel  ←  voxelpath_search  ←  voxelpath_harness
//! (geometry, world)    (actions, search)    (snapshots, runner)
//! ```
//!
//! # Key types
//!
//! - [`GraphAction`]: the movement catalog, with its subscriptions
//! - [`GraphExpander`]: lazy successor generation against a `WorldView`
//! - [`GoalScorer`]: admissible targets ([`XzGoal`], [`PosGoal`], [`YGoal`], [`AnyOfGoal`])
//! - [`SearchEpisode`] / [`search`]: the best-first engine
//! - [`SearchPolicyV1`]: budgets and enabled movement kinds
//! - [`PlanV1`]: the successful output

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod action;
pub mod cancel;
pub mod costs;
pub mod error;
pub mod expander;
pub mod frontier;
pub mod goal;
pub mod node;
pub mod outcome;
pub mod plan;
pub mod policy;
pub mod search;
pub mod state;
pub mod subscription;

pub use action::{ActionKind, GraphAction};
pub use cancel::{CancelSignal, CancellationToken, NeverCancel};
pub use error::SearchError;
pub use expander::{Expansion, ExpanderConfig, GraphExpander, Successor};
pub use goal::{AnyOfGoal, AwayFromPosGoal, GoalError, GoalScorer, PosGoal, XzGoal, YGoal};
pub use outcome::{
    BudgetKind, EpisodeState, FailureReason, PanicStage, SearchFailure, SearchResult, SearchStats,
};
pub use plan::{PlanStepV1, PlanV1};
pub use policy::SearchPolicyV1;
pub use search::{search, SearchEpisode};
pub use state::{BotState, Capabilities};
