//! Typed search errors.
//!
//! `SearchError` covers pre-flight and API-misuse failures only. The ways a
//! running search can end (no path, budget, cancellation, collaborator
//! panic) are outcomes, reported through [`crate::outcome::SearchFailure`].

use voxelpath_kernel::proof::canon::CanonError;

use crate::outcome::EpisodeState;

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// A policy field is out of range.
    #[error("invalid search policy: {detail}")]
    InvalidPolicy { detail: String },

    /// Policy JSON did not parse.
    #[error("malformed search policy: {0}")]
    PolicyParse(#[from] serde_json::Error),

    /// The start position cannot be placed in the world.
    #[error("invalid start position: {position}")]
    InvalidStart { position: String },

    /// Digest input could not be canonicalized.
    #[error(transparent)]
    Canon(#[from] CanonError),

    /// `into_result` was called before the episode terminated.
    #[error("episode has not finished (state: {state:?})")]
    EpisodeNotFinished { state: EpisodeState },
}
