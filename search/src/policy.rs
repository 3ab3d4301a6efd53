//! Search policy: budgets and enabled movement kinds.

use serde::{Deserialize, Serialize};
use voxelpath_kernel::proof::canon::to_canonical_bytes;
use voxelpath_kernel::proof::hash::{canonical_hash, ContentHash};
use voxelpath_kernel::proof::hash_domain::HashDomain;

use crate::action::GraphAction;
use crate::costs::MAX_SAFE_FALL;
use crate::error::SearchError;
use crate::expander::ExpanderConfig;

/// Per-episode configuration.
///
/// Missing JSON fields take their default; unknown fields are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchPolicyV1 {
    /// Hard cap on node expansions.
    pub max_expansions: u64,
    /// Wall-clock budget. `None` disables it.
    pub timeout_ms: Option<u64>,
    /// Deepest fall a `Descend` may take, `1..=3`.
    pub max_fall_height: u8,
    pub allow_diagonal: bool,
    pub allow_parkour: bool,
    pub allow_block_breaking: bool,
    /// Minimum gap between progress log lines.
    pub progress_log_interval_ms: u64,
}

impl Default for SearchPolicyV1 {
    fn default() -> Self {
        Self {
            max_expansions: 100_000,
            timeout_ms: Some(180_000),
            max_fall_height: MAX_SAFE_FALL,
            allow_diagonal: true,
            allow_parkour: true,
            allow_block_breaking: true,
            progress_log_interval_ms: 1000,
        }
    }
}

impl SearchPolicyV1 {
    /// # Errors
    ///
    /// [`SearchError::InvalidPolicy`] naming the first offending field.
    pub fn validate(&self) -> Result<(), SearchError> {
        let invalid = |detail: String| Err(SearchError::InvalidPolicy { detail });
        if self.max_expansions == 0 {
            return invalid("max_expansions must be positive".into());
        }
        if self.timeout_ms == Some(0) {
            return invalid("timeout_ms must be positive (or null for no limit)".into());
        }
        if !(1..=MAX_SAFE_FALL).contains(&self.max_fall_height) {
            return invalid(format!(
                "max_fall_height must be in 1..={MAX_SAFE_FALL}, got {}",
                self.max_fall_height
            ));
        }
        if self.progress_log_interval_ms == 0 {
            return invalid("progress_log_interval_ms must be positive".into());
        }
        Ok(())
    }

    /// Parse and validate.
    ///
    /// # Errors
    ///
    /// [`SearchError::PolicyParse`] for malformed JSON or unknown fields,
    /// then anything [`SearchPolicyV1::validate`] reports.
    pub fn from_json_str(json: &str) -> Result<Self, SearchError> {
        let policy: Self = serde_json::from_str(json)?;
        policy.validate()?;
        Ok(policy)
    }

    /// Digest of the canonical JSON form.
    ///
    /// # Errors
    ///
    /// [`SearchError::Canon`] if canonicalization fails.
    pub fn digest(&self) -> Result<ContentHash, SearchError> {
        let bytes = to_canonical_bytes(self)?;
        Ok(canonical_hash(HashDomain::SearchPolicy, &bytes))
    }

    /// Whether this policy allows `action`. Lets episodes with different
    /// policies share one expander.
    #[must_use]
    pub const fn permits(&self, action: GraphAction) -> bool {
        match action {
            GraphAction::Straight { .. } | GraphAction::Ascend { .. } => true,
            GraphAction::Diagonal { .. } => self.allow_diagonal,
            GraphAction::Parkour { .. } => self.allow_parkour,
            GraphAction::BreakAssisted { .. } => self.allow_block_breaking,
            GraphAction::Descend { height, .. } => height <= self.max_fall_height,
        }
    }

    /// The movement kinds this policy enables.
    #[must_use]
    pub const fn expander_config(&self) -> ExpanderConfig {
        ExpanderConfig {
            max_fall_height: self.max_fall_height,
            allow_diagonal: self.allow_diagonal,
            allow_parkour: self.allow_parkour,
            allow_block_breaking: self.allow_block_breaking,
        }
    }
}
