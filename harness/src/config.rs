//! Runner configuration file.
//!
//! ```json
//! {
//!   "workers": 8,
//!   "policy": { "max_expansions": 50000, "allow_parkour": false },
//!   "logging": { "level": "voxelpath_search=debug,info" }
//! }
//! ```
//!
//! Every section and field is optional; unknown fields are rejected.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use voxelpath_search::error::SearchError;
use voxelpath_search::policy::SearchPolicyV1;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed runner config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("workers must be at least 1")]
    NoWorkers,

    #[error(transparent)]
    Policy(#[from] SearchError),
}

/// Subscriber settings for [`crate::logging::init_tracing`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
    pub ansi: bool,
    pub thread_ids: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".into(),
            ansi: true,
            thread_ids: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunnerConfig {
    /// Worker threads for [`crate::runner::run_batch`].
    pub workers: usize,
    pub policy: SearchPolicyV1,
    pub logging: LoggingSettings,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            policy: SearchPolicyV1::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl RunnerConfig {
    /// # Errors
    ///
    /// [`ConfigError::NoWorkers`] or the policy's own validation error.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        self.policy.validate()?;
        Ok(())
    }

    /// Parse and validate.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`], then anything [`RunnerConfig::validate`]
    /// reports.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a config file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`RunnerConfig::from_json_str`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }
}
