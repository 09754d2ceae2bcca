//! Simulation and pool configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{PoolError, SyncMechanism};

/// Environment variable overriding [`SimulationConfig::capacity`].
pub const CAPACITY_ENV: &str = "TICKET_POOL_CAPACITY";
/// Environment variable overriding [`SimulationConfig::mechanism`].
pub const MECHANISM_ENV: &str = "TICKET_POOL_MECHANISM";

/// Default pool capacity when none is configured.
pub const DEFAULT_CAPACITY: usize = 10;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// JSON could not be parsed.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// Config file could not be read.
    #[error("failed to read config file `{path}`: {source}")]
    Io {
        /// File that failed to load.
        path: String,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// An environment override held an unusable value.
    #[error("invalid value `{value}` for {key}")]
    Env {
        /// Variable name.
        key: &'static str,
        /// Offending value.
        value: String,
    },
    /// A field failed validation.
    #[error("invalid configuration: {0}")]
    Invalid(String),
    /// The pool rejected the validated settings.
    #[error(transparent)]
    Pool(#[from] PoolError),
}

/// Knobs for the pool and the worker harness driving it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Maximum tickets held by the pool.
    pub capacity: usize,
    /// Strategy the pool starts on.
    pub mechanism: SyncMechanism,
    /// Retry delay of an empty `take` on the rwlock strategy, in milliseconds.
    pub rwlock_poll_interval_ms: u64,
    /// Producers sleep `delay * factor` after a rejected add.
    pub full_pool_backoff_factor: u32,
    /// Tickets listed by the `state` command.
    pub state_sample_size: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            mechanism: SyncMechanism::Mutex,
            rwlock_poll_interval_ms: 100,
            full_pool_backoff_factor: 2,
            state_sample_size: 3,
        }
    }
}

impl SimulationConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::Invalid("capacity must be greater than 0".into()));
        }
        if self.rwlock_poll_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "rwlock_poll_interval_ms must be greater than 0".into(),
            ));
        }
        if self.full_pool_backoff_factor == 0 {
            return Err(ConfigError::Invalid(
                "full_pool_backoff_factor must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Poll interval as a [`Duration`].
    #[must_use]
    pub const fn rwlock_poll_interval(&self) -> Duration {
        Duration::from_millis(self.rwlock_poll_interval_ms)
    }

    /// Parse configuration from a JSON string and validate. Missing fields
    /// take their defaults.
    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(input)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and parse a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Defaults overlaid with process environment, after loading `.env` if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Overlay values found through `lookup` onto `self` and validate.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(CAPACITY_ENV) {
            self.capacity = value.trim().parse().map_err(|_| ConfigError::Env {
                key: CAPACITY_ENV,
                value: value.clone(),
            })?;
        }
        if let Some(value) = lookup(MECHANISM_ENV) {
            self.mechanism = value.parse().map_err(|_| ConfigError::Env {
                key: MECHANISM_ENV,
                value: value.clone(),
            })?;
        }
        self.validate()?;
        Ok(self)
    }
}
