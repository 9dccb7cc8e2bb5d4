use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use drossel_core::SchedulerError;

/// Scheduler configuration, typically parsed from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Maximum number of tasks allowed to run concurrently. Must be >= 1.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

fn default_max_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
        }
    }
}

/// Error loading a scheduler configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

impl SchedulerConfig {
    /// Config with an explicit concurrency ceiling.
    pub fn with_max_concurrency(max_concurrency: usize) -> Self {
        Self { max_concurrency }
    }

    /// Check the invariants the scheduler constructor relies on.
    pub fn validate(&self) -> Result<(), SchedulerError> {
        if self.max_concurrency < 1 {
            return Err(SchedulerError::InvalidConcurrency(self.max_concurrency));
        }
        Ok(())
    }

    /// Load from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }
}
