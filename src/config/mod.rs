//! Configuration module for prodclass.
//!
//! Settings are loaded from environment variables (after `.env`), grouped into
//! storage and evaluation sections. Parameter grids come from TOML files.

mod evaluation_config;
mod grid;
mod storage_config;

pub use evaluation_config::EvaluationEnvConfig;
pub use grid::{GridFile, load_grid};
pub use storage_config::StorageEnvConfig;

use anyhow::Result;
use std::env;

/// Main application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub storage: StorageEnvConfig,
    pub evaluation: EvaluationEnvConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            storage: StorageEnvConfig::from_lookup(&lookup),
            evaluation: EvaluationEnvConfig::from_lookup(&lookup)?,
        })
    }

    pub fn project(&self) -> &str {
        &self.storage.project
    }

    pub fn database_url(&self) -> &str {
        &self.storage.database_url
    }
}
