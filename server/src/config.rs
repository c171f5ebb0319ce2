//! Command-line and environment configuration.
//!
//! Every flag falls back to an environment variable, so the server can be
//! configured the same way in a shell or a container. Values are read once
//! at startup; changing them means restarting with a fresh store.

use std::num::NonZeroUsize;

use clap::Parser;
use thiserror::Error;
use todos_core::{CapacityPolicy, IdStrategy, StoreConfig};

#[derive(Parser, Debug, Clone)]
#[command(name = "todos-server", about = "Bounded in-memory todo service")]
pub struct Config {
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Maximum number of stored todos.
    #[arg(long, env = "TODOS_API_LIMIT", default_value_t = todos_core::config::DEFAULT_LIMIT)]
    pub limit: usize,

    /// Id strategy: int, long, uuid or short-uuid.
    #[arg(long = "ids", env = "TODOS_IDS_STRATEGY", default_value_t = IdStrategy::Int)]
    pub strategy: IdStrategy,

    /// Use 8-character tokens when the strategy is uuid.
    #[arg(long, env = "TODOS_IDS_TINY_ID")]
    pub tiny_ids: bool,

    /// Evict the oldest todo instead of rejecting inserts when full.
    #[arg(long, env = "TODOS_API_EVICT")]
    pub evict: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("todos.api.limit must be greater than zero")]
    ZeroLimit,
}

impl Config {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn store_config(&self) -> Result<StoreConfig, ConfigError> {
        let limit = NonZeroUsize::new(self.limit).ok_or(ConfigError::ZeroLimit)?;
        let policy = if self.evict {
            CapacityPolicy::EvictOldest
        } else {
            CapacityPolicy::Reject
        };
        Ok(StoreConfig::new(
            self.strategy.with_tiny_ids(self.tiny_ids),
            limit,
            policy,
        ))
    }
}
