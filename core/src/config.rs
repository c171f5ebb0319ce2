//! Construction-time store settings.

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::id::IdStrategy;

/// Default capacity when none is configured.
pub const DEFAULT_LIMIT: usize = 1024;

/// What `insert` does when the store is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CapacityPolicy {
    /// Fail with `StoreError::CapacityExceeded`.
    #[default]
    Reject,
    /// Drop the oldest todo to make room.
    EvictOldest,
}

/// Fixed for the lifetime of a store. Reconfiguring means building a new store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub strategy: IdStrategy,
    pub limit: NonZeroUsize,
    pub policy: CapacityPolicy,
}

impl StoreConfig {
    pub fn new(strategy: IdStrategy, limit: NonZeroUsize, policy: CapacityPolicy) -> Self {
        Self {
            strategy,
            limit,
            policy,
        }
    }

    /// Returns `None` for a zero limit.
    pub fn with_limit(limit: usize) -> Option<Self> {
        NonZeroUsize::new(limit).map(|limit| Self {
            limit,
            ..Self::default()
        })
    }

    pub fn strategy(mut self, strategy: IdStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn policy(mut self, policy: CapacityPolicy) -> Self {
        self.policy = policy;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            strategy: IdStrategy::default(),
            limit: NonZeroUsize::new(DEFAULT_LIMIT).unwrap_or(NonZeroUsize::MIN),
            policy: CapacityPolicy::default(),
        }
    }
}
