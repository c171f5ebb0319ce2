//! Error taxonomy for store operations.
//!
//! Every variant is local to one call: a failed operation leaves the store
//! exactly as it was.

use thiserror::Error;

use crate::id::Identifier;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The addressed todo does not exist.
    #[error("todo.id={id} not found")]
    NotFound { id: Identifier },

    /// Insert against a full store under `CapacityPolicy::Reject`.
    #[error("todos.api.limit={limit}, todos.size()={size}")]
    CapacityExceeded { size: usize, limit: usize },

    /// Missing patch payload, or an id that cannot exist under the store's strategy.
    #[error("{0}")]
    InvalidArgument(String),
}

impl StoreError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}
