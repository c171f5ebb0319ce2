//! Todo records and the payloads that create or patch them.
//!
//! # Design
//! `CreateTodo` and `UpdateTodo` carry no `id` field, so an id sent by a
//! client is dropped during decoding and can never reach the store. Both
//! accept `complete` as an alias for `completed`.

use serde::{Deserialize, Serialize};

use crate::id::Identifier;

/// A stored todo. Values handed out by the store are always copies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: Identifier,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, alias = "complete")]
    pub completed: bool,
}

impl Todo {
    pub(crate) fn from_candidate(id: Identifier, candidate: CreateTodo) -> Self {
        Self {
            id,
            title: candidate.title,
            completed: candidate.completed.unwrap_or(false),
        }
    }
}

/// Candidate for insert.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTodo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, alias = "complete", skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl CreateTodo {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            completed: None,
        }
    }
}

/// Partial update. `None` and empty titles leave the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTodo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, alias = "complete", skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl UpdateTodo {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            completed: None,
        }
    }

    pub fn completed(completed: bool) -> Self {
        Self {
            title: None,
            completed: Some(completed),
        }
    }
}

/// Occupancy snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitStatus {
    pub size: usize,
    pub limit: usize,
}
