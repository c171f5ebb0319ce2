//! In-memory, capacity-bounded todo store.
//!
//! # Overview
//! `TodoStore` owns every `Todo` and hands out clones only. Identifiers come
//! from an `IdAllocator` chosen once per store (`IdStrategy`), and inserts
//! beyond the configured limit are either rejected or evict the oldest entry
//! (`CapacityPolicy`).
//!
//! # Design
//! - Synchronous and I/O free. The HTTP layer lives in `todos-server`.
//! - One mutex guards the whole store, so check-then-insert and merge-update
//!   are single atomic steps.
//! - The allocator is owned by the store; two stores never share a sequence.

pub mod config;
pub mod error;
pub mod id;
pub mod store;
pub mod todo;

pub use config::{CapacityPolicy, StoreConfig};
pub use error::StoreError;
pub use id::{IdAllocator, IdStrategy, Identifier};
pub use store::TodoStore;
pub use todo::{CreateTodo, LimitStatus, Todo, UpdateTodo};
