//! The todo store.
//!
//! # Design
//! All state sits behind one `parking_lot::Mutex`; each public operation is a
//! single critical section. That makes capacity-check-then-insert and
//! read-merge-write atomic, and every read sees the result of some prefix of
//! completed mutations.
//!
//! Insertion order is tracked with a monotonically increasing slot number per
//! entry (`order: slot -> id`), so eviction pops the first slot and updates
//! never move an entry.

use std::collections::{BTreeMap, HashMap};
use std::num::NonZeroUsize;

use parking_lot::Mutex;
use tracing::{debug, info, trace, warn};

use crate::config::{CapacityPolicy, StoreConfig};
use crate::error::StoreError;
use crate::id::{IdAllocator, IdStrategy, Identifier};
use crate::todo::{CreateTodo, LimitStatus, Todo, UpdateTodo};

#[derive(Debug)]
pub struct TodoStore {
    entries: Mutex<Entries>,
    allocator: Box<dyn IdAllocator>,
    limit: NonZeroUsize,
    policy: CapacityPolicy,
}

#[derive(Debug, Default)]
struct Entries {
    by_id: HashMap<Identifier, Slot>,
    order: BTreeMap<u64, Identifier>,
    next_slot: u64,
}

#[derive(Debug)]
struct Slot {
    slot: u64,
    todo: Todo,
}

impl Entries {
    fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Appends `todo`, or replaces an existing entry with the same id in place.
    fn put(&mut self, todo: Todo) -> Option<Todo> {
        if let Some(existing) = self.by_id.get_mut(&todo.id) {
            return Some(std::mem::replace(&mut existing.todo, todo));
        }
        let slot = self.next_slot;
        self.next_slot += 1;
        self.order.insert(slot, todo.id.clone());
        self.by_id.insert(todo.id.clone(), Slot { slot, todo });
        None
    }

    fn remove(&mut self, id: &Identifier) -> Option<Todo> {
        let entry = self.by_id.remove(id)?;
        self.order.remove(&entry.slot);
        Some(entry.todo)
    }

    fn pop_oldest(&mut self) -> Option<Todo> {
        let (_, id) = self.order.pop_first()?;
        self.by_id.remove(&id).map(|entry| entry.todo)
    }

    fn snapshot(&self) -> Vec<Todo> {
        self.order
            .values()
            .filter_map(|id| self.by_id.get(id))
            .map(|entry| entry.todo.clone())
            .collect()
    }

    fn clear(&mut self) -> usize {
        let removed = self.by_id.len();
        self.by_id.clear();
        self.order.clear();
        removed
    }
}

impl TodoStore {
    pub fn new(config: StoreConfig) -> Self {
        Self::with_allocator(config.limit, config.policy, config.strategy.allocator())
    }

    /// Build a store around a caller-supplied allocator.
    pub fn with_allocator(
        limit: NonZeroUsize,
        policy: CapacityPolicy,
        allocator: Box<dyn IdAllocator>,
    ) -> Self {
        Self {
            entries: Mutex::new(Entries::default()),
            allocator,
            limit,
            policy,
        }
    }

    pub fn strategy(&self) -> IdStrategy {
        self.allocator.strategy()
    }

    pub fn policy(&self) -> CapacityPolicy {
        self.policy
    }

    pub fn limit(&self) -> usize {
        self.limit.get()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All todos in insertion order. The result is a detached copy.
    pub fn list(&self) -> Vec<Todo> {
        let entries = self.entries.lock();
        debug!(size = entries.len(), limit = self.limit(), "listing todos");
        entries.snapshot()
    }

    /// Store a new todo and return a copy of it.
    ///
    /// # Errors
    /// `CapacityExceeded` when the store is full and the policy is `Reject`.
    /// Nothing is allocated or stored in that case.
    pub fn insert(&self, candidate: CreateTodo) -> Result<Todo, StoreError> {
        let mut entries = self.entries.lock();
        let size = entries.len();
        let limit = self.limit();

        if size >= limit {
            match self.policy {
                CapacityPolicy::Reject => {
                    warn!(size, limit, "limit reached, rejecting todo");
                    return Err(StoreError::CapacityExceeded { size, limit });
                }
                CapacityPolicy::EvictOldest => {
                    if let Some(evicted) = entries.pop_oldest() {
                        info!(id = %evicted.id, limit, "evicted oldest todo");
                    }
                }
            }
        }

        let todo = Todo::from_candidate(self.allocator.allocate(), candidate);
        if let Some(previous) = entries.put(todo.clone()) {
            warn!(id = %previous.id, "id collision, replaced existing todo");
        }
        debug!(id = %todo.id, size = entries.len(), "inserted todo");
        Ok(todo)
    }

    pub fn get(&self, id: &Identifier) -> Result<Todo, StoreError> {
        let entries = self.entries.lock();
        match entries.by_id.get(id) {
            Some(entry) => {
                trace!(%id, "retrieving todo");
                Ok(entry.todo.clone())
            }
            None => {
                warn!(%id, "todo not found");
                Err(StoreError::NotFound { id: id.clone() })
            }
        }
    }

    /// Idempotent: removing an unknown id changes nothing.
    pub fn remove(&self, id: &Identifier) {
        match self.entries.lock().remove(id) {
            Some(_) => info!(%id, "removed todo"),
            None => warn!(%id, "can't remove a todo that doesn't exist"),
        }
    }

    /// Removes everything. The allocator keeps counting.
    pub fn clear(&self) {
        let removed = self.entries.lock().clear();
        info!(removed, "removed all todos");
    }

    /// Merge `patch` into the todo stored under `id`.
    ///
    /// `completed` is overwritten when present. `title` is overwritten only
    /// by a non-empty string, so a patch cannot blank a title. Position in
    /// the listing is unchanged.
    ///
    /// # Errors
    /// - `InvalidArgument` when `patch` is `None`, whether or not `id` exists.
    /// - `NotFound` when `id` is absent.
    pub fn update(&self, id: &Identifier, patch: Option<UpdateTodo>) -> Result<Todo, StoreError> {
        let Some(patch) = patch else {
            warn!(%id, "update without a body");
            return Err(StoreError::invalid_argument("todo request body can't be null"));
        };

        let mut entries = self.entries.lock();
        let Some(entry) = entries.by_id.get_mut(id) else {
            warn!(%id, "can't update a todo that doesn't exist");
            return Err(StoreError::NotFound { id: id.clone() });
        };
        let current = &mut entry.todo;

        if let Some(completed) = patch.completed {
            trace!(%id, from = current.completed, to = completed, "updating completed");
            current.completed = completed;
        }
        if let Some(title) = patch.title.filter(|t| !t.is_empty()) {
            trace!(%id, from = ?current.title, to = %title, "updating title");
            current.title = Some(title);
        }

        debug!(%id, "updated todo");
        Ok(current.clone())
    }

    pub fn limit_status(&self) -> LimitStatus {
        let size = self.len();
        LimitStatus {
            size,
            limit: self.limit(),
        }
    }
}

impl Default for TodoStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}
