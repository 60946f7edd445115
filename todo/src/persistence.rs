//! Persistence port for the todo list.
//!
//! The list is stored as one JSON array in a single key-value slot. It is
//! read once when the store starts and overwritten in full after every
//! mutation.

use crate::types::{Todo, TodoId};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use todo_core::environment::{KeyValueStorage, StorageError};

/// Default slot key; the suffix is the schema tag of the stored array
pub const STORAGE_KEY: &str = "todos:v1";

/// Errors raised while writing the todo list
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// The list could not be encoded
    #[error("Failed to serialize todos: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The storage backend rejected the write
    #[error("Failed to write todos: {0}")]
    Storage(#[from] StorageError),
}

/// Where the todo list lives between runs
pub trait TodoPersistence: Send + Sync {
    /// Read the stored list
    ///
    /// Never fails: anything missing or unreadable yields an empty list.
    fn load(&self) -> Vec<Todo>;

    /// Replace the stored list with `todos`
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] if the list cannot be encoded or written.
    fn save(&self, todos: &[Todo]) -> Result<(), PersistenceError>;
}

/// [`TodoPersistence`] over a single slot of a [`KeyValueStorage`]
#[derive(Clone)]
pub struct SlotPersistence {
    storage: Arc<dyn KeyValueStorage>,
    key: String,
}

impl SlotPersistence {
    /// Persist under [`STORAGE_KEY`]
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self::with_key(storage, STORAGE_KEY)
    }

    /// Persist under a custom slot key
    #[must_use]
    pub fn with_key(storage: Arc<dyn KeyValueStorage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// Slot key in use
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl std::fmt::Debug for SlotPersistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlotPersistence")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl TodoPersistence for SlotPersistence {
    #[tracing::instrument(skip(self), fields(key = %self.key))]
    fn load(&self) -> Vec<Todo> {
        let raw = match self.storage.get_item(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!("No persisted todos, starting empty");
                return Vec::new();
            },
            Err(error) => {
                tracing::warn!(error = %error, "Could not read persisted todos, starting empty");
                return Vec::new();
            },
        };

        match serde_json::from_str::<Vec<Todo>>(&raw) {
            Ok(todos) => {
                let todos = dedupe(todos);
                tracing::debug!(count = todos.len(), "Loaded persisted todos");
                todos
            },
            Err(error) => {
                tracing::warn!(error = %error, "Persisted todos are malformed, starting empty");
                Vec::new()
            },
        }
    }

    #[tracing::instrument(skip(self, todos), fields(key = %self.key, count = todos.len()))]
    fn save(&self, todos: &[Todo]) -> Result<(), PersistenceError> {
        let raw = serde_json::to_string(todos)?;
        self.storage.set_item(&self.key, &raw)?;
        tracing::trace!(bytes = raw.len(), "Persisted todos");
        Ok(())
    }
}

/// Drop repeated ids, keeping the first occurrence
fn dedupe(todos: Vec<Todo>) -> Vec<Todo> {
    let mut seen: HashSet<TodoId> = HashSet::with_capacity(todos.len());
    let before = todos.len();
    let todos: Vec<Todo> = todos.into_iter().filter(|todo| seen.insert(todo.id)).collect();

    if todos.len() != before {
        tracing::warn!(
            dropped = before - todos.len(),
            "Persisted todos contained duplicate ids"
        );
    }
    todos
}
