//! The todo store: the only surface the presentation layer talks to.

use crate::reducer::{TodoEnvironment, TodoReducer};
use crate::types::{Filter, Todo, TodoAction, TodoId, TodoState};
use todo_runtime::{Store, StoreError};

/// Runtime store specialised to the todo reducer
pub type TodoRuntime = Store<TodoState, TodoAction, TodoEnvironment, TodoReducer>;

/// Todo list with synchronous write-through persistence
///
/// Every list mutation is applied in memory and then written in full to the
/// persistence slot before the call returns. Filter changes are never written.
pub struct TodoStore {
    runtime: TodoRuntime,
}

impl TodoStore {
    /// Hydrate from the persistence slot and start with the `all` filter
    ///
    /// This is the only read of persisted state; unreadable data yields an
    /// empty list.
    #[must_use]
    pub fn initialize(env: TodoEnvironment) -> Self {
        let todos = env.persistence.load();
        tracing::info!(count = todos.len(), "Todo store initialized");

        Self {
            runtime: Store::new(TodoState::hydrated(todos), TodoReducer::new(), env),
        }
    }

    /// Prepend a new todo titled `title`
    ///
    /// The title is stored as given; callers trim and reject blank input.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the list could not be persisted, in which
    /// case the todo stays in memory, or if no unused id could be drawn
    /// ([`crate::reducer::AddError`]), in which case nothing is added.
    pub fn add(&mut self, title: impl Into<String>) -> Result<(), StoreError> {
        self.runtime.send(TodoAction::Add {
            title: title.into(),
        })
    }

    /// Flip the completed flag of `id`; unknown ids are ignored
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the list could not be persisted.
    pub fn toggle(&mut self, id: &TodoId) -> Result<(), StoreError> {
        self.runtime.send(TodoAction::Toggle { id: *id })
    }

    /// Delete `id`; unknown ids are ignored
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the list could not be persisted.
    pub fn remove(&mut self, id: &TodoId) -> Result<(), StoreError> {
        self.runtime.send(TodoAction::Remove { id: *id })
    }

    /// Change the active filter
    ///
    /// # Errors
    ///
    /// Never fails in practice: filter changes produce no effects.
    pub fn set_filter(&mut self, filter: Filter) -> Result<(), StoreError> {
        self.runtime.send(TodoAction::SetFilter { filter })
    }

    /// Active filter
    #[must_use]
    pub const fn filter(&self) -> Filter {
        self.runtime.state().filter
    }

    /// Every todo, newest first
    #[must_use]
    pub fn todos(&self) -> &[Todo] {
        &self.runtime.state().todos
    }

    /// Todos visible under the active filter, newest first
    #[must_use]
    pub fn filtered_view(&self) -> Vec<&Todo> {
        self.runtime.state().visible()
    }

    /// Full state, for rendering
    #[must_use]
    pub const fn state(&self) -> &TodoState {
        self.runtime.state()
    }
}

impl std::fmt::Debug for TodoStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoStore")
            .field("state", self.state())
            .finish_non_exhaustive()
    }
}
