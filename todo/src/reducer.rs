//! Reducer logic for the todo list.
//!
//! Mutations apply to state immediately; every list mutation then returns a
//! single effect that writes the complete list to the persistence slot.

use crate::persistence::TodoPersistence;
use crate::types::{Todo, TodoAction, TodoId, TodoState};
use std::sync::Arc;
use thiserror::Error;
use todo_core::{
    effect::Effect, environment::IdGenerator, reducer::Reducer, smallvec, SmallVec,
};

/// Upper bound on id draws before giving up on an `Add`
const MAX_ID_ATTEMPTS: usize = 8;

/// Errors raised by the todo reducer's own effects
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddError {
    /// Every drawn id was already in use
    #[error("No unused todo id after {attempts} draws")]
    IdsExhausted {
        /// Number of ids drawn
        attempts: usize,
    },
}

/// Environment dependencies for the todo reducer
#[derive(Clone)]
pub struct TodoEnvironment {
    /// Source of fresh todo ids
    pub ids: Arc<dyn IdGenerator>,
    /// Durable home of the todo list
    pub persistence: Arc<dyn TodoPersistence>,
}

impl TodoEnvironment {
    /// Creates a new `TodoEnvironment`
    #[must_use]
    pub fn new(ids: Arc<dyn IdGenerator>, persistence: Arc<dyn TodoPersistence>) -> Self {
        Self { ids, persistence }
    }
}

/// Reducer for the todo list
#[derive(Clone, Debug)]
pub struct TodoReducer;

impl TodoReducer {
    /// Creates a new `TodoReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Draws ids until one is not already in the list
    fn fresh_id(state: &TodoState, ids: &dyn IdGenerator) -> Option<TodoId> {
        (0..MAX_ID_ATTEMPTS)
            .map(|_| TodoId::from_uuid(ids.next_id()))
            .find(|id| !state.exists(id))
    }

    /// Effect writing the full current list
    fn save(state: &TodoState, env: &TodoEnvironment) -> Effect<TodoAction> {
        let snapshot = state.todos.clone();
        let persistence = Arc::clone(&env.persistence);

        Effect::run(move || {
            persistence.save(&snapshot)?;
            Ok(Some(TodoAction::Saved {
                count: snapshot.len(),
            }))
        })
    }
}

impl Default for TodoReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Reducer for TodoReducer {
    type State = TodoState;
    type Action = TodoAction;
    type Environment = TodoEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            TodoAction::Add { title } => {
                let Some(id) = Self::fresh_id(state, env.ids.as_ref()) else {
                    tracing::error!(
                        attempts = MAX_ID_ATTEMPTS,
                        "Id generator kept returning ids already in use, todo not added"
                    );
                    return smallvec![Effect::run(|| {
                        Err(AddError::IdsExhausted {
                            attempts: MAX_ID_ATTEMPTS,
                        }
                        .into())
                    })];
                };

                tracing::debug!(%id, "Adding todo");
                state.todos.insert(0, Todo::new(id, title));
                smallvec![Self::save(state, env)]
            },

            TodoAction::Toggle { id } => {
                match state.todos.iter_mut().find(|todo| todo.id == id) {
                    Some(todo) => {
                        todo.toggle();
                        tracing::debug!(%id, completed = todo.completed, "Toggled todo");
                    },
                    None => tracing::debug!(%id, "Toggle for unknown todo ignored"),
                }
                smallvec![Self::save(state, env)]
            },

            TodoAction::Remove { id } => {
                let before = state.todos.len();
                state.todos.retain(|todo| todo.id != id);
                if state.todos.len() == before {
                    tracing::debug!(%id, "Remove for unknown todo ignored");
                } else {
                    tracing::debug!(%id, "Removed todo");
                }
                smallvec![Self::save(state, env)]
            },

            TodoAction::SetFilter { filter } => {
                state.filter = filter;
                SmallVec::new()
            },

            TodoAction::Saved { count } => {
                tracing::trace!(count, "Todos persisted");
                SmallVec::new()
            },
        }
    }
}
