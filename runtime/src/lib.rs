//! # Todo Runtime
//!
//! Runtime implementation for the composable todo architecture.
//!
//! This crate provides the Store runtime that coordinates reducer execution
//! and effect handling.
//!
//! ## Core Components
//!
//! - **Store**: The runtime that owns state and executes effects
//! - **Effect Executor**: Runs effect descriptions and feeds actions back to the reducer
//!
//! Execution is single-threaded and synchronous: every `send` runs the
//! reducer, then every effect it returned, then every action those effects
//! fed back, before returning to the caller.
//!
//! ## Example
//!
//! ```ignore
//! use todo_runtime::Store;
//!
//! let mut store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action
//! store.send(Action::DoSomething)?;
//!
//! // Read state
//! let value = store.state().some_field;
//! ```

/// Metric names recorded by the Store
pub mod metrics;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;
    use todo_core::effect::EffectError;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// An effect execution failed
        ///
        /// The state change made by the reducer is kept; effects queued
        /// after the failing one are not run.
        #[error("Effect execution failed: {0}")]
        EffectFailed(#[source] EffectError),
    }
}

/// Store module - The runtime for reducers
pub mod store {
    use crate::error::StoreError;
    use crate::metrics::{ACTIONS_TOTAL, EFFECTS_EXECUTED, EFFECTS_FAILED};
    use std::collections::VecDeque;
    use todo_core::{effect::Effect, reducer::Reducer};

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store:
    /// 1. Owns the current state
    /// 2. Processes actions through the reducer
    /// 3. Executes effects returned by the reducer
    /// 4. Feeds actions produced by effects back into the reducer
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: S,
        reducer: R,
        environment: E,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        /// Create a new store with initial state, reducer, and environment
        ///
        /// # Arguments
        ///
        /// - `initial_state`: The starting state for the store
        /// - `reducer`: The reducer implementation (business logic)
        /// - `environment`: Injected dependencies
        #[must_use]
        pub const fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self {
                state: initial_state,
                reducer,
                environment,
            }
        }

        /// Send an action to the store
        ///
        /// Runs the reducer, then executes the returned effects in order.
        /// Actions produced by effects are reduced in turn, breadth-first,
        /// until no work remains.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::EffectFailed`] for the first effect that
        /// fails. The state mutation made by the reducer is not rolled back.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub fn send(&mut self, action: A) -> Result<(), StoreError> {
            let mut queue = VecDeque::from([action]);

            while let Some(action) = queue.pop_front() {
                tracing::debug!("Processing action");
                metrics::counter!(ACTIONS_TOTAL).increment(1);

                let effects = self
                    .reducer
                    .reduce(&mut self.state, action, &self.environment);
                tracing::trace!("Reducer completed, returned {} effects", effects.len());

                for effect in effects {
                    Self::execute_effect(effect, &mut queue)?;
                }
            }

            tracing::trace!("Action processing completed");
            Ok(())
        }

        fn execute_effect(effect: Effect<A>, queue: &mut VecDeque<A>) -> Result<(), StoreError> {
            match effect {
                Effect::None => Ok(()),
                Effect::Sequential(effects) => {
                    for effect in effects {
                        Self::execute_effect(effect, queue)?;
                    }
                    Ok(())
                },
                Effect::Run(run) => match run() {
                    Ok(feedback) => {
                        metrics::counter!(EFFECTS_EXECUTED).increment(1);
                        if let Some(action) = feedback {
                            tracing::trace!("Effect produced an action, queueing");
                            queue.push_back(action);
                        }
                        Ok(())
                    },
                    Err(error) => {
                        metrics::counter!(EFFECTS_FAILED).increment(1);
                        tracing::error!(error = %error, "Effect execution failed");
                        Err(StoreError::EffectFailed(error))
                    },
                },
            }
        }

        /// Current state
        #[must_use]
        pub const fn state(&self) -> &S {
            &self.state
        }

        /// Injected dependencies
        #[must_use]
        pub const fn environment(&self) -> &E {
            &self.environment
        }
    }
}

// Re-export for convenience
pub use error::StoreError;
pub use store::Store;
