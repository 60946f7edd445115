//! # Todo Core
//!
//! Core traits and types for the composable todo architecture.
//!
//! This crate provides the fundamental abstractions for building small,
//! synchronous state containers using the Reducer pattern.
//!
//! ## Core Concepts
//!
//! - **State**: Domain state for a feature
//! - **Action**: All possible inputs to a reducer
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (not execution)
//! - **Environment**: Injected dependencies via traits
//!
//! ## Architecture Principles
//!
//! - Functional Core, Imperative Shell
//! - Unidirectional Data Flow
//! - Explicit Effects (no hidden I/O)
//! - Dependency Injection via Environment
//!
//! ## Example
//!
//! ```
//! use todo_core::{effect::Effect, reducer::Reducer, SmallVec};
//!
//! #[derive(Clone, Debug, Default)]
//! struct CounterState {
//!     count: i64,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum CounterAction {
//!     Increment,
//! }
//!
//! struct CounterReducer;
//!
//! impl Reducer for CounterReducer {
//!     type State = CounterState;
//!     type Action = CounterAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut CounterState,
//!         action: CounterAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<CounterAction>; 4]> {
//!         match action {
//!             CounterAction::Increment => state.count += 1,
//!         }
//!         SmallVec::new()
//!     }
//! }
//!
//! let mut state = CounterState::default();
//! let effects = CounterReducer.reduce(&mut state, CounterAction::Increment, &());
//! assert_eq!(state.count, 1);
//! assert!(effects.is_empty());
//! ```

// Re-export commonly used types
pub use smallvec::{smallvec, SmallVec};
pub use uuid::Uuid;

pub use environment::StorageError;

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They contain all business logic and are deterministic and testable.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Interprets the action against the current state
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed
        ///
        /// # Arguments
        ///
        /// - `state`: Mutable reference to current state
        /// - `action`: The action to process
        /// - `env`: Reference to injected dependencies
        ///
        /// # Returns
        ///
        /// The effects to be executed by the runtime, in order
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe side effects to be performed by the runtime.
/// They are values (not execution), returned from reducers and run by the
/// Store after the state mutation has been applied.
pub mod effect {
    /// Error produced by a failing effect
    pub type EffectError = Box<dyn std::error::Error + Send + Sync + 'static>;

    /// Boxed synchronous computation carried by [`Effect::Run`]
    pub type EffectFn<Action> = Box<dyn FnOnce() -> Result<Option<Action>, EffectError> + Send>;

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what should happen,
    /// returned from reducers and executed by the Store runtime.
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects one after another, stopping at the first failure
        Sequential(Vec<Effect<Action>>),

        /// Arbitrary synchronous computation
        ///
        /// Returns `Option<Action>` on success - if Some, the action is fed back into the reducer
        Run(EffectFn<Action>),
    }

    // Manual Debug implementation since closures don't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Run(_) => write!(f, "Effect::Run(<run>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Wrap a fallible computation as an effect
        #[must_use]
        pub fn run<F>(f: F) -> Self
        where
            F: FnOnce() -> Result<Option<Action>, EffectError> + Send + 'static,
        {
            Effect::Run(Box::new(f))
        }

        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Returns true for [`Effect::None`]
        #[must_use]
        pub const fn is_none(&self) -> bool {
            matches!(self, Effect::None)
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected
/// via the Environment parameter, so reducers can be tested with
/// deterministic fakes.
pub mod environment {
    use thiserror::Error;
    use uuid::Uuid;

    /// `IdGenerator` trait - abstracts identifier creation for testability
    ///
    /// # Examples
    ///
    /// ```
    /// use todo_core::environment::{IdGenerator, SystemIdGenerator};
    ///
    /// let ids = SystemIdGenerator;
    /// assert_ne!(ids.next_id(), ids.next_id());
    /// ```
    pub trait IdGenerator: Send + Sync {
        /// Produce a fresh identifier
        fn next_id(&self) -> Uuid;
    }

    /// Production id generator backed by random (v4) UUIDs
    #[derive(Clone, Copy, Debug, Default)]
    pub struct SystemIdGenerator;

    impl IdGenerator for SystemIdGenerator {
        fn next_id(&self) -> Uuid {
            Uuid::new_v4()
        }
    }

    /// Errors raised by a [`KeyValueStorage`] backend
    #[derive(Error, Debug)]
    pub enum StorageError {
        /// Underlying I/O failed
        #[error("Storage I/O failed: {0}")]
        Io(#[from] std::io::Error),

        /// Writing the value would exceed the backend's capacity
        #[error("Storage quota exceeded writing {key:?} ({size} bytes, limit {limit})")]
        QuotaExceeded {
            /// Slot being written
            key: String,
            /// Total size the backend would hold after the write
            size: usize,
            /// Configured capacity in bytes
            limit: usize,
        },

        /// The backing medium could not be decoded
        #[error("Storage is corrupt: {0}")]
        Corrupt(String),
    }

    /// `KeyValueStorage` trait - a string-valued slot store
    ///
    /// Models browser-style local storage: every slot holds one string value,
    /// and a write replaces the previous value in full.
    pub trait KeyValueStorage: Send + Sync {
        /// Read the value stored under `key`, if any
        ///
        /// # Errors
        ///
        /// Returns [`StorageError`] if the backend cannot be read.
        fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

        /// Overwrite the value stored under `key`
        ///
        /// # Errors
        ///
        /// Returns [`StorageError`] if the value cannot be durably written.
        fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    }
}
