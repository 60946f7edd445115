//! # Todo Testing
//!
//! Testing utilities and helpers for the composable todo architecture.
//!
//! This crate provides:
//! - Mock implementations of Environment traits
//! - `ReducerTest`, a Given-When-Then harness for reducers
//! - Assertion helpers for effects
//!
//! ## Example
//!
//! ```
//! use todo_core::environment::{IdGenerator, KeyValueStorage};
//! use todo_testing::{InMemoryStorage, SequentialIdGenerator};
//!
//! let ids = SequentialIdGenerator::new();
//! assert_ne!(ids.next_id(), ids.next_id());
//!
//! let storage = InMemoryStorage::new();
//! storage.set_item("slot", "[]").unwrap();
//! assert_eq!(storage.item("slot").as_deref(), Some("[]"));
//! ```

use todo_core::environment::{IdGenerator, KeyValueStorage, StorageError};
use uuid::Uuid;


pub use reducer_test::{assertions, ReducerTest};

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{IdGenerator, KeyValueStorage, StorageError, Uuid};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
    use std::sync::{Mutex, MutexGuard, PoisonError};

    /// Predictable id generator
    ///
    /// Yields `00000000-0000-0000-0000-000000000001`, then `...0002`, and so on.
    #[derive(Debug)]
    pub struct SequentialIdGenerator {
        next: AtomicU64,
    }

    impl SequentialIdGenerator {
        /// Create a generator starting at 1
        #[must_use]
        pub const fn new() -> Self {
            Self::starting_at(1)
        }

        /// Create a generator starting at `first`
        #[must_use]
        pub const fn starting_at(first: u64) -> Self {
            Self {
                next: AtomicU64::new(first),
            }
        }

        /// The id that the `n`th call (counting from the start value) returns
        #[must_use]
        pub fn id(n: u64) -> Uuid {
            Uuid::from_u128(u128::from(n))
        }
    }

    impl Default for SequentialIdGenerator {
        fn default() -> Self {
            Self::new()
        }
    }

    impl IdGenerator for SequentialIdGenerator {
        fn next_id(&self) -> Uuid {
            Self::id(self.next.fetch_add(1, Ordering::SeqCst))
        }
    }

    /// Id generator that always returns the same id
    ///
    /// Useful for exercising collision handling.
    #[derive(Debug, Clone, Copy)]
    pub struct FixedIdGenerator {
        id: Uuid,
    }

    impl FixedIdGenerator {
        /// Create a generator that always yields `id`
        #[must_use]
        pub const fn new(id: Uuid) -> Self {
            Self { id }
        }
    }

    impl IdGenerator for FixedIdGenerator {
        fn next_id(&self) -> Uuid {
            self.id
        }
    }

    /// In-memory key-value storage
    ///
    /// Optionally enforces a byte quota over all keys and values, failing
    /// writes with [`StorageError::QuotaExceeded`] the way browser storage does.
    #[derive(Debug, Default)]
    pub struct InMemoryStorage {
        slots: Mutex<HashMap<String, String>>,
        quota: Option<usize>,
        writes: AtomicUsize,
    }

    impl InMemoryStorage {
        /// Create empty, unbounded storage
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Create empty storage holding at most `limit` bytes
        #[must_use]
        pub fn with_quota(limit: usize) -> Self {
            Self {
                quota: Some(limit),
                ..Self::default()
            }
        }

        /// Pre-populate a slot without counting it as a write
        #[must_use]
        pub fn seeded(self, key: &str, value: &str) -> Self {
            self.lock().insert(key.to_string(), value.to_string());
            self
        }

        /// Current value of a slot
        #[must_use]
        pub fn item(&self, key: &str) -> Option<String> {
            self.lock().get(key).cloned()
        }

        /// Number of successful `set_item` calls
        #[must_use]
        pub fn writes(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }

        fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
            self.slots.lock().unwrap_or_else(PoisonError::into_inner)
        }
    }

    impl KeyValueStorage for InMemoryStorage {
        fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
            Ok(self.item(key))
        }

        fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
            let mut slots = self.lock();

            if let Some(limit) = self.quota {
                let size: usize = slots
                    .iter()
                    .filter(|(k, _)| k.as_str() != key)
                    .map(|(k, v)| k.len() + v.len())
                    .sum::<usize>()
                    + key.len()
                    + value.len();
                if size > limit {
                    return Err(StorageError::QuotaExceeded {
                        key: key.to_string(),
                        size,
                        limit,
                    });
                }
            }

            slots.insert(key.to_string(), value.to_string());
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }
}

/// Install a `tracing` subscriber that writes through the test harness
///
/// Honors `RUST_LOG`; repeated calls are ignored.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_test_writer()
        .try_init();
}

// Re-export commonly used items
pub use mocks::{FixedIdGenerator, InMemoryStorage, SequentialIdGenerator};
