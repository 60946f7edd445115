//! Single-user todo list built on the reducer architecture.
//!
//! Items can be added, toggled and removed, and the list can be filtered to
//! all, active or completed items. The list is written through to a
//! key-value persistence slot after every mutation and read back once at
//! startup.
//!
//! - [`types`]: todos, filters, state and actions
//! - [`reducer`]: the state transitions and their save effects
//! - [`persistence`]: the load/save port and its slot-backed implementation
//! - [`storage`]: a file-backed key-value store
//! - [`store`]: [`TodoStore`], the operations the view may call
//! - [`view`]: text commands and rendering
//! - [`config`]: environment-variable configuration
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use todo::{Filter, SlotPersistence, TodoEnvironment, TodoStore};
//! use todo_core::environment::SystemIdGenerator;
//! use todo_testing::InMemoryStorage;
//!
//! # fn main() -> Result<(), todo_runtime::StoreError> {
//! let env = TodoEnvironment::new(
//!     Arc::new(SystemIdGenerator),
//!     Arc::new(SlotPersistence::new(Arc::new(InMemoryStorage::new()))),
//! );
//! let mut store = TodoStore::initialize(env);
//!
//! store.add("Buy milk")?;
//! store.add("Walk dog")?;
//!
//! let milk = store.todos()[1].id;
//! store.toggle(&milk)?;
//! store.set_filter(Filter::Active)?;
//!
//! let titles: Vec<_> = store.filtered_view().iter().map(|t| t.title.as_str()).collect();
//! assert_eq!(titles, ["Walk dog"]);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod persistence;
pub mod reducer;
pub mod storage;
pub mod store;
pub mod types;
pub mod view;

use std::sync::Arc;
use todo_core::environment::SystemIdGenerator;

// Re-export commonly used types
pub use config::Config;
pub use persistence::{PersistenceError, SlotPersistence, TodoPersistence, STORAGE_KEY};
pub use reducer::{AddError, TodoEnvironment, TodoReducer};
pub use storage::FileStorage;
pub use store::TodoStore;
pub use types::{Filter, Todo, TodoAction, TodoId, TodoState};

/// Environment backed by the configured storage file and random ids
#[must_use]
pub fn production_environment(config: &Config) -> TodoEnvironment {
    let mut storage = FileStorage::open(&config.storage.path);
    if let Some(limit) = config.storage.quota_bytes {
        storage = storage.with_quota(limit);
    }

    TodoEnvironment::new(
        Arc::new(SystemIdGenerator),
        Arc::new(SlotPersistence::with_key(
            Arc::new(storage),
            config.storage.key.clone(),
        )),
    )
}
