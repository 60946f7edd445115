//! Integration tests for `TodoStore`
//!
//! These tests drive the store the way the view does and check both the
//! in-memory list and what reached the persistence slot.

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use todo::{
    AddError, Filter, FileStorage, PersistenceError, SlotPersistence, Todo, TodoEnvironment, TodoId,
    TodoPersistence, TodoStore, STORAGE_KEY,
};
use todo_core::environment::{KeyValueStorage, StorageError};
use todo_runtime::StoreError;
use todo_testing::{init_test_tracing, FixedIdGenerator, InMemoryStorage, SequentialIdGenerator};

fn env_over(storage: Arc<InMemoryStorage>) -> TodoEnvironment {
    TodoEnvironment::new(
        Arc::new(SequentialIdGenerator::new()),
        Arc::new(SlotPersistence::new(storage)),
    )
}

fn fresh_store() -> (Arc<InMemoryStorage>, TodoStore) {
    init_test_tracing();
    let storage = Arc::new(InMemoryStorage::new());
    let store = TodoStore::initialize(env_over(storage.clone()));
    (storage, store)
}

fn titles(todos: &[&Todo]) -> Vec<String> {
    todos.iter().map(|t| t.title.clone()).collect()
}

fn id_of(store: &TodoStore, title: &str) -> TodoId {
    store.todos().iter().find(|t| t.title == title).unwrap().id
}

fn persisted(storage: &InMemoryStorage) -> Vec<Todo> {
    serde_json::from_str(&storage.item(STORAGE_KEY).unwrap()).unwrap()
}

#[test]
fn test_buy_milk_walk_dog_scenario() {
    let (storage, mut store) = fresh_store();
    assert!(store.todos().is_empty());
    assert_eq!(store.filter(), Filter::All);

    store.add("Buy milk").unwrap();
    store.add("Walk dog").unwrap();
    assert_eq!(titles(&store.filtered_view()), ["Walk dog", "Buy milk"]);

    let milk = id_of(&store, "Buy milk");
    store.toggle(&milk).unwrap();

    store.set_filter(Filter::Active).unwrap();
    assert_eq!(titles(&store.filtered_view()), ["Walk dog"]);

    let dog = id_of(&store, "Walk dog");
    store.remove(&dog).unwrap();

    assert_eq!(store.todos().len(), 1);
    assert_eq!(store.todos()[0].title, "Buy milk");
    assert!(store.todos()[0].completed);
    assert_eq!(persisted(&storage), store.todos());
}

#[test]
fn test_every_mutation_writes_and_filter_does_not() {
    let (storage, mut store) = fresh_store();

    store.add("A").unwrap();
    assert_eq!(storage.writes(), 1);

    let a = id_of(&store, "A");
    store.toggle(&a).unwrap();
    assert_eq!(storage.writes(), 2);

    store.set_filter(Filter::Completed).unwrap();
    assert_eq!(storage.writes(), 2);

    store.remove(&a).unwrap();
    assert_eq!(storage.writes(), 3);
    assert!(persisted(&storage).is_empty());
}

#[test]
fn test_unknown_ids_are_ignored_without_error() {
    let (storage, mut store) = fresh_store();
    store.add("Keep me").unwrap();
    let id = id_of(&store, "Keep me");

    store.remove(&id).unwrap();
    store.remove(&id).unwrap();
    store.toggle(&id).unwrap();

    assert!(store.todos().is_empty());
    assert!(persisted(&storage).is_empty());
}

#[test]
fn test_filter_correctness_keeps_order() {
    let storage = Arc::new(InMemoryStorage::new());
    let seeded: Vec<Todo> = [(1, false), (2, true), (3, false)]
        .into_iter()
        .map(|(n, completed)| Todo {
            id: TodoId::from_uuid(SequentialIdGenerator::id(n)),
            title: n.to_string(),
            completed,
        })
        .collect();
    SlotPersistence::new(storage.clone()).save(&seeded).unwrap();

    let mut store = TodoStore::initialize(env_over(storage));

    assert_eq!(titles(&store.filtered_view()), ["1", "2", "3"]);
    store.set_filter(Filter::Active).unwrap();
    assert_eq!(titles(&store.filtered_view()), ["1", "3"]);
    store.set_filter(Filter::Completed).unwrap();
    assert_eq!(titles(&store.filtered_view()), ["2"]);
    store.set_filter(Filter::All).unwrap();
    assert_eq!(titles(&store.filtered_view()), ["1", "2", "3"]);
}

#[test]
fn test_reinitialize_reproduces_list_and_resets_filter() {
    let (storage, mut store) = fresh_store();
    store.add("one").unwrap();
    store.add("two").unwrap();
    store.add("three").unwrap();
    let two = id_of(&store, "two");
    store.toggle(&two).unwrap();
    store.set_filter(Filter::Completed).unwrap();

    let reloaded = TodoStore::initialize(TodoEnvironment::new(
        Arc::new(SequentialIdGenerator::starting_at(100)),
        Arc::new(SlotPersistence::new(storage)),
    ));

    assert_eq!(reloaded.todos(), store.todos());
    assert_eq!(reloaded.filter(), Filter::All);
}

#[test]
fn test_malformed_slot_starts_empty_and_is_overwritten() {
    init_test_tracing();
    let storage = Arc::new(InMemoryStorage::new().seeded(STORAGE_KEY, "[{\"broken\":"));
    let mut store = TodoStore::initialize(env_over(storage.clone()));
    assert!(store.todos().is_empty());

    store.add("Fresh start").unwrap();

    assert_eq!(persisted(&storage).len(), 1);
}

#[test]
fn test_write_failure_is_reported_and_change_kept_in_memory() {
    init_test_tracing();
    let storage = Arc::new(InMemoryStorage::with_quota(120));
    let mut store = TodoStore::initialize(env_over(storage.clone()));

    store.add("fits").unwrap();
    let before = storage.item(STORAGE_KEY).unwrap();

    let err = store
        .add("this title pushes the serialized list beyond the storage quota")
        .unwrap_err();

    let StoreError::EffectFailed(source) = &err;
    let persistence_error = source.downcast_ref::<PersistenceError>().unwrap();
    assert!(matches!(
        persistence_error,
        PersistenceError::Storage(StorageError::QuotaExceeded { .. })
    ));

    assert_eq!(store.todos().len(), 2);
    assert_eq!(storage.item(STORAGE_KEY).unwrap(), before);
}

#[test]
fn test_add_reports_error_when_no_unused_id_is_available() {
    init_test_tracing();
    let taken = Todo {
        id: TodoId::from_uuid(SequentialIdGenerator::id(1)),
        title: "Taken".to_string(),
        completed: false,
    };
    let storage = Arc::new(InMemoryStorage::new());
    SlotPersistence::new(storage.clone()).save(std::slice::from_ref(&taken)).unwrap();
    let writes_before = storage.writes();

    let mut store = TodoStore::initialize(TodoEnvironment::new(
        Arc::new(FixedIdGenerator::new(SequentialIdGenerator::id(1))),
        Arc::new(SlotPersistence::new(storage.clone())),
    ));

    let err = store.add("Buy milk").unwrap_err();

    let StoreError::EffectFailed(source) = &err;
    assert!(matches!(
        source.downcast_ref::<AddError>(),
        Some(AddError::IdsExhausted { .. })
    ));
    assert_eq!(store.todos(), std::slice::from_ref(&taken));
    assert_eq!(storage.writes(), writes_before);
}

#[test]
fn test_file_storage_end_to_end() {
    init_test_tracing();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todo-storage.json");

    let file_env = || {
        TodoEnvironment::new(
            Arc::new(SequentialIdGenerator::new()),
            Arc::new(SlotPersistence::new(Arc::new(FileStorage::open(&path)))),
        )
    };

    let mut store = TodoStore::initialize(file_env());
    store.add("Buy milk").unwrap();
    store.add("Walk dog").unwrap();
    let milk = id_of(&store, "Buy milk");
    store.toggle(&milk).unwrap();

    let reloaded = TodoStore::initialize(file_env());
    assert_eq!(reloaded.todos(), store.todos());

    let raw = FileStorage::open(&path).get_item(STORAGE_KEY).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value[0]["title"], "Walk dog");
    assert_eq!(value[1]["completed"], true);
}

#[derive(Clone, Debug)]
enum Op {
    Add(String),
    Toggle(usize),
    Remove(usize),
    ToggleMissing,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        "[a-z]{1,8}".prop_map(Op::Add),
        (0usize..8).prop_map(Op::Toggle),
        (0usize..8).prop_map(Op::Remove),
        Just(Op::ToggleMissing),
    ]
}

proptest! {
    #[test]
    fn prop_ids_stay_unique_and_persisted_copy_matches(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let storage = Arc::new(InMemoryStorage::new());
        let mut store = TodoStore::initialize(env_over(storage.clone()));

        for op in ops {
            match op {
                Op::Add(title) => store.add(title).unwrap(),
                Op::Toggle(i) => {
                    if let Some(id) = store.todos().get(i).map(|t| t.id) {
                        store.toggle(&id).unwrap();
                    }
                },
                Op::Remove(i) => {
                    if let Some(id) = store.todos().get(i).map(|t| t.id) {
                        store.remove(&id).unwrap();
                    }
                },
                Op::ToggleMissing => {
                    let missing = TodoId::from_uuid(SequentialIdGenerator::id(u64::MAX));
                    store.toggle(&missing).unwrap();
                },
            }

            let ids: HashSet<TodoId> = store.todos().iter().map(|t| t.id).collect();
            prop_assert_eq!(ids.len(), store.todos().len());
        }

        let reloaded = SlotPersistence::new(storage).load();
        prop_assert_eq!(reloaded.as_slice(), store.todos());
    }

    #[test]
    fn prop_add_puts_new_item_first(existing in prop::collection::vec("[a-z]{1,8}", 0..10), title in "[a-z]{1,8}") {
        let (_, mut store) = fresh_store();
        for t in existing {
            store.add(t).unwrap();
        }

        store.add(title.clone()).unwrap();

        let view = store.filtered_view();
        prop_assert_eq!(&view[0].title, &title);
        prop_assert!(!view[0].completed);
    }

    #[test]
    fn prop_toggle_twice_is_identity(completed in any::<bool>()) {
        let storage = Arc::new(InMemoryStorage::new());
        let todo = Todo {
            id: TodoId::from_uuid(SequentialIdGenerator::id(1)),
            title: "t".to_string(),
            completed,
        };
        SlotPersistence::new(storage.clone()).save(std::slice::from_ref(&todo)).unwrap();
        let mut store = TodoStore::initialize(env_over(storage));

        store.toggle(&todo.id).unwrap();
        store.toggle(&todo.id).unwrap();

        prop_assert_eq!(store.todos(), std::slice::from_ref(&todo));
    }
}
