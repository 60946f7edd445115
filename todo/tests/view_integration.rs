//! Integration tests for the text view driving a real store

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use todo::view::{apply, parse_command, render, Command, Flow, ViewError};
use todo::{Filter, SlotPersistence, TodoEnvironment, TodoStore};
use todo_testing::{InMemoryStorage, SequentialIdGenerator};

fn store_with_quota(quota: Option<usize>) -> TodoStore {
    let storage = quota.map_or_else(InMemoryStorage::new, InMemoryStorage::with_quota);
    TodoStore::initialize(TodoEnvironment::new(
        Arc::new(SequentialIdGenerator::new()),
        Arc::new(SlotPersistence::new(Arc::new(storage))),
    ))
}

fn run(store: &mut TodoStore, line: &str) -> Result<Flow, ViewError> {
    match parse_command(line)? {
        Some(command) => apply(store, command),
        None => Ok(Flow::Render),
    }
}

#[test]
fn test_session_through_commands() {
    let mut store = store_with_quota(None);

    run(&mut store, "add Buy milk").unwrap();
    run(&mut store, "add Walk dog").unwrap();
    run(&mut store, "toggle 2").unwrap();
    run(&mut store, "filter active").unwrap();

    let text = render(store.state());
    assert!(text.contains("[active]"));
    assert!(text.contains("  1. [ ] Walk dog"));
    assert!(!text.contains("Buy milk"));

    // Positions follow the filtered view on screen.
    run(&mut store, "rm 1").unwrap();
    assert_eq!(store.todos().len(), 1);
    assert_eq!(store.todos()[0].title, "Buy milk");
}

#[test]
fn test_blank_title_never_reaches_store() {
    let mut store = store_with_quota(None);

    assert_eq!(run(&mut store, "add    ").unwrap(), Flow::Render);

    assert!(store.todos().is_empty());
}

#[test]
fn test_position_outside_view_is_rejected() {
    let mut store = store_with_quota(None);
    run(&mut store, "add only").unwrap();

    assert!(matches!(
        run(&mut store, "toggle 2"),
        Err(ViewError::NoSuchPosition { position: 2, visible: 1 })
    ));
    assert!(matches!(
        run(&mut store, "remove 0"),
        Err(ViewError::NoSuchPosition { position: 0, .. })
    ));
    assert!(!store.todos()[0].completed);
}

#[test]
fn test_save_failure_surfaces_as_store_error() {
    let mut store = store_with_quota(Some(16));

    let result = apply(&mut store, Command::Add("too big for sixteen bytes".to_string()));

    assert!(matches!(result, Err(ViewError::Store(_))));
    assert_eq!(store.todos().len(), 1);
}

#[test]
fn test_help_and_quit_flow() {
    let mut store = store_with_quota(None);

    assert_eq!(run(&mut store, "help").unwrap(), Flow::Help);
    assert_eq!(run(&mut store, "quit").unwrap(), Flow::Quit);
    assert_eq!(store.filter(), Filter::All);
}
