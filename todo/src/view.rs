//! Text presentation layer.
//!
//! Turns input lines into store operations and renders the store as text.
//! Positions typed by the user are 1-based indices into the filtered view
//! currently on screen.

use crate::store::TodoStore;
use crate::types::{Filter, ParseFilterError, TodoId, TodoState};
use thiserror::Error;
use todo_runtime::StoreError;

/// Usage text printed by `help`
pub const HELP: &str = "\
Commands:
  add <title>          add a todo to the top of the list
  toggle <n>           mark todo n done / not done
  remove <n>           delete todo n (alias: rm)
  filter <name>        show all, active or completed todos
  list                 show the list again (alias: ls)
  help                 show this text
  quit                 leave (alias: exit)";

/// A parsed user gesture
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Add a todo with this (already trimmed, non-empty) title
    Add(String),
    /// Toggle the todo at this position
    Toggle(usize),
    /// Remove the todo at this position
    Remove(usize),
    /// Switch filter
    Filter(Filter),
    /// Redraw the list
    List,
    /// Show usage
    Help,
    /// Leave the shell
    Quit,
}

/// What the shell should do after a command
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    /// Redraw the list
    Render,
    /// Print [`HELP`]
    Help,
    /// Stop reading input
    Quit,
}

/// Problems with a command, shown to the user and then ignored
#[derive(Error, Debug)]
pub enum ViewError {
    /// First word is not a command
    #[error("unknown command {0:?}, type `help` for a list")]
    UnknownCommand(String),

    /// `toggle`/`remove` without a position
    #[error("`{0}` needs a position, e.g. `{0} 1`")]
    MissingPosition(&'static str),

    /// Position is not a number
    #[error("{0:?} is not a position")]
    InvalidPosition(String),

    /// Position is outside the list on screen
    #[error("no todo at position {position} ({visible} shown)")]
    NoSuchPosition {
        /// Requested position
        position: usize,
        /// Number of todos on screen
        visible: usize,
    },

    /// `filter` without a name
    #[error("`filter` needs one of all, active, completed")]
    MissingFilter,

    /// Unknown filter name
    #[error(transparent)]
    Filter(#[from] ParseFilterError),

    /// The change was applied but could not be saved
    #[error("Could not save todos: {0}")]
    Store(#[from] StoreError),
}

/// Trim a submitted title, rejecting blank input
#[must_use]
pub fn normalize_title(raw: &str) -> Option<String> {
    let title = raw.trim();
    (!title.is_empty()).then(|| title.to_string())
}

/// Parse one input line
///
/// Blank lines and `add` with a blank title parse to `None`: nothing to do.
///
/// # Errors
///
/// Returns [`ViewError`] for unknown commands and malformed arguments.
pub fn parse_command(line: &str) -> Result<Option<Command>, ViewError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(word, rest)| (word, rest.trim()));

    let command = match word.to_ascii_lowercase().as_str() {
        "add" => return Ok(normalize_title(rest).map(Command::Add)),
        "toggle" => Command::Toggle(parse_position("toggle", rest)?),
        "remove" | "rm" => Command::Remove(parse_position("remove", rest)?),
        "filter" => {
            if rest.is_empty() {
                return Err(ViewError::MissingFilter);
            }
            Command::Filter(rest.parse()?)
        },
        "list" | "ls" => Command::List,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => return Err(ViewError::UnknownCommand(word.to_string())),
    };

    Ok(Some(command))
}

fn parse_position(command: &'static str, arg: &str) -> Result<usize, ViewError> {
    if arg.is_empty() {
        return Err(ViewError::MissingPosition(command));
    }
    arg.parse()
        .map_err(|_| ViewError::InvalidPosition(arg.to_string()))
}

/// Id of the todo shown at `position`
fn resolve(store: &TodoStore, position: usize) -> Result<TodoId, ViewError> {
    let visible = store.filtered_view();
    position
        .checked_sub(1)
        .and_then(|index| visible.get(index))
        .map(|todo| todo.id)
        .ok_or(ViewError::NoSuchPosition {
            position,
            visible: visible.len(),
        })
}

/// Run `command` against the store
///
/// # Errors
///
/// Returns [`ViewError::NoSuchPosition`] for positions outside the visible
/// list and [`ViewError::Store`] when a change could not be saved.
pub fn apply(store: &mut TodoStore, command: Command) -> Result<Flow, ViewError> {
    match command {
        Command::Add(title) => store.add(title)?,
        Command::Toggle(position) => {
            let id = resolve(store, position)?;
            store.toggle(&id)?;
        },
        Command::Remove(position) => {
            let id = resolve(store, position)?;
            store.remove(&id)?;
        },
        Command::Filter(filter) => store.set_filter(filter)?,
        Command::List => {},
        Command::Help => return Ok(Flow::Help),
        Command::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Render)
}

/// Render the filter bar, the visible todos and the remaining count
#[must_use]
pub fn render(state: &TodoState) -> String {
    let bar: Vec<String> = Filter::ALL
        .iter()
        .map(|filter| {
            if *filter == state.filter {
                format!("[{filter}]")
            } else {
                filter.to_string()
            }
        })
        .collect();

    let mut lines = vec![format!("Filter: {}", bar.join(" "))];
    lines.extend(state.filtered().enumerate().map(|(index, todo)| {
        let mark = if todo.completed { 'x' } else { ' ' };
        format!("{:>3}. [{mark}] {}", index + 1, todo.title)
    }));
    if lines.len() == 1 {
        lines.push("     (nothing to show)".to_string());
    }

    let left = state.active_count();
    lines.push(format!("{left} {} left", if left == 1 { "item" } else { "items" }));
    lines.join("\n")
}
