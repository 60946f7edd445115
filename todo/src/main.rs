//! Interactive todo shell.
//!
//! Reads commands from stdin, applies them to the store and redraws the list.
//! Logs go to stderr so they never interleave with the rendered list.

use anyhow::Context;
use std::io::{self, BufRead, Write};
use todo::view::{self, Flow};
use todo::{production_environment, Config, TodoStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    let config = Config::from_env();

    // Initialize tracing
    let (filter, rejected) = config.log_filter();
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
    if let Some(rejected) = rejected {
        tracing::warn!("{rejected}, using {}", todo::config::DEFAULT_LOG_FILTER);
    }

    todo_runtime::metrics::register_metrics();

    tracing::debug!(
        path = %config.storage.path.display(),
        key = %config.storage.key,
        "Opening todo storage"
    );

    let mut store = TodoStore::initialize(production_environment(&config));

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    writeln!(stdout, "{}\n", view::render(store.state()))?;
    write!(stdout, "> ")?;
    stdout.flush()?;

    for line in stdin.lock().lines() {
        let line = line.context("failed to read command")?;

        match view::parse_command(&line).and_then(|command| match command {
            Some(command) => view::apply(&mut store, command),
            None => Ok(Flow::Render),
        }) {
            Ok(Flow::Render) => writeln!(stdout, "{}\n", view::render(store.state()))?,
            Ok(Flow::Help) => writeln!(stdout, "{}\n", view::HELP)?,
            Ok(Flow::Quit) => break,
            Err(error @ view::ViewError::Store(_)) => {
                tracing::warn!(error = %error, "Store reported an error");
                writeln!(stdout, "warning: {error}\n")?;
                writeln!(stdout, "{}\n", view::render(store.state()))?;
            },
            Err(error) => writeln!(stdout, "error: {error}\n")?,
        }

        write!(stdout, "> ")?;
        stdout.flush()?;
    }

    Ok(())
}
