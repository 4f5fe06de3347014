//! Wiring between the CLI and the store.
//!
//! Every invocation starts from the initial state, restores the saved
//! snapshot with a load action, applies one command, and renders the result.

use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::reducer::{TodoEnvironment, TodoReducer};
use crate::storage::FileStorage;
use crate::types::{TodoAction, TodoId, TodoState};
use anyhow::Context;
use std::fmt::Write as _;
use std::sync::Arc;
use todo_store_core::environment::SystemClock;
use todo_store_runtime::Store;

/// Store specialised to the todo list
pub type TodoStore = Store<TodoState, TodoAction, TodoEnvironment, TodoReducer>;

/// Build a store over the configured snapshot file
#[must_use]
pub fn open_store(config: &Config) -> TodoStore {
    let env = TodoEnvironment::new(
        Arc::new(SystemClock),
        Arc::new(FileStorage::new(&config.store_path)),
    );
    Store::new(TodoState::new(), TodoReducer::new(), env)
}

/// Run a parsed command line against the configured storage
///
/// # Errors
///
/// Returns an error if the snapshot cannot be loaded or the command fails.
pub async fn run(cli: Cli, config: &Config) -> anyhow::Result<String> {
    let store = open_store(config);
    execute(&store, cli.command.unwrap_or(Command::List), cli.json).await
}

/// Load the saved snapshot into `store`, apply `command`, and render the state
///
/// # Errors
///
/// Returns an error if any dispatched action is rejected.
pub async fn execute(store: &TodoStore, command: Command, json: bool) -> anyhow::Result<String> {
    store
        .send(TodoAction::load())
        .await
        .context("failed to load saved todos")?;

    match command {
        Command::List => {},
        Command::Add { text } => {
            store
                .send(TodoAction::create(text.join(" ")))
                .await
                .context("failed to add todo")?;
        },
        Command::Toggle { id } => {
            store
                .send(TodoAction::toggle(TodoId::new(id)))
                .await
                .with_context(|| format!("failed to toggle todo {id}"))?;
        },
        Command::Rm { id } => {
            store
                .send(TodoAction::delete(TodoId::new(id)))
                .await
                .with_context(|| format!("failed to remove todo {id}"))?;
            tracing::warn!(id, "Removal is not saved until the next add, toggle or edit");
        },
        Command::Edit { id, text } => {
            let id = TodoId::new(id);
            let staged = store.state(|s| s.get(id).cloned()).await;
            if staged.is_some() {
                store
                    .send(TodoAction::toggle_update(staged))
                    .await
                    .with_context(|| format!("failed to stage todo {id}"))?;
            }
            store
                .send(TodoAction::update(id, text.join(" ")))
                .await
                .with_context(|| format!("failed to edit todo {id}"))?;
        },
    }

    let state = store.state(Clone::clone).await;
    render(&state, json)
}

/// Render the state for the terminal
///
/// # Errors
///
/// Returns an error if JSON output was requested and encoding fails.
pub fn render(state: &TodoState, json: bool) -> anyhow::Result<String> {
    if json {
        return serde_json::to_string_pretty(state).context("failed to encode state");
    }

    if state.todos.is_empty() {
        return Ok("No todos yet.".to_string());
    }

    let mut out = String::new();
    for todo in &state.todos {
        let mark = if todo.done { 'x' } else { ' ' };
        writeln!(out, "[{mark}] {:>3}  {}", todo.id, todo.text)?;
    }
    write!(out, "{}/{} done", state.completed_count(), state.count())?;
    Ok(out)
}
