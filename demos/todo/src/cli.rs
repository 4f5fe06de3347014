//! Command-line arguments for the `todo` binary.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line surface of the `todo` binary.
#[derive(Parser, Debug, PartialEq, Eq)]
#[command(
    name = "todo",
    about = "A to-do list kept in a local JSON snapshot",
    version,
    propagate_version = true
)]
pub struct Cli {
    /// Snapshot file to use instead of `TODO_STORE_PATH`
    #[arg(long, global = true, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Print the resulting state as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// What to do; defaults to listing the todos
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Subcommands of the `todo` binary.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show every todo.
    List,
    /// Add a todo; remaining words are joined with spaces.
    Add {
        /// Text of the new todo
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Flip a todo between open and done.
    Toggle {
        /// Id of the todo to toggle
        id: u64,
    },
    /// Remove a todo (kept in memory only until the next saving command).
    Rm {
        /// Id of the todo to remove
        id: u64,
    },
    /// Replace a todo's text.
    Edit {
        /// Id of the todo to edit
        id: u64,
        /// Replacement text
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
}
