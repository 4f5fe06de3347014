//! To-do list state management built on the todo-store reducer architecture.
//!
//! It demonstrates:
//!
//! - A reducer that returns a fresh state for every action
//! - Persistence through an injected key-value storage
//! - Full-state restore from a JSON snapshot
//! - Testing with `ReducerTest`
//!
//! # Quick Start
//!
//! ```no_run
//! use todo::{TodoAction, TodoEnvironment, TodoId, TodoReducer, TodoState, FileStorage};
//! use todo_store_core::environment::SystemClock;
//! use todo_store_runtime::Store;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let env = TodoEnvironment::new(Arc::new(SystemClock), Arc::new(FileStorage::new("todos.json")));
//! let store = Store::new(TodoState::new(), TodoReducer::new(), env);
//!
//! store.send(TodoAction::load()).await?;
//! store.send(TodoAction::create("buy milk")).await?;
//! store.send(TodoAction::toggle(TodoId::new(2))).await?;
//!
//! let state = store.state(Clone::clone).await;
//! println!("Completed: {}/{}", state.completed_count(), state.count());
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod cli;
pub mod config;
pub mod reducer;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use reducer::{STORAGE_KEY, TodoEnvironment, TodoError, TodoReducer};
pub use storage::FileStorage;
pub use types::{Todo, TodoAction, TodoId, TodoState, TodoUpdate};
