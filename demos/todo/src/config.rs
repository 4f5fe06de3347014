//! Configuration for the todo CLI.
//!
//! Loads configuration from environment variables with sensible defaults.
//! Command-line flags override whatever is loaded here.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Default snapshot file, relative to the working directory
pub const DEFAULT_STORE_PATH: &str = "todos.json";

/// Default tracing filter
pub const DEFAULT_LOG_FILTER: &str = "todo=info";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// File backing the key-value storage (`TODO_STORE_PATH`)
    pub store_path: PathBuf,
    /// `tracing` filter directive used when `RUST_LOG` is unset (`TODO_LOG`)
    pub log_filter: String,
}

impl Config {
    /// Load configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Blank values count as unset.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            store_path: var("TODO_STORE_PATH")
                .map_or_else(|| PathBuf::from(DEFAULT_STORE_PATH), PathBuf::from),
            log_filter: var("TODO_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        }
    }

    /// Replace the store path if an override was given
    #[must_use]
    pub fn with_store_path(mut self, path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            self.store_path = path;
        }
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
