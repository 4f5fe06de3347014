//! # Todo Store Core
//!
//! Core traits and types for the todo-store architecture.
//!
//! This crate provides the fundamental abstractions for building a to-do list
//! as a reducer-driven state machine with injected persistence.
//!
//! ## Core Concepts
//!
//! - **State**: Domain state for a feature
//! - **Action**: A tagged message describing one requested state transition
//! - **Reducer**: Function `(State, Action, Environment) → Result<State, Error>`
//! - **Environment**: Injected dependencies via traits (clock, key-value storage)
//!
//! ## Architecture Principles
//!
//! - Functional Core, Imperative Shell
//! - Unidirectional Data Flow
//! - Every transition produces a new state value
//! - Dependency Injection via Environment
//!
//! ## Example
//!
//! ```ignore
//! use todo_store_core::{environment::Clock, reducer::Reducer};
//!
//! impl Reducer for CounterReducer {
//!     type State = CounterState;
//!     type Action = CounterAction;
//!     type Environment = CounterEnvironment;
//!     type Error = CounterError;
//!
//!     fn reduce(
//!         &self,
//!         state: &CounterState,
//!         action: CounterAction,
//!         env: &CounterEnvironment,
//!     ) -> Result<CounterState, CounterError> {
//!         Ok(CounterState { count: state.count + 1 })
//!     }
//! }
//! ```

/// Reducer module - The core trait for business logic
///
/// Reducers map `(State, Action, Environment)` to the next state.
/// They contain all business logic; the only side effects they may perform go
/// through the injected environment, so they remain deterministic under test.
pub mod reducer {
    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    /// - `Error`: The fault surfaced to the dispatcher when a transition fails
    ///
    /// # Example
    ///
    /// ```ignore
    /// impl Reducer for TodoReducer {
    ///     type State = TodoState;
    ///     type Action = TodoAction;
    ///     type Environment = TodoEnvironment;
    ///     type Error = TodoError;
    ///
    ///     fn reduce(
    ///         &self,
    ///         state: &TodoState,
    ///         action: TodoAction,
    ///         env: &TodoEnvironment,
    ///     ) -> Result<TodoState, TodoError> {
    ///         match action {
    ///             TodoAction::ToggleUpdate(stage) => Ok(TodoState { stage, ..state.clone() }),
    ///             _ => Ok(state.clone()),
    ///         }
    ///     }
    /// }
    /// ```
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// The error returned when a transition cannot be completed
        type Error: std::error::Error + Send + Sync + 'static;

        /// Reduce an action into the next state
        ///
        /// The input state is never modified. On success the returned value
        /// replaces it wholesale; on failure the caller keeps the input state.
        ///
        /// # Arguments
        ///
        /// - `state`: Current state
        /// - `action`: The action to process
        /// - `env`: Reference to injected dependencies
        ///
        /// # Errors
        ///
        /// Returns `Self::Error` when the transition faults (malformed input,
        /// missing target, failed side effect through the environment).
        fn reduce(
            &self,
            state: &Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> Result<Self::State, Self::Error>;
    }
}

/// Environment module - Dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected
/// via the Environment parameter.
pub mod environment {
    use chrono::{DateTime, Utc};
    use thiserror::Error;

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```
    /// use todo_store_core::environment::{Clock, SystemClock};
    ///
    /// let clock = SystemClock;
    /// let _now = clock.now();
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    /// Errors raised by a [`KeyValueStorage`] backend
    #[derive(Error, Debug)]
    pub enum StorageError {
        /// Reading or writing the backing medium failed
        #[error("Storage I/O failed: {0}")]
        Io(#[from] std::io::Error),

        /// The backing medium exists but its contents cannot be decoded
        #[error("Storage contents are corrupt: {0}")]
        Corrupt(String),

        /// The backend cannot serve requests (poisoned lock, injected failure)
        #[error("Storage backend unavailable: {0}")]
        Unavailable(String),
    }

    /// Synchronous string key-value store used for state snapshots
    ///
    /// Mirrors the browser `localStorage` contract: values are opaque strings,
    /// a missing key reads as `None`, and `set` overwrites.
    pub trait KeyValueStorage: Send + Sync {
        /// Read the value stored under `key`
        ///
        /// # Errors
        ///
        /// Returns [`StorageError`] if the backend cannot be read.
        fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

        /// Store `value` under `key`, replacing any previous value
        ///
        /// # Errors
        ///
        /// Returns [`StorageError`] if the backend cannot be written.
        fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    }
}
