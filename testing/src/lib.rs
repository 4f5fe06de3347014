//! # Todo Store Testing
//!
//! Testing utilities and helpers for the todo-store architecture.
//!
//! This crate provides:
//! - Mock implementations of Environment traits
//! - A Given-When-Then harness for reducers
//!
//! ## Example
//!
//! ```ignore
//! use todo_store_testing::{InMemoryStorage, test_clock};
//! use std::sync::Arc;
//!
//! let storage = Arc::new(InMemoryStorage::new());
//! let env = TodoEnvironment::new(Arc::new(test_clock()), storage.clone());
//! let next = TodoReducer::new().reduce(&TodoState::new(), TodoAction::create("a"), &env)?;
//! assert_eq!(storage.writes(), 1);
//! ```

use chrono::{DateTime, Utc};
use todo_store_core::environment::{Clock, KeyValueStorage, StorageError};


/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, KeyValueStorage, StorageError, Utc};
    use std::collections::HashMap;
    use std::sync::RwLock;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use todo_store_testing::mocks::FixedClock;
    /// use todo_store_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }

    /// In-memory key-value storage that counts writes
    ///
    /// Stands in for browser-style local storage. `writes()` lets tests assert
    /// which transitions persisted and which did not.
    #[derive(Debug, Default)]
    pub struct InMemoryStorage {
        entries: RwLock<HashMap<String, String>>,
        writes: AtomicUsize,
    }

    impl InMemoryStorage {
        /// Create an empty storage
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Create a storage pre-seeded with one entry
        #[must_use]
        pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
            let mut entries = HashMap::new();
            entries.insert(key.into(), value.into());
            Self {
                entries: RwLock::new(entries),
                writes: AtomicUsize::new(0),
            }
        }

        /// Number of successful `set` calls so far
        #[must_use]
        pub fn writes(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }

        /// Current value under `key`, bypassing the trait
        #[must_use]
        pub fn value(&self, key: &str) -> Option<String> {
            self.entries
                .read()
                .ok()
                .and_then(|entries| entries.get(key).cloned())
        }
    }

    impl KeyValueStorage for InMemoryStorage {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            let entries = self
                .entries
                .read()
                .map_err(|e| StorageError::Unavailable(e.to_string()))?;
            Ok(entries.get(key).cloned())
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            let mut entries = self
                .entries
                .write()
                .map_err(|e| StorageError::Unavailable(e.to_string()))?;
            entries.insert(key.to_string(), value.to_string());
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    /// Storage whose reads and/or writes always fail
    #[derive(Debug, Clone, Copy)]
    pub struct FailingStorage {
        fail_get: bool,
        fail_set: bool,
    }

    impl FailingStorage {
        /// Fails every `get` and every `set`
        #[must_use]
        pub const fn always() -> Self {
            Self {
                fail_get: true,
                fail_set: true,
            }
        }

        /// Reads succeed (and find nothing); writes fail
        #[must_use]
        pub const fn on_set() -> Self {
            Self {
                fail_get: false,
                fail_set: true,
            }
        }

        /// Reads fail; writes succeed and are discarded
        #[must_use]
        pub const fn on_get() -> Self {
            Self {
                fail_get: true,
                fail_set: false,
            }
        }
    }

    impl KeyValueStorage for FailingStorage {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            if self.fail_get {
                return Err(StorageError::Unavailable(format!("injected read failure for {key}")));
            }
            Ok(None)
        }

        fn set(&self, key: &str, _value: &str) -> Result<(), StorageError> {
            if self.fail_set {
                return Err(StorageError::Unavailable(format!("injected write failure for {key}")));
            }
            Ok(())
        }
    }
}

// Re-export commonly used items
pub use mocks::{FailingStorage, FixedClock, InMemoryStorage, test_clock};
pub use reducer_test::{ReducerTest, assertions};
