//! Reducer logic for the todo list.
//!
//! Every branch builds a fresh [`TodoState`] from the input state. The
//! create, toggle and update branches also write the new state to storage
//! before returning it; delete, staging and load do not.

use crate::types::{Todo, TodoAction, TodoId, TodoState, TodoUpdate};
use std::sync::Arc;
use thiserror::Error;
use todo_store_core::{
    environment::{Clock, KeyValueStorage, StorageError},
    reducer::Reducer,
};

/// Storage key the snapshot lives under
pub const STORAGE_KEY: &str = "todos";

/// Faults surfaced by the todo reducer
///
/// None of these are recovered locally; the caller keeps its previous state.
#[derive(Error, Debug)]
pub enum TodoError {
    /// Update targeted an id that is not in the list
    #[error("Todo with ID {0} not found")]
    NotFound(TodoId),

    /// The id counter cannot be incremented any further
    #[error("Todo ID space exhausted at {0}")]
    IdSpaceExhausted(u64),

    /// Stored snapshot could not be decoded, or state could not be encoded
    #[error("Snapshot could not be processed: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// The storage backend failed
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Environment dependencies for the todo reducer
#[derive(Clone)]
pub struct TodoEnvironment {
    /// Clock for creation timestamps
    pub clock: Arc<dyn Clock>,
    /// Where snapshots are written and restored from
    pub storage: Arc<dyn KeyValueStorage>,
}

impl TodoEnvironment {
    /// Creates a new `TodoEnvironment`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { clock, storage }
    }
}

/// Reducer for the todo list
#[derive(Clone, Copy, Debug, Default)]
pub struct TodoReducer;

impl TodoReducer {
    /// Creates a new `TodoReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Writes the full state under [`STORAGE_KEY`]
    fn persist(state: &TodoState, env: &TodoEnvironment) -> Result<(), TodoError> {
        let snapshot = serde_json::to_string(state)?;
        env.storage.set(STORAGE_KEY, &snapshot)?;
        tracing::trace!(bytes = snapshot.len(), "Persisted snapshot");
        Ok(())
    }

    fn load(state: &TodoState, env: &TodoEnvironment) -> Result<TodoState, TodoError> {
        match env.storage.get(STORAGE_KEY)? {
            Some(snapshot) if !snapshot.is_empty() => {
                let restored: TodoState = serde_json::from_str(&snapshot)?;
                tracing::info!(todos = restored.count(), "Restored snapshot");
                Ok(restored)
            },
            _ => {
                tracing::debug!("No snapshot stored; keeping current state");
                Ok(state.clone())
            },
        }
    }

    fn delete(state: &TodoState, id: TodoId) -> TodoState {
        TodoState {
            todos: state.todos.iter().filter(|t| t.id != id).cloned().collect(),
            ..state.clone()
        }
    }

    fn toggle(state: &TodoState, id: TodoId) -> TodoState {
        TodoState {
            todos: state
                .todos
                .iter()
                .map(|t| if t.id == id { t.toggled() } else { t.clone() })
                .collect(),
            ..state.clone()
        }
    }

    fn create(
        state: &TodoState,
        text: String,
        env: &TodoEnvironment,
    ) -> Result<TodoState, TodoError> {
        let next_id = state
            .next_id
            .checked_add(1)
            .ok_or(TodoError::IdSpaceExhausted(state.next_id))?;

        let mut todos = state.todos.clone();
        todos.push(Todo::new(TodoId::new(next_id), text, env.clock.now()));

        Ok(TodoState {
            next_id,
            stage: state.stage.clone(),
            todos,
        })
    }

    fn update(state: &TodoState, update: TodoUpdate) -> Result<TodoState, TodoError> {
        let index = state
            .position(update.id)
            .ok_or(TodoError::NotFound(update.id))?;

        let mut todos = state.todos.clone();
        todos[index] = state.todos[index].with_text(update.text);

        Ok(TodoState {
            next_id: state.next_id,
            stage: None,
            todos,
        })
    }
}

impl Reducer for TodoReducer {
    type State = TodoState;
    type Action = TodoAction;
    type Environment = TodoEnvironment;
    type Error = TodoError;

    fn reduce(
        &self,
        state: &Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Result<Self::State, Self::Error> {
        tracing::debug!(kind = action.kind(), "Reducing todo action");

        match action {
            TodoAction::Load => Self::load(state, env),

            TodoAction::Delete(id) => Ok(Self::delete(state, id)),

            TodoAction::Toggle(id) => {
                let next = Self::toggle(state, id);
                Self::persist(&next, env)?;
                Ok(next)
            },

            TodoAction::Create(text) => {
                let next = Self::create(state, text, env)?;
                Self::persist(&next, env)?;
                Ok(next)
            },

            TodoAction::ToggleUpdate(stage) => Ok(TodoState {
                stage,
                ..state.clone()
            }),

            TodoAction::Update(update) => {
                let next = Self::update(state, update)?;
                Self::persist(&next, env)?;
                Ok(next)
            },

            TodoAction::Unknown => Ok(state.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use todo_store_testing::{
        FailingStorage, InMemoryStorage, ReducerTest, assertions, test_clock,
    };

    fn env_with(storage: Arc<dyn KeyValueStorage>) -> TodoEnvironment {
        TodoEnvironment::new(Arc::new(test_clock()), storage)
    }

    fn create_test_env() -> (TodoEnvironment, Arc<InMemoryStorage>) {
        let storage = Arc::new(InMemoryStorage::new());
        (env_with(storage.clone()), storage)
    }

    fn state_with(todos: &[(u64, &str, bool)]) -> TodoState {
        let now = test_clock().now();
        TodoState {
            next_id: todos.iter().map(|(id, _, _)| *id).max().unwrap_or(1),
            stage: None,
            todos: todos
                .iter()
                .map(|(id, text, done)| Todo {
                    id: TodoId::new(*id),
                    text: (*text).to_string(),
                    done: *done,
                    created_at: now,
                })
                .collect(),
        }
    }

    #[test]
    fn test_create_todo_uses_incremented_id() {
        let (env, storage) = create_test_env();

        ReducerTest::new(TodoReducer::new())
            .with_env(env)
            .given_state(TodoState::new())
            .when_action(TodoAction::create("buy milk"))
            .then_state(move |state, _| {
                assert_eq!(state.next_id, 2);
                assert_eq!(state.count(), 1);
                let todo = &state.todos[0];
                assert_eq!(todo.id, TodoId::new(2));
                assert_eq!(todo.text, "buy milk");
                assert!(!todo.done);
                assert_eq!(todo.created_at, test_clock().now());
                assert_eq!(storage.writes(), 1);
            })
            .run();
    }

    #[test]
    fn test_create_appends_and_keeps_stage() {
        let (env, _) = create_test_env();
        let mut given = state_with(&[(2, "buy milk", false)]);
        given.stage = given.todos.first().cloned();

        ReducerTest::new(TodoReducer::new())
            .with_env(env)
            .given_state(given)
            .when_action(TodoAction::create(""))
            .then_state(|state, before| {
                assert_eq!(state.next_id, 3);
                assert_eq!(state.todos[..1], before.todos[..]);
                assert_eq!(state.todos[1].id, TodoId::new(3));
                assert_eq!(state.todos[1].text, "");
                assert_eq!(state.stage, before.stage);
            })
            .run();
    }

    #[test]
    fn test_create_persists_full_snapshot() {
        let (env, storage) = create_test_env();

        let next = TodoReducer::new()
            .reduce(&TodoState::new(), TodoAction::create("buy milk"), &env)
            .unwrap();

        let stored: TodoState =
            serde_json::from_str(&storage.value(STORAGE_KEY).unwrap()).unwrap();
        assert_eq!(stored, next);
    }

    #[test]
    fn test_create_at_counter_limit_fails() {
        let (env, storage) = create_test_env();
        let mut given = TodoState::new();
        given.next_id = u64::MAX;

        ReducerTest::new(TodoReducer::new())
            .with_env(env)
            .given_state(given)
            .when_action(TodoAction::create("one too many"))
            .then_error(move |error| {
                assert!(matches!(error, TodoError::IdSpaceExhausted(u64::MAX)));
                assert_eq!(storage.writes(), 0);
            })
            .run();
    }

    #[test]
    fn test_delete_removes_every_match_without_persisting() {
        let (env, storage) = create_test_env();

        ReducerTest::new(TodoReducer::new())
            .with_env(env)
            .given_state(state_with(&[(2, "a", false), (3, "b", false), (2, "c", true)]))
            .when_action(TodoAction::delete(TodoId::new(2)))
            .then_state(move |state, before| {
                assert_eq!(state.count(), 1);
                assert_eq!(state.todos[0].id, TodoId::new(3));
                assert_eq!(state.next_id, before.next_id);
                assert_eq!(storage.writes(), 0);
            })
            .run();
    }

    #[test]
    fn test_delete_missing_id_is_noop() {
        let (env, _) = create_test_env();

        ReducerTest::new(TodoReducer::new())
            .with_env(env)
            .given_state(state_with(&[(2, "a", false)]))
            .when_action(TodoAction::delete(TodoId::new(99)))
            .then_state(assertions::assert_unchanged)
            .run();
    }

    #[test]
    fn test_toggle_flips_and_persists() {
        let (env, storage) = create_test_env();

        ReducerTest::new(TodoReducer::new())
            .with_env(env)
            .given_state(state_with(&[(2, "a", false), (3, "b", false)]))
            .when_action(TodoAction::toggle(TodoId::new(2)))
            .then_state(move |state, before| {
                assert!(state.todos[0].done);
                assert_eq!(state.todos[1], before.todos[1]);
                assert_eq!(storage.writes(), 1);
            })
            .run();
    }

    #[test]
    fn test_toggle_missing_id_still_persists() {
        let (env, storage) = create_test_env();

        ReducerTest::new(TodoReducer::new())
            .with_env(env)
            .given_state(state_with(&[(2, "a", false)]))
            .when_action(TodoAction::toggle(TodoId::new(42)))
            .then_state(move |state, before| {
                assert_eq!(state, before);
                assert_eq!(storage.writes(), 1);
            })
            .run();
    }

    #[test]
    fn test_toggle_update_stages_without_persisting() {
        let (env, storage) = create_test_env();
        let given = state_with(&[(2, "a", false)]);
        let staged = given.todos[0].clone();

        ReducerTest::new(TodoReducer::new())
            .with_env(env)
            .given_state(given)
            .when_action(TodoAction::toggle_update(Some(staged.clone())))
            .then_state(move |state, before| {
                assert_eq!(state.stage, Some(staged));
                assert_eq!(state.todos, before.todos);
                assert_eq!(storage.writes(), 0);
            })
            .run();
    }

    #[test]
    fn test_toggle_update_none_clears_stage() {
        let (env, _) = create_test_env();
        let mut given = state_with(&[(2, "a", false)]);
        given.stage = given.todos.first().cloned();

        ReducerTest::new(TodoReducer::new())
            .with_env(env)
            .given_state(given)
            .when_action(TodoAction::toggle_update(None))
            .then_state(|state, _| assert_eq!(state.stage, None))
            .run();
    }

    #[test]
    fn test_update_replaces_text_in_place() {
        let (env, storage) = create_test_env();
        let mut given = state_with(&[(2, "a", true), (3, "b", false), (2, "dup", false)]);
        given.stage = given.todos.first().cloned();

        ReducerTest::new(TodoReducer::new())
            .with_env(env)
            .given_state(given)
            .when_action(TodoAction::update(TodoId::new(2), "rewritten"))
            .then_state(move |state, before| {
                assert_eq!(state.todos[0].text, "rewritten");
                assert_eq!(state.todos[0].id, TodoId::new(2));
                assert!(state.todos[0].done);
                assert_eq!(state.todos[1..], before.todos[1..]);
                assert_eq!(state.stage, None);
                assert_eq!(storage.writes(), 1);
            })
            .run();
    }

    #[test]
    fn test_update_missing_id_fails() {
        let (env, storage) = create_test_env();

        ReducerTest::new(TodoReducer::new())
            .with_env(env)
            .given_state(state_with(&[(2, "a", false)]))
            .when_action(TodoAction::update(TodoId::new(7), "nope"))
            .then_error(move |error| {
                assert!(matches!(error, TodoError::NotFound(id) if *id == TodoId::new(7)));
                assert_eq!(storage.writes(), 0);
            })
            .run();
    }

    #[test]
    fn test_load_without_snapshot_keeps_state() {
        let (env, _) = create_test_env();

        ReducerTest::new(TodoReducer::new())
            .with_env(env)
            .given_state(state_with(&[(2, "a", false)]))
            .when_action(TodoAction::load())
            .then_state(assertions::assert_unchanged)
            .run();
    }

    #[test]
    fn test_load_empty_snapshot_keeps_state() {
        let storage = Arc::new(InMemoryStorage::with_entry(STORAGE_KEY, ""));

        ReducerTest::new(TodoReducer::new())
            .with_env(env_with(storage))
            .given_state(TodoState::new())
            .when_action(TodoAction::load())
            .then_state(assertions::assert_unchanged)
            .run();
    }

    #[test]
    fn test_load_replaces_whole_state() {
        let snapshot = r#"{"nextId":9,"stage":null,"todos":[{"id":9,"text":"stored","done":true,"at":"2024-06-01T12:00:00.000Z"}]}"#;
        let storage = Arc::new(InMemoryStorage::with_entry(STORAGE_KEY, snapshot));
        let mut given = state_with(&[(2, "in memory", false)]);
        given.stage = given.todos.first().cloned();

        ReducerTest::new(TodoReducer::new())
            .with_env(env_with(storage))
            .given_state(given)
            .when_action(TodoAction::load())
            .then_state(|state, _| {
                assert_eq!(state.next_id, 9);
                assert_eq!(state.stage, None);
                assert_eq!(state.count(), 1);
                assert_eq!(state.todos[0].text, "stored");
                assert!(state.todos[0].done);
            })
            .run();
    }

    #[test]
    fn test_load_malformed_snapshot_fails() {
        let storage = Arc::new(InMemoryStorage::with_entry(STORAGE_KEY, "{not json"));

        ReducerTest::new(TodoReducer::new())
            .with_env(env_with(storage))
            .given_state(TodoState::new())
            .when_action(TodoAction::load())
            .then_error(|error| assert!(matches!(error, TodoError::Snapshot(_))))
            .run();
    }

    #[test]
    fn test_unknown_action_is_identity() {
        let (env, storage) = create_test_env();

        ReducerTest::new(TodoReducer::new())
            .with_env(env)
            .given_state(state_with(&[(2, "a", false)]))
            .when_action(TodoAction::Unknown)
            .then_state(move |state, before| {
                assert_eq!(state, before);
                assert_eq!(storage.writes(), 0);
            })
            .run();
    }

    #[test]
    fn test_storage_write_failure_propagates() {
        ReducerTest::new(TodoReducer::new())
            .with_env(env_with(Arc::new(FailingStorage::on_set())))
            .given_state(TodoState::new())
            .when_action(TodoAction::create("lost"))
            .then_error(|error| assert!(matches!(error, TodoError::Storage(_))))
            .run();
    }

    #[test]
    fn test_storage_read_failure_propagates() {
        ReducerTest::new(TodoReducer::new())
            .with_env(env_with(Arc::new(FailingStorage::on_get())))
            .given_state(TodoState::new())
            .when_action(TodoAction::load())
            .then_error(|error| assert!(matches!(error, TodoError::Storage(_))))
            .run();
    }

    #[test]
    fn test_non_persisting_actions_ignore_broken_storage() {
        let env = env_with(Arc::new(FailingStorage::always()));
        let reducer = TodoReducer::new();
        let state = state_with(&[(2, "a", false)]);

        assert!(reducer.reduce(&state, TodoAction::delete(TodoId::new(2)), &env).is_ok());
        assert!(reducer.reduce(&state, TodoAction::toggle_update(None), &env).is_ok());
        assert!(reducer.reduce(&state, TodoAction::Unknown, &env).is_ok());
    }

    #[test]
    fn test_created_at_comes_from_clock() {
        let later = Utc::now();
        let env = TodoEnvironment::new(
            Arc::new(todo_store_testing::FixedClock::new(later)),
            Arc::new(InMemoryStorage::new()),
        );

        let next = TodoReducer::new()
            .reduce(&TodoState::new(), TodoAction::create("x"), &env)
            .unwrap();

        assert_eq!(next.todos[0].created_at, later);
    }
}
