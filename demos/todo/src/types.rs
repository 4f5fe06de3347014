//! Domain types for the todo list.
//!
//! A todo list is an ordered collection of todo items plus an id counter and
//! an optional item staged for editing. The whole [`TodoState`] is what gets
//! snapshotted into storage, so its serde shape is the snapshot format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a todo item
///
/// Serialized as a bare JSON integer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(u64);

impl TodoId {
    /// Creates a `TodoId` from its raw value
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for TodoId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

/// A single todo item
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Unique identifier within a state's collection
    pub id: TodoId,
    /// What needs doing
    pub text: String,
    /// Whether the todo is completed
    pub done: bool,
    /// When the todo was created
    #[serde(rename = "at", alias = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Todo {
    /// Creates a new, not yet completed todo item
    #[must_use]
    pub fn new(id: TodoId, text: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            text: text.into(),
            done: false,
            created_at,
        }
    }

    /// Copy of this todo with `done` flipped
    #[must_use]
    pub fn toggled(&self) -> Self {
        Self {
            done: !self.done,
            ..self.clone()
        }
    }

    /// Copy of this todo with its text replaced
    #[must_use]
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..self.clone()
        }
    }
}

/// State of the todo list
///
/// `next_id` is the last id handed out, not the next free one: creation
/// increments it first and uses the incremented value, so a fresh state
/// (`next_id == 1`) hands out 2 first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoState {
    /// Id counter
    pub next_id: u64,
    /// Todo currently selected for editing
    pub stage: Option<Todo>,
    /// All todos in insertion order
    pub todos: Vec<Todo>,
}

impl TodoState {
    /// Creates the initial state: `{ nextId: 1, stage: null, todos: [] }`
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next_id: 1,
            stage: None,
            todos: Vec::new(),
        }
    }

    /// Returns the number of todos
    #[must_use]
    pub fn count(&self) -> usize {
        self.todos.len()
    }

    /// Returns the number of completed todos
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.todos.iter().filter(|t| t.done).count()
    }

    /// Returns the first todo with the given id
    #[must_use]
    pub fn get(&self, id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == id)
    }

    /// Returns the list position of the first todo with the given id
    #[must_use]
    pub fn position(&self, id: TodoId) -> Option<usize> {
        self.todos.iter().position(|t| t.id == id)
    }
}

impl Default for TodoState {
    fn default() -> Self {
        Self::new()
    }
}

/// Payload of an update action
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoUpdate {
    /// Todo to rewrite
    pub id: TodoId,
    /// Replacement text
    pub text: String,
}

/// Actions accepted by the todo reducer
///
/// On the wire an action is `{"type": "<KIND>", "payload": ...}`. A `type`
/// this enum does not know decodes as [`TodoAction::Unknown`], which the
/// reducer treats as the identity transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "payload",
    rename_all = "SCREAMING_SNAKE_CASE",
    try_from = "ActionEnvelope"
)]
pub enum TodoAction {
    /// Append a new todo with this text
    Create(String),
    /// Remove every todo with this id
    Delete(TodoId),
    /// Replace the text of the first todo with this id
    Update(TodoUpdate),
    /// Flip `done` on every todo with this id
    Toggle(TodoId),
    /// Stage a todo for editing, or clear the stage
    ToggleUpdate(Option<Todo>),
    /// Restore the whole state from storage
    Load,
    /// Any action kind this reducer does not handle
    Unknown,
}

/// Undecoded `{type, payload}` pair
#[derive(Deserialize)]
struct ActionEnvelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    payload: serde_json::Value,
}

impl TryFrom<ActionEnvelope> for TodoAction {
    type Error = serde_json::Error;

    fn try_from(envelope: ActionEnvelope) -> Result<Self, Self::Error> {
        let payload = envelope.payload;
        Ok(match envelope.kind.as_str() {
            "CREATE" => Self::Create(serde_json::from_value(payload)?),
            "DELETE" => Self::Delete(serde_json::from_value(payload)?),
            "UPDATE" => Self::Update(serde_json::from_value(payload)?),
            "TOGGLE" => Self::Toggle(serde_json::from_value(payload)?),
            "TOGGLE_UPDATE" => Self::ToggleUpdate(serde_json::from_value(payload)?),
            "LOAD" => Self::Load,
            _ => Self::Unknown,
        })
    }
}

impl TodoAction {
    /// Action that creates a todo
    #[must_use]
    pub fn create(text: impl Into<String>) -> Self {
        Self::Create(text.into())
    }

    /// Action that deletes todos by id
    #[must_use]
    pub const fn delete(id: TodoId) -> Self {
        Self::Delete(id)
    }

    /// Action that rewrites a todo's text
    #[must_use]
    pub fn update(id: TodoId, text: impl Into<String>) -> Self {
        Self::Update(TodoUpdate {
            id,
            text: text.into(),
        })
    }

    /// Action that flips a todo's completion
    #[must_use]
    pub const fn toggle(id: TodoId) -> Self {
        Self::Toggle(id)
    }

    /// Action that stages a todo for editing (`None` clears the stage)
    #[must_use]
    pub const fn toggle_update(stage: Option<Todo>) -> Self {
        Self::ToggleUpdate(stage)
    }

    /// Action that restores state from storage
    #[must_use]
    pub const fn load() -> Self {
        Self::Load
    }

    /// Wire discriminant of this action
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Create(_) => "CREATE",
            Self::Delete(_) => "DELETE",
            Self::Update(_) => "UPDATE",
            Self::Toggle(_) => "TOGGLE",
            Self::ToggleUpdate(_) => "TOGGLE_UPDATE",
            Self::Load => "LOAD",
            Self::Unknown => "UNKNOWN",
        }
    }
}
