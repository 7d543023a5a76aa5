//! Todo record and request payload handling.

use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::error::{TodoError, TodoResult};

/// A single task record as stored in the collection file.
///
/// The record is kept as a JSON object: `id`, `title` and `completed` have
/// accessors, but no field is type-checked, so whatever a caller merged in is
/// written back unchanged. Key order follows insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Todo(JsonMap<String, JsonValue>);

impl Todo {
    pub fn new(id: u64, title: impl Into<JsonValue>, completed: impl Into<JsonValue>) -> Self {
        let mut fields = JsonMap::new();
        fields.insert("id".to_string(), JsonValue::from(id));
        fields.insert("title".to_string(), title.into());
        fields.insert("completed".to_string(), completed.into());
        Self(fields)
    }

    /// Integer id, if the stored `id` is a non-negative integer.
    pub fn id(&self) -> Option<u64> {
        self.0.get("id").and_then(JsonValue::as_u64)
    }

    pub fn title(&self) -> Option<&JsonValue> {
        self.0.get("title")
    }

    pub fn completed(&self) -> Option<&JsonValue> {
        self.0.get("completed")
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.0.get(key)
    }

    /// Shallow-merges `patch` over this record, like an object spread.
    ///
    /// Object keys overwrite same-named fields and new keys are appended;
    /// arrays and strings spread their indices; other values add nothing.
    /// The record keeps its own `id`.
    pub fn merge(&mut self, patch: JsonValue) {
        for (key, value) in spread_entries(patch) {
            if key == "id" {
                continue;
            }
            self.0.insert(key, value);
        }
    }
}

fn spread_entries(value: JsonValue) -> Vec<(String, JsonValue)> {
    match value {
        JsonValue::Object(fields) => fields.into_iter().collect(),
        JsonValue::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| (index.to_string(), item))
            .collect(),
        JsonValue::String(text) => text
            .chars()
            .enumerate()
            .map(|(index, ch)| (index.to_string(), JsonValue::String(ch.to_string())))
            .collect(),
        JsonValue::Null | JsonValue::Bool(_) | JsonValue::Number(_) => Vec::new(),
    }
}

/// Validated input for the create operation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTodo {
    pub title: JsonValue,
    pub completed: JsonValue,
}

impl NewTodo {
    /// Extracts `title` and `completed` from a parsed create body.
    ///
    /// A missing or falsy title (`null`, `""`, `false`, `0`) and a body that is
    /// not an object both count as a missing title. Any truthy title is kept
    /// as sent; `completed` defaults to `false` only when absent or `null`.
    pub fn from_body(body: &JsonValue) -> TodoResult<Self> {
        let Some(fields) = body.as_object() else {
            return Err(TodoError::MissingTitle);
        };

        let title = match fields.get("title") {
            Some(value) if !is_falsy(value) => value.clone(),
            _ => return Err(TodoError::MissingTitle),
        };

        let completed = match fields.get("completed") {
            None | Some(JsonValue::Null) => JsonValue::Bool(false),
            Some(value) => value.clone(),
        };

        Ok(Self { title, completed })
    }

    pub fn into_todo(self, id: u64) -> Todo {
        Todo::new(id, self.title, self.completed)
    }
}

fn is_falsy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => true,
        JsonValue::Bool(flag) => !flag,
        JsonValue::String(text) => text.is_empty(),
        JsonValue::Number(number) => number.as_f64() == Some(0.0),
        JsonValue::Array(_) | JsonValue::Object(_) => false,
    }
}

/// Next id for a new record: one past the largest integer id, or 1 when
/// there is none.
pub fn next_id(todos: &[Todo]) -> u64 {
    todos
        .iter()
        .filter_map(Todo::id)
        .max()
        .map_or(1, |max| max.saturating_add(1))
}

/// Keeps the records whose `completed` value renders as `filter`.
///
/// `None` returns the collection unchanged.
pub fn filter_by_completed(todos: Vec<Todo>, filter: Option<&str>) -> Vec<Todo> {
    match filter {
        Some(expected) => todos
            .into_iter()
            .filter(|todo| render_flag(todo.completed()) == expected)
            .collect(),
        None => todos,
    }
}

/// Text form used for query comparison; an absent field renders as
/// `undefined`.
fn render_flag(value: Option<&JsonValue>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(JsonValue::String(text)) => text.clone(),
        Some(JsonValue::Array(items)) => items
            .iter()
            .map(|item| match item {
                JsonValue::Null => String::new(),
                other => render_flag(Some(other)),
            })
            .collect::<Vec<_>>()
            .join(","),
        Some(JsonValue::Object(_)) => "[object Object]".to_string(),
        Some(other) => other.to_string(),
    }
}
