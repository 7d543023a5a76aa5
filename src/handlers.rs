//! One function per todo operation.
//!
//! Each handler performs a fresh read of the collection and, when mutating,
//! rewrites it in full. Nothing here serialises concurrent requests.

use serde_json::Value as JsonValue;
use tracing::debug;

use crate::{
    error::{TodoError, TodoResult},
    models::{NewTodo, Todo, filter_by_completed, next_id},
    storage::TodoStore,
};

pub async fn list_todos(store: &dyn TodoStore, completed: Option<&str>) -> TodoResult<Vec<Todo>> {
    let todos = store.read_all().await?;
    Ok(filter_by_completed(todos, completed))
}

pub async fn get_todo(store: &dyn TodoStore, id: &str) -> TodoResult<Todo> {
    let todos = store.read_all().await?;
    let index = position(&todos, id).ok_or(TodoError::NotFound)?;
    Ok(todos[index].clone())
}

pub async fn create_todo(store: &dyn TodoStore, body: &[u8]) -> TodoResult<Todo> {
    let payload: JsonValue = serde_json::from_slice(body)?;
    let new_todo = NewTodo::from_body(&payload)?;

    let mut todos = store.read_all().await?;
    let todo = new_todo.into_todo(next_id(&todos));
    todos.push(todo.clone());
    store.write_all(&todos).await?;

    debug!(id = todo.id(), "todo created");
    Ok(todo)
}

pub async fn update_todo(store: &dyn TodoStore, id: &str, body: &[u8]) -> TodoResult<Todo> {
    let patch: JsonValue = serde_json::from_slice(body)?;

    let mut todos = store.read_all().await?;
    let index = position(&todos, id).ok_or(TodoError::NotFound)?;
    todos[index].merge(patch);
    store.write_all(&todos).await?;

    let updated = todos.swap_remove(index);
    debug!(id = updated.id(), "todo updated");
    Ok(updated)
}

pub async fn delete_todo(store: &dyn TodoStore, id: &str) -> TodoResult<Todo> {
    let mut todos = store.read_all().await?;
    let index = position(&todos, id).ok_or(TodoError::NotFound)?;
    let removed = todos.remove(index);
    store.write_all(&todos).await?;

    debug!(id = removed.id(), "todo deleted");
    Ok(removed)
}

/// Index of the record whose id equals the digit string `id`.
///
/// Digit strings too large for `u64` cannot name a stored record.
fn position(todos: &[Todo], id: &str) -> Option<usize> {
    let id = id.parse::<u64>().ok()?;
    todos.iter().position(|todo| todo.id() == Some(id))
}
