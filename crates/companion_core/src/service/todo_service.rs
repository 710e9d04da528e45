//! To-do list use-case service.
//!
//! # Invariants
//! - New tasks start open and are appended at the end.
//! - Toggling flips exactly one task, located by id.

use crate::model::record::RecordId;
use crate::model::task::TodoItem;
use crate::repo::{KeyValueStore, RepoError, StorageKey};
use crate::service::list_controller::{ControllerResult, ListController};

/// To-do screen state over the `ToDoItems` list.
pub struct TodoService<S: KeyValueStore> {
    list: ListController<TodoItem, S>,
}

impl<S: KeyValueStore> TodoService<S> {
    /// Loads the task list; load problems are exposed via `load_issue`.
    pub fn open(store: S) -> Self {
        Self {
            list: ListController::open(store, StorageKey::ToDoItems),
        }
    }

    pub fn items(&self) -> &[TodoItem] {
        self.list.items()
    }

    pub fn get(&self, id: RecordId) -> Option<&TodoItem> {
        self.list.get(id)
    }

    pub fn load_issue(&self) -> Option<&RepoError> {
        self.list.load_issue()
    }

    /// Appends a new open task.
    pub fn add_task(&mut self, title: &str) -> ControllerResult<RecordId> {
        self.list.add(|| TodoItem::new(title))
    }

    /// Flips completion. Returns `false` when `id` is unknown.
    pub fn toggle(&mut self, id: RecordId) -> ControllerResult<bool> {
        self.list.update(id, TodoItem::toggle)
    }

    /// Deletes the task at `position`. Out of range is a no-op.
    pub fn remove(&mut self, position: usize) -> ControllerResult<Option<TodoItem>> {
        self.list.remove(position)
    }
}
