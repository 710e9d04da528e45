//! To-do list item.

use super::record::{new_record_id, require_text, Record, RecordId, ValidationError};
use serde::{Deserialize, Serialize};

/// One to-do entry.
///
/// Serialized as `{"id", "title", "isCompleted"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    pub id: RecordId,
    pub title: String,
    #[serde(default)]
    pub is_completed: bool,
}

impl TodoItem {
    /// Creates an open task with a fresh id.
    ///
    /// # Errors
    /// - `EmptyField("title")` when `title` is blank.
    pub fn new(title: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            id: new_record_id(),
            title: require_text("title", title)?,
            is_completed: false,
        })
    }

    pub fn toggle(&mut self) {
        self.is_completed = !self.is_completed;
    }
}

impl Record for TodoItem {
    fn id(&self) -> RecordId {
        self.id
    }
}
