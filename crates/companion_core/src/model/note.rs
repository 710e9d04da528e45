//! Notebook entry.

use super::record::{new_record_id, require_text, Record, RecordId, ValidationError};
use serde::{Deserialize, Serialize};

/// One note with a title and multi-line body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: RecordId,
    pub title: String,
    pub content: String,
}

impl Note {
    /// Creates a note with a fresh id.
    ///
    /// The title is trimmed; the body keeps its line breaks and indentation
    /// but must contain something other than whitespace.
    pub fn new(title: &str, content: &str) -> Result<Self, ValidationError> {
        let title = require_text("title", title)?;
        require_text("content", content)?;
        Ok(Self {
            id: new_record_id(),
            title,
            content: content.to_string(),
        })
    }
}

impl Record for Note {
    fn id(&self) -> RecordId {
        self.id
    }
}
