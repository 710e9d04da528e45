//! Shared record contract for list-backed features.
//!
//! # Responsibility
//! - Define the identity every persisted record carries.
//! - Provide the "required text" gate used by every `add` path.
//!
//! # Invariants
//! - `RecordId` is generated once at creation and never reassigned.
//! - A required text field is valid only when non-empty after trimming.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of one persisted record.
pub type RecordId = Uuid;

/// One item of a persisted list (task, note or appointment).
pub trait Record: Clone + Serialize + DeserializeOwned {
    /// Stable identity, unique within its list.
    fn id(&self) -> RecordId;
}

/// Validation failure raised before a record is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required text field is empty or whitespace-only.
    EmptyField(&'static str),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "{field} must not be empty"),
        }
    }
}

impl Error for ValidationError {}

/// Returns the trimmed value, or `EmptyField(field)` when nothing is left.
pub fn require_text(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn new_record_id() -> RecordId {
    Uuid::new_v4()
}
