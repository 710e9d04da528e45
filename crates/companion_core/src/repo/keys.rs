//! Storage key namespace.
//!
//! # Invariants
//! - Key strings are persisted; renaming one orphans existing user data.

use std::fmt::{Display, Formatter};

/// Closed set of keys in the flat key-value namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StorageKey {
    /// Ordered menu labels.
    ItemOrder,
    Appointments,
    Notes,
    ToDoItems,
    /// Countdown seconds left (JSON number).
    RemainingTime,
    /// Countdown running flag (JSON bool).
    IsRunning,
}

impl StorageKey {
    pub const ALL: [StorageKey; 6] = [
        StorageKey::ItemOrder,
        StorageKey::Appointments,
        StorageKey::Notes,
        StorageKey::ToDoItems,
        StorageKey::RemainingTime,
        StorageKey::IsRunning,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ItemOrder => "ItemOrder",
            Self::Appointments => "Appointments",
            Self::Notes => "Notes",
            Self::ToDoItems => "ToDoItems",
            Self::RemainingTime => "RemainingTime",
            Self::IsRunning => "IsRunning",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == value)
    }
}

impl Display for StorageKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
