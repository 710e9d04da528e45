//! Persistence layer: key-value store seam and list encoding.
//!
//! # Responsibility
//! - Define the injected `KeyValueStore` contract and its implementations.
//! - Encode/decode whole lists under explicit `StorageKey`s.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`Corrupt`,
//!   `UnsupportedSchemaVersion`) in addition to transport errors.
//! - Nothing in this layer swallows an error.

pub mod keys;
pub mod kv_store;
pub mod list_repo;

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub use keys::StorageKey;
pub use kv_store::{KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore};
pub use list_repo::{ListRepository, LEGACY_SCHEMA_VERSION, LIST_SCHEMA_VERSION};

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence error for key-value and list operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Backend refused the operation (e.g. read-only store).
    Unavailable(String),
    /// Stored value could not be decoded.
    Corrupt { key: StorageKey, message: String },
    /// Stored list was written by a newer payload schema.
    UnsupportedSchemaVersion {
        key: StorageKey,
        found: u64,
        latest_supported: u32,
    },
    /// Value could not be encoded.
    Encode { key: StorageKey, message: String },
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Unavailable(message) => write!(f, "storage unavailable: {message}"),
            Self::Corrupt { key, message } => {
                write!(f, "stored value for `{key}` is unreadable: {message}")
            }
            Self::UnsupportedSchemaVersion {
                key,
                found,
                latest_supported,
            } => write!(
                f,
                "stored value for `{key}` has schema version {found}, newer than supported {latest_supported}"
            ),
            Self::Encode { key, message } => {
                write!(f, "failed to encode value for `{key}`: {message}")
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it with open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
