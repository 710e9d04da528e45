//! Local database for everything the app persists.
//!
//! One SQLite file holds the `kv_entries` table; each `StorageKey` owns one
//! row. Connections come out of `open_db`/`open_db_in_memory` migrated and
//! ready for `SqliteKeyValueStore`.
//!
//! A file written by a newer app build is refused rather than migrated down.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Why the local database could not be opened or prepared.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The directory meant to hold the database file does not exist.
    MissingDirectory(PathBuf),
    /// `PRAGMA user_version` is ahead of the migrations this build ships.
    NewerStorageFormat { found: u32, supported: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite: {err}"),
            Self::MissingDirectory(dir) => {
                write!(f, "database directory does not exist: {}", dir.display())
            }
            Self::NewerStorageFormat { found, supported } => write!(
                f,
                "stored data uses format {found}, this build reads up to {supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
