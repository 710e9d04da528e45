//! Generic in-memory list controller with write-through persistence.
//!
//! # Responsibility
//! - Hold one feature's list for the lifetime of its screen.
//! - Apply add/update/remove and persist the full list after each mutation.
//!
//! # Invariants
//! - Memory and storage never diverge: a candidate list is saved first and
//!   only then becomes the in-memory list.
//! - Rejected or no-op operations perform no write.
//! - A list written by a newer schema is never overwritten.

use crate::model::record::{Record, RecordId, ValidationError};
use crate::repo::{KeyValueStore, ListRepository, RepoError, StorageKey};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ControllerResult<T> = Result<T, ControllerError>;

/// Error surfaced to the UI layer by list mutations.
#[derive(Debug)]
pub enum ControllerError {
    /// Input rejected before anything changed.
    Validation(ValidationError),
    /// Persisting the new list failed; the in-memory list is unchanged.
    Repo(RepoError),
    /// Stored data comes from a newer schema; writes are refused.
    ReadOnly(StorageKey),
}

impl Display for ControllerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::ReadOnly(key) => write!(
                f,
                "`{key}` was written by a newer app version and is read-only"
            ),
        }
    }
}

impl Error for ControllerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::ReadOnly(_) => None,
        }
    }
}

impl From<ValidationError> for ControllerError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ControllerError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// One feature's loaded list plus the store it persists to.
pub struct ListController<T: Record, S: KeyValueStore> {
    repo: ListRepository<S>,
    key: StorageKey,
    items: Vec<T>,
    load_issue: Option<RepoError>,
}

impl<T: Record, S: KeyValueStore> ListController<T, S> {
    /// Loads the list for `key`, degrading to an empty list on load failure.
    ///
    /// The failure stays observable through `load_issue()`.
    pub fn open(store: S, key: StorageKey) -> Self {
        let mut controller = Self {
            repo: ListRepository::new(store),
            key,
            items: Vec::new(),
            load_issue: None,
        };
        controller.reload();
        controller
    }

    /// Loads the list for `key`, failing on any load error.
    pub fn try_open(store: S, key: StorageKey) -> ControllerResult<Self> {
        let repo = ListRepository::new(store);
        let items = repo.load_records(key)?;
        Ok(Self {
            repo,
            key,
            items,
            load_issue: None,
        })
    }

    /// Re-reads storage, replacing the in-memory list.
    pub fn reload(&mut self) {
        match self.repo.load_records(self.key) {
            Ok(items) => {
                self.items = items;
                self.load_issue = None;
            }
            Err(err) => {
                warn!(
                    "event=list_open module=service status=degraded key={} error={}",
                    self.key, err
                );
                self.items = Vec::new();
                self.load_issue = Some(err);
            }
        }
    }

    pub fn key(&self) -> StorageKey {
        self.key
    }

    /// Records in storage order.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: RecordId) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn position_of(&self, id: RecordId) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    /// Problem hit by the last load, if any.
    pub fn load_issue(&self) -> Option<&RepoError> {
        self.load_issue.as_ref()
    }

    /// Validates via `build`, then appends and persists.
    ///
    /// # Errors
    /// - `Validation` when `build` rejects the input (list unchanged).
    /// - `Repo` when the save fails (list unchanged).
    pub fn add(
        &mut self,
        build: impl FnOnce() -> Result<T, ValidationError>,
    ) -> ControllerResult<RecordId> {
        self.ensure_writable()?;
        let record = build()?;
        let id = record.id();

        let mut candidate = self.items.clone();
        candidate.push(record);
        self.commit(candidate, "add")?;
        Ok(id)
    }

    /// Mutates the record with `id` in place and persists.
    ///
    /// Returns `false` (and writes nothing) when `id` is unknown.
    pub fn update(
        &mut self,
        id: RecordId,
        mutator: impl FnOnce(&mut T),
    ) -> ControllerResult<bool> {
        self.ensure_writable()?;
        let Some(position) = self.position_of(id) else {
            return Ok(false);
        };

        let mut candidate = self.items.clone();
        mutator(&mut candidate[position]);
        self.commit(candidate, "update")?;
        Ok(true)
    }

    /// Removes the record at `position` in storage order and persists.
    ///
    /// Returns `None` (and writes nothing) when out of range.
    pub fn remove(&mut self, position: usize) -> ControllerResult<Option<T>> {
        self.ensure_writable()?;
        if position >= self.items.len() {
            return Ok(None);
        }

        let mut candidate = self.items.clone();
        let removed = candidate.remove(position);
        self.commit(candidate, "remove")?;
        Ok(Some(removed))
    }

    fn ensure_writable(&self) -> ControllerResult<()> {
        if matches!(
            self.load_issue,
            Some(RepoError::UnsupportedSchemaVersion { .. })
        ) {
            return Err(ControllerError::ReadOnly(self.key));
        }
        Ok(())
    }

    fn commit(&mut self, candidate: Vec<T>, op: &'static str) -> ControllerResult<()> {
        if let Err(err) = self.repo.save(self.key, &candidate) {
            warn!(
                "event=list_mutate module=service status=error op={} key={} error={}",
                op, self.key, err
            );
            return Err(err.into());
        }

        info!(
            "event=list_mutate module=service status=ok op={} key={} count={}",
            op,
            self.key,
            candidate.len()
        );
        self.items = candidate;
        self.load_issue = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ControllerError, ListController};
    use crate::model::task::TodoItem;
    use crate::repo::{KeyValueStore, MemoryKeyValueStore, RepoError, StorageKey};

    #[test]
    fn failed_save_keeps_memory_in_sync_with_storage() {
        let store = MemoryKeyValueStore::new();
        let mut controller = ListController::<TodoItem, _>::open(&store, StorageKey::ToDoItems);
        controller.add(|| TodoItem::new("first")).unwrap();

        store.set_read_only(true);
        let err = controller.add(|| TodoItem::new("second")).unwrap_err();
        assert!(matches!(err, ControllerError::Repo(RepoError::Unavailable(_))));
        assert_eq!(controller.len(), 1);
        assert_eq!(controller.items()[0].title, "first");
    }

    #[test]
    fn corrupt_storage_degrades_to_empty_with_issue() {
        let store = MemoryKeyValueStore::new();
        store.set(StorageKey::ToDoItems, "{not json").unwrap();

        let controller = ListController::<TodoItem, _>::open(&store, StorageKey::ToDoItems);
        assert!(controller.is_empty());
        assert!(matches!(
            controller.load_issue(),
            Some(RepoError::Corrupt { .. })
        ));
    }

    #[test]
    fn newer_schema_is_read_only() {
        let store = MemoryKeyValueStore::new();
        store
            .set(StorageKey::ToDoItems, r#"{"schema_version":99,"items":[]}"#)
            .unwrap();

        let mut controller = ListController::<TodoItem, _>::open(&store, StorageKey::ToDoItems);
        let err = controller.add(|| TodoItem::new("x")).unwrap_err();
        assert!(matches!(err, ControllerError::ReadOnly(StorageKey::ToDoItems)));
        assert!(store
            .raw(StorageKey::ToDoItems)
            .unwrap()
            .contains("\"schema_version\":99"));
    }

    #[test]
    fn no_op_operations_do_not_write() {
        let store = MemoryKeyValueStore::new();
        let mut controller = ListController::<TodoItem, _>::open(&store, StorageKey::ToDoItems);

        assert!(!controller.update(uuid::Uuid::new_v4(), TodoItem::toggle).unwrap());
        assert!(controller.remove(3).unwrap().is_none());
        assert!(controller.add(|| TodoItem::new("   ")).is_err());
        assert_eq!(store.write_count(), 0);
    }
}
