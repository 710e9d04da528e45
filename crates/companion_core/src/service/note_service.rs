//! Notebook use-case service.

use crate::model::note::Note;
use crate::model::record::RecordId;
use crate::repo::{KeyValueStore, RepoError, StorageKey};
use crate::service::list_controller::{ControllerResult, ListController};

/// Notebook screen state over the `Notes` list.
pub struct NoteService<S: KeyValueStore> {
    list: ListController<Note, S>,
}

impl<S: KeyValueStore> NoteService<S> {
    pub fn open(store: S) -> Self {
        Self {
            list: ListController::open(store, StorageKey::Notes),
        }
    }

    pub fn items(&self) -> &[Note] {
        self.list.items()
    }

    pub fn get(&self, id: RecordId) -> Option<&Note> {
        self.list.get(id)
    }

    pub fn load_issue(&self) -> Option<&RepoError> {
        self.list.load_issue()
    }

    /// Appends a note. Both title and content are required.
    pub fn add_note(&mut self, title: &str, content: &str) -> ControllerResult<RecordId> {
        self.list.add(|| Note::new(title, content))
    }

    pub fn remove(&mut self, position: usize) -> ControllerResult<Option<Note>> {
        self.list.remove(position)
    }
}
