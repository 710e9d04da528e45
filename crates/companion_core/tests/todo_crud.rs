use companion_core::db::open_db;
use companion_core::{
    ControllerError, MemoryKeyValueStore, RepoError, SqliteKeyValueStore, StorageKey, TodoService,
    ValidationError,
};

#[test]
fn buy_milk_scenario_round_trips_through_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("companion.sqlite3");

    let id = {
        let conn = open_db(&path).unwrap();
        let store = SqliteKeyValueStore::try_new(&conn).unwrap();
        let mut todo = TodoService::open(store);
        let id = todo.add_task("Buy milk").unwrap();
        assert!(todo.toggle(id).unwrap());
        assert!(todo.get(id).unwrap().is_completed);
        id
    };

    let conn = open_db(&path).unwrap();
    let mut todo = TodoService::open(SqliteKeyValueStore::try_new(&conn).unwrap());
    assert!(todo.load_issue().is_none());
    assert_eq!(todo.items().len(), 1);
    assert_eq!(todo.items()[0].id, id);
    assert_eq!(todo.items()[0].title, "Buy milk");
    assert!(todo.items()[0].is_completed);

    let removed = todo.remove(0).unwrap().unwrap();
    assert_eq!(removed.id, id);
    assert!(todo.items().is_empty());

    let reopened = TodoService::open(SqliteKeyValueStore::try_new(&conn).unwrap());
    assert!(reopened.items().is_empty());
}

#[test]
fn blank_title_leaves_list_and_storage_untouched() {
    let store = MemoryKeyValueStore::new();
    let mut todo = TodoService::open(&store);
    todo.add_task("Keep").unwrap();
    let writes = store.write_count();

    let err = todo.add_task("   ").unwrap_err();
    assert!(matches!(
        err,
        ControllerError::Validation(ValidationError::EmptyField("title"))
    ));
    assert_eq!(todo.items().len(), 1);
    assert_eq!(store.write_count(), writes);
}

#[test]
fn add_grows_by_one_and_remove_out_of_range_is_noop() {
    let store = MemoryKeyValueStore::new();
    let mut todo = TodoService::open(&store);
    for title in ["a", "b", "c"] {
        let before = todo.items().len();
        let id = todo.add_task(title).unwrap();
        assert_eq!(todo.items().len(), before + 1);
        assert_eq!(todo.get(id).unwrap().title, title);
    }

    let writes = store.write_count();
    assert!(todo.remove(3).unwrap().is_none());
    assert!(!todo.toggle(uuid::Uuid::new_v4()).unwrap());
    assert_eq!(store.write_count(), writes);

    todo.remove(1).unwrap();
    let reopened = TodoService::open(&store);
    let titles = reopened
        .items()
        .iter()
        .map(|item| item.title.as_str())
        .collect::<Vec<_>>();
    assert_eq!(titles, vec!["a", "c"]);
}

#[test]
fn failed_save_keeps_memory_in_sync_with_storage() {
    let store = MemoryKeyValueStore::new();
    let mut todo = TodoService::open(&store);
    todo.add_task("first").unwrap();

    store.set_read_only(true);
    let err = todo.add_task("second").unwrap_err();
    assert!(matches!(err, ControllerError::Repo(RepoError::Unavailable(_))));
    assert_eq!(todo.items().len(), 1);
}

#[test]
fn legacy_bare_array_is_read_and_rewritten_as_envelope() {
    let store = MemoryKeyValueStore::new();
    let legacy = r#"[{"id":"8c5c7d2e-4a53-4f1e-9a86-3b2b0c8f1d10","title":"Alt","isCompleted":false}]"#;
    companion_core::KeyValueStore::set(&store, StorageKey::ToDoItems, legacy).unwrap();

    let mut todo = TodoService::open(&store);
    assert_eq!(todo.items().len(), 1);
    assert_eq!(todo.items()[0].title, "Alt");

    todo.add_task("Neu").unwrap();
    let raw = store.raw(StorageKey::ToDoItems).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["schema_version"], 1);
    assert_eq!(value["items"].as_array().unwrap().len(), 2);
}

#[test]
fn newer_schema_is_read_only_and_never_overwritten() {
    let store = MemoryKeyValueStore::new();
    let future = r#"{"schema_version":7,"items":[]}"#;
    companion_core::KeyValueStore::set(&store, StorageKey::ToDoItems, future).unwrap();

    let mut todo = TodoService::open(&store);
    assert!(matches!(
        todo.load_issue(),
        Some(RepoError::UnsupportedSchemaVersion { found: 7, .. })
    ));
    assert!(matches!(
        todo.add_task("x").unwrap_err(),
        ControllerError::ReadOnly(StorageKey::ToDoItems)
    ));
    assert_eq!(store.raw(StorageKey::ToDoItems).as_deref(), Some(future));
}

#[test]
fn corrupt_blob_degrades_to_empty_with_issue() {
    let store = MemoryKeyValueStore::new();
    companion_core::KeyValueStore::set(&store, StorageKey::ToDoItems, "{not json").unwrap();

    let todo = TodoService::open(&store);
    assert!(todo.items().is_empty());
    assert!(matches!(todo.load_issue(), Some(RepoError::Corrupt { .. })));
}
