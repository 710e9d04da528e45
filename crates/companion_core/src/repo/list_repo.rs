//! Versioned JSON list persistence on top of a `KeyValueStore`.
//!
//! # Responsibility
//! - Encode whole lists as `{"schema_version": N, "items": [...]}`.
//! - Decode both the envelope and the legacy bare JSON array.
//! - Persist scalar values (timer state) as plain JSON.
//!
//! # Invariants
//! - A save always writes the complete list under the latest schema version.
//! - An absent key loads as an empty list; an undecodable value is reported
//!   as `Corrupt`, never silently replaced.
//! - A value written by a newer schema is reported and left untouched.

use crate::model::record::Record;
use crate::repo::keys::StorageKey;
use crate::repo::kv_store::KeyValueStore;
use crate::repo::{RepoError, RepoResult};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;

/// Payload version written by this binary.
pub const LIST_SCHEMA_VERSION: u32 = 1;

/// Version assigned to bare JSON arrays written before envelopes existed.
pub const LEGACY_SCHEMA_VERSION: u32 = 0;

#[derive(Serialize)]
struct ListEnvelopeRef<'a, T> {
    schema_version: u32,
    items: &'a [T],
}

/// List/scalar repository bound to one key-value store.
pub struct ListRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> ListRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrow of the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Loads the list stored under `key`.
    ///
    /// # Errors
    /// - `Corrupt` when the value is not a list of `T`.
    /// - `UnsupportedSchemaVersion` when written by a newer schema.
    pub fn load<T: DeserializeOwned>(&self, key: StorageKey) -> RepoResult<Vec<T>> {
        let Some(raw) = self.store.get(key)? else {
            debug!("event=list_load module=repo status=absent key={key}");
            return Ok(Vec::new());
        };

        let items = decode_list(key, &raw)?;
        debug!(
            "event=list_load module=repo status=ok key={} count={}",
            key,
            items.len()
        );
        Ok(items)
    }

    /// Loads a record list and enforces id uniqueness.
    pub fn load_records<T: Record>(&self, key: StorageKey) -> RepoResult<Vec<T>> {
        let items = self.load::<T>(key)?;
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(item.id()) {
                warn!(
                    "event=list_load module=repo status=corrupt key={} reason=duplicate_id id={}",
                    key,
                    item.id()
                );
                return Err(RepoError::Corrupt {
                    key,
                    message: format!("duplicate record id {}", item.id()),
                });
            }
        }
        Ok(items)
    }

    /// Replaces the list stored under `key` with `items`.
    pub fn save<T: Serialize>(&self, key: StorageKey, items: &[T]) -> RepoResult<()> {
        let envelope = ListEnvelopeRef {
            schema_version: LIST_SCHEMA_VERSION,
            items,
        };
        let encoded = serde_json::to_string(&envelope).map_err(|err| RepoError::Encode {
            key,
            message: err.to_string(),
        })?;
        self.store.set(key, &encoded)?;
        debug!(
            "event=list_save module=repo status=ok key={} count={}",
            key,
            items.len()
        );
        Ok(())
    }

    /// Loads one scalar JSON value.
    pub fn load_value<T: DeserializeOwned>(&self, key: StorageKey) -> RepoResult<Option<T>> {
        let Some(raw) = self.store.get(key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|err| RepoError::Corrupt {
                key,
                message: err.to_string(),
            })
    }

    /// Stores one scalar JSON value.
    pub fn save_value<T: Serialize>(&self, key: StorageKey, value: &T) -> RepoResult<()> {
        let encoded = serde_json::to_string(value).map_err(|err| RepoError::Encode {
            key,
            message: err.to_string(),
        })?;
        self.store.set(key, &encoded)
    }
}

fn decode_list<T: DeserializeOwned>(key: StorageKey, raw: &str) -> RepoResult<Vec<T>> {
    let corrupt = |message: String| RepoError::Corrupt { key, message };

    let value: Value = serde_json::from_str(raw).map_err(|err| corrupt(err.to_string()))?;
    match value {
        Value::Array(_) => {
            serde_json::from_value(value).map_err(|err| corrupt(err.to_string()))
        }
        Value::Object(mut object) => {
            let version = object
                .get("schema_version")
                .and_then(Value::as_u64)
                .ok_or_else(|| corrupt("missing numeric `schema_version`".to_string()))?;
            if version > u64::from(LIST_SCHEMA_VERSION) {
                return Err(RepoError::UnsupportedSchemaVersion {
                    key,
                    found: version,
                    latest_supported: LIST_SCHEMA_VERSION,
                });
            }
            let items = object
                .remove("items")
                .ok_or_else(|| corrupt("missing `items`".to_string()))?;
            serde_json::from_value(items).map_err(|err| corrupt(err.to_string()))
        }
        other => Err(corrupt(format!(
            "expected list or envelope, found {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
