use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::io::storage::{KeyValueStore, StorageError};
use crate::model::todo::Todo;

/// Payload version written by `save_todos`
pub const PAYLOAD_VERSION: u64 = 1;

/// Error type for decoding a stored collection
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("stored value is not a todo list: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("expected an array or a versioned object, found {0}")]
    WrongShape(&'static str),
    #[error("unsupported payload version {0}")]
    UnsupportedVersion(u64),
    #[error("duplicate id {0}")]
    DuplicateId(String),
}

/// `{"version": N, "todos": [...]}`. Unversioned payloads are a bare array.
#[derive(Deserialize)]
struct Envelope {
    version: u64,
    todos: Value,
}

#[derive(Serialize)]
struct PayloadRef<'a> {
    version: u64,
    todos: &'a [Todo],
}

/// Serialize a collection to the stored JSON form.
pub fn encode_todos(todos: &[Todo]) -> Result<String, serde_json::Error> {
    serde_json::to_string(&PayloadRef {
        version: PAYLOAD_VERSION,
        todos,
    })
}

/// Parse and validate a stored JSON value.
pub fn decode_todos(raw: &str) -> Result<Vec<Todo>, PersistError> {
    let items = match serde_json::from_str::<Value>(raw)? {
        items @ Value::Array(_) => items,
        obj @ Value::Object(_) => {
            let envelope: Envelope = serde_json::from_value(obj)?;
            if envelope.version != PAYLOAD_VERSION {
                return Err(PersistError::UnsupportedVersion(envelope.version));
            }
            envelope.todos
        }
        other => return Err(PersistError::WrongShape(json_kind(&other))),
    };
    let todos: Vec<Todo> = serde_json::from_value(items)?;

    let mut seen = HashSet::new();
    for todo in &todos {
        if !seen.insert(todo.id.as_str()) {
            return Err(PersistError::DuplicateId(todo.id.clone()));
        }
    }

    Ok(todos)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Read the collection stored under `key`.
///
/// `Ok(None)` means nothing was stored. A value that can't be decoded is
/// handed to [`KeyValueStore::record_discarded`], logged, and reported as
/// `Ok(None)`: unreadable data counts as no prior state.
pub fn load_todos<S: KeyValueStore>(store: &S, key: &str) -> Result<Option<Vec<Todo>>, StorageError> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };

    match decode_todos(&raw) {
        Ok(todos) => Ok(Some(todos)),
        Err(e) => {
            log::warn!("ignoring stored value for \"{}\": {}", key, e);
            store.record_discarded(key, &raw, &e.to_string());
            Ok(None)
        }
    }
}

/// Overwrite the value under `key` with the full collection.
pub fn save_todos<S: KeyValueStore>(store: &mut S, key: &str, todos: &[Todo]) -> Result<(), StorageError> {
    let encoded = encode_todos(todos)?;
    store.set(key, &encoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::storage::MemoryStore;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;

    fn todo(id: &str, text: &str, done: bool) -> Todo {
        Todo {
            id: id.to_string(),
            text: text.to_string(),
            done,
        }
    }

    /// MemoryStore that remembers what it was asked to discard
    #[derive(Default)]
    struct WatchingStore {
        inner: MemoryStore,
        discarded: RefCell<Vec<(String, String)>>,
    }

    impl KeyValueStore for WatchingStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            self.inner.set(key, value)
        }

        fn record_discarded(&self, _key: &str, raw: &str, reason: &str) {
            self.discarded
                .borrow_mut()
                .push((raw.to_string(), reason.to_string()));
        }
    }

    fn watching(raw: &str) -> WatchingStore {
        WatchingStore {
            inner: MemoryStore::with_value("todos", raw),
            ..Default::default()
        }
    }

    #[test]
    fn round_trip_preserves_order_and_fields() {
        let todos = vec![
            todo("b", "second", false),
            todo("a", "first", true),
            todo("c", "  padded  ", false),
        ];
        let mut store = MemoryStore::new();
        save_todos(&mut store, "todos", &todos).unwrap();
        assert_eq!(load_todos(&store, "todos").unwrap(), Some(todos));
    }

    #[test]
    fn round_trip_empty() {
        let mut store = MemoryStore::new();
        save_todos(&mut store, "todos", &[]).unwrap();
        assert_eq!(load_todos(&store, "todos").unwrap(), Some(vec![]));
    }

    #[test]
    fn missing_key_is_none() {
        let store = MemoryStore::new();
        assert_eq!(load_todos(&store, "todos").unwrap(), None);
    }

    #[test]
    fn encoded_form_is_versioned() {
        let encoded = encode_todos(&[todo("a", "x", false)]).unwrap();
        assert_eq!(
            encoded,
            r#"{"version":1,"todos":[{"id":"a","text":"x","done":false}]}"#
        );
    }

    #[test]
    fn bare_array_still_loads() {
        let store = MemoryStore::with_value(
            "todos",
            r#"[{"id":"a","text":"x","done":true},{"id":"b","text":"y","done":false}]"#,
        );
        assert_eq!(
            load_todos(&store, "todos").unwrap(),
            Some(vec![todo("a", "x", true), todo("b", "y", false)])
        );
    }

    #[test]
    fn not_json_is_discarded() {
        let store = watching("not json {{{");
        assert_eq!(load_todos(&store, "todos").unwrap(), None);
        let discarded = store.discarded.borrow();
        assert_eq!(discarded.len(), 1);
        assert_eq!(discarded[0].0, "not json {{{");
    }

    #[test]
    fn json_object_is_discarded() {
        let store = watching(r#"{"todos":"nope"}"#);
        assert_eq!(load_todos(&store, "todos").unwrap(), None);
        assert_eq!(store.discarded.borrow().len(), 1);
    }

    #[test]
    fn wrong_item_shape_is_discarded() {
        let store = watching(r#"[{"id":"a","text":"x"}]"#);
        assert_eq!(load_todos(&store, "todos").unwrap(), None);
        assert_eq!(store.discarded.borrow().len(), 1);
    }

    #[test]
    fn unknown_version_is_discarded() {
        let store = watching(r#"{"version":7,"todos":[]}"#);
        assert_eq!(load_todos(&store, "todos").unwrap(), None);
        let discarded = store.discarded.borrow();
        assert!(discarded[0].1.contains("version 7"));
    }

    #[test]
    fn duplicate_ids_are_discarded() {
        let store = watching(
            r#"[{"id":"a","text":"x","done":false},{"id":"a","text":"y","done":true}]"#,
        );
        assert_eq!(load_todos(&store, "todos").unwrap(), None);
        assert!(store.discarded.borrow()[0].1.contains("duplicate id a"));
    }

    #[test]
    fn discard_reason_names_the_problem() {
        let store = watching(r#"{"version":1,"todos":[{"id":"a","text":"x"}]}"#);
        assert_eq!(load_todos(&store, "todos").unwrap(), None);
        let discarded = store.discarded.borrow();
        assert!(
            discarded[0].1.contains("missing field `done`"),
            "reason was: {}",
            discarded[0].1
        );
    }

    #[test]
    fn scalar_payload_is_wrong_shape() {
        assert!(matches!(
            decode_todos("\"todos\""),
            Err(PersistError::WrongShape("a string"))
        ));
        assert!(matches!(
            decode_todos("null"),
            Err(PersistError::WrongShape("null"))
        ));
    }

    #[test]
    fn decode_reports_error_kind() {
        assert!(matches!(
            decode_todos("[1, 2]"),
            Err(PersistError::Malformed(_))
        ));
        assert!(matches!(
            decode_todos(r#"{"version":2,"todos":[]}"#),
            Err(PersistError::UnsupportedVersion(2))
        ));
    }
}
