//! Entry data model.
//!
//! An [`Entry`] is the value side of the store: an opaque nested mapping of
//! string fields to JSON values (scalars, lists, maps). The store never
//! interprets entry contents beyond pass-through.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The full key → entry mapping as persisted in the snapshot file at a
/// point in time.
pub type Snapshot = BTreeMap<String, Entry>;

/// An opaque configuration entry.
///
/// # Example
///
/// ```
/// use tier_store::Entry;
/// use serde_json::json;
///
/// let entry = Entry::from_value(json!({"prefixes": ["!", "?"]})).unwrap();
/// assert_eq!(entry.get("prefixes"), Some(&json!(["!", "?"])));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entry(serde_json::Map<String, Value>);

impl Entry {
    /// Create an empty entry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an entry from a JSON value. Returns `None` unless the value is
    /// an object; scalar and array payloads have no field structure to hold.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self(fields)),
            _ => None,
        }
    }

    /// Get a field by name.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Insert or overwrite a field.
    pub fn insert(&mut self, field: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(field.into(), value)
    }

    /// Number of top-level fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the entry has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume into a plain JSON value.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Build the wire document for a remote collection: the entry fields
    /// plus an `_id` field carrying the key.
    #[must_use]
    pub fn to_document(&self, key: &str) -> Value {
        let mut fields = self.0.clone();
        fields.insert("_id".to_string(), Value::String(key.to_string()));
        Value::Object(fields)
    }

    /// Unfold a wire document back into `(key, entry)`.
    ///
    /// The `_id` field is popped out of the document and stringified; it
    /// never leaks into the entry fields. Returns `None` if the document is
    /// not an object or carries no `_id`.
    #[must_use]
    pub fn from_document(document: Value) -> Option<(String, Self)> {
        let Value::Object(mut fields) = document else {
            return None;
        };
        let key = match fields.remove("_id")? {
            Value::String(s) => s,
            other => other.to_string(),
        };
        Some((key, Self(fields)))
    }
}

impl From<serde_json::Map<String, Value>> for Entry {
    fn from(fields: serde_json::Map<String, Value>) -> Self {
        Self(fields)
    }
}
