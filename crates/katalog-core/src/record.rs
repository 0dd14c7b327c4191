//! Read-only view over documents returned by the search index.
//!
//! Index documents are loosely typed: a field may be absent, a scalar, or a
//! list of scalars. `RawRecord` keeps the original JSON map and offers
//! accessors that normalise those shapes without ever mutating the source.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field holding the unique document identifier.
pub const ID_FIELD: &str = "id";

/// An indexed document, keyed by index field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord {
    fields: Map<String, Value>,
}

impl RawRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing JSON object.
    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Build a record from a JSON value; non-objects yield `None`.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self { fields }),
            _ => None,
        }
    }

    /// Builder-style field setter, mostly for fixtures.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// The document identifier, if it is a string.
    pub fn id(&self) -> Option<&str> {
        self.first_str(ID_FIELD)
    }

    /// Raw access to a field. `null` counts as absent.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key).filter(|v| !v.is_null())
    }

    /// Whether the field exists and is not `null`.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// First string value of a field (the scalar itself, or the first list item).
    pub fn first_str(&self, key: &str) -> Option<&str> {
        match self.get(key)? {
            Value::String(s) => Some(s.as_str()),
            Value::Array(items) => items.iter().find_map(Value::as_str),
            _ => None,
        }
    }

    /// All values of a field rendered as strings.
    ///
    /// A scalar becomes a one-element list. Returns `None` when the field is
    /// absent; an explicitly empty list yields `Some(vec![])`.
    pub fn strings(&self, key: &str) -> Option<Vec<String>> {
        match self.get(key)? {
            Value::Array(items) => Some(items.iter().filter_map(scalar_to_string).collect()),
            other => Some(scalar_to_string(other).into_iter().collect()),
        }
    }

    /// Iterate over field names and values.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Borrow the underlying map.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }
}

impl From<Map<String, Value>> for RawRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self::from_map(fields)
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================
