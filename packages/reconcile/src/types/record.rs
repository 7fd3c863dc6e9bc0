//! Record type - one reconcilable data item.
//!
//! Records are opaque JSON objects. Scrapers for different boards emit
//! different shapes, so no schema is imposed beyond the identity fields
//! (see [`crate::identity`]); everything else passes through unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One reconcilable data item (e.g. a scraped job posting).
///
/// Wraps a JSON object. Field access goes through [`Record::field`], which
/// normalizes the permissive shapes scrapers produce (numbers where strings
/// are expected, padding whitespace, empty strings standing in for null).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Get a field as a trimmed, non-empty string.
    ///
    /// Returns `None` when the field is absent, null, an empty or
    /// whitespace-only string, or a non-scalar value. Numbers are
    /// stringified, since boards frequently serialize ids as integers.
    pub fn field(&self, name: &str) -> Option<String> {
        match self.0.get(name)? {
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Get a raw field value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Set a field, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    /// Builder-style field setter.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Whether the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over fields.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Shallow-merge two copies of the same logical record.
    ///
    /// Every field present in either copy survives; `primary` wins on key
    /// conflicts. Used when the same record comes back from both store
    /// checks so that store annotations from both sides (e.g. `neon_id`
    /// and `zep_node_id`) end up on one merged copy.
    pub fn shallow_merge(primary: &Record, secondary: &Record) -> Record {
        let mut merged = secondary.0.clone();
        for (key, value) in &primary.0 {
            merged.insert(key.clone(), value.clone());
        }
        Record(merged)
    }

    /// Build a record from any JSON value, requiring an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Consume the record, returning the underlying JSON object.
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Object(record.0)
    }
}
