//! ExistencePartition - the new/existing split from one store check.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ReconcileError, Result};
use crate::types::record::Record;

/// Result of checking a batch of records against one store.
///
/// A true partition: every input record lands in exactly one of the two
/// lists, matched by identity key. Records in `existing_records` carry the
/// store's internal reference (e.g. `neon_id` for the relational store,
/// `zep_node_id` for the graph).
///
/// When the store is unreachable, the check degrades to "all records new"
/// with `error` set (fail-open): over-creating via idempotent downstream
/// upserts beats silently losing a batch because a store blipped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExistencePartition {
    /// Records not found in the store.
    #[serde(default)]
    pub new_records: Vec<Record>,

    /// Records found in the store, annotated with its internal reference.
    #[serde(default)]
    pub existing_records: Vec<Record>,

    /// Number of records found in the store.
    #[serde(default)]
    pub duplicate_count: usize,

    /// Set when the check degraded to fail-open (store unreachable).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExistencePartition {
    /// Build a partition from the two lists, deriving `duplicate_count`.
    pub fn of(new_records: Vec<Record>, existing_records: Vec<Record>) -> Self {
        let duplicate_count = existing_records.len();
        Self {
            new_records,
            existing_records,
            duplicate_count,
            error: None,
        }
    }

    /// Degrade to fail-open: every record treated as new, error recorded.
    ///
    /// This is the deliberate policy branch for unreachable stores, not a
    /// caught-exception fallback.
    pub fn fail_open(records: Vec<Record>, error: impl Into<String>) -> Self {
        Self {
            new_records: records,
            existing_records: Vec::new(),
            duplicate_count: 0,
            error: Some(error.into()),
        }
    }

    /// Whether the upstream check degraded to fail-open.
    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }

    /// Total records across both lists.
    pub fn len(&self) -> usize {
        self.new_records.len() + self.existing_records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.new_records.is_empty() && self.existing_records.is_empty()
    }

    /// Parse a partition from an untyped payload (e.g. an activity result
    /// round-tripped through the workflow host as JSON).
    ///
    /// This is the one place structural contract violations surface as
    /// errors: a payload that is not an object, or whose record lists are
    /// missing or not arrays of objects, is a caller bug.
    pub fn from_value(value: Value) -> Result<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| ReconcileError::malformed("partition payload is not an object"))?;

        let new_records = record_list(obj.get("new_records"), "new_records")?;
        let existing_records = record_list(obj.get("existing_records"), "existing_records")?;

        let duplicate_count = obj
            .get("duplicate_count")
            .and_then(Value::as_u64)
            .map(|n| n as usize)
            .unwrap_or(existing_records.len());

        let error = obj
            .get("error")
            .and_then(Value::as_str)
            .map(str::to_string);

        Ok(Self {
            new_records,
            existing_records,
            duplicate_count,
            error,
        })
    }
}

fn record_list(value: Option<&Value>, field: &str) -> Result<Vec<Record>> {
    let items = value
        .ok_or_else(|| ReconcileError::malformed(format!("missing `{field}` list")))?
        .as_array()
        .ok_or_else(|| ReconcileError::malformed(format!("`{field}` is not an array")))?;

    items
        .iter()
        .map(|item| {
            Record::from_value(item.clone()).ok_or_else(|| {
                ReconcileError::malformed(format!("`{field}` contains a non-object record"))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn of_derives_duplicate_count() {
        let existing = vec![
            Record::new().with_field("job_id", "A"),
            Record::new().with_field("job_id", "B"),
        ];
        let partition = ExistencePartition::of(vec![], existing);
        assert_eq!(partition.duplicate_count, 2);
        assert!(!partition.is_degraded());
    }

    #[test]
    fn fail_open_marks_everything_new() {
        let records = vec![Record::new().with_field("job_id", "A")];
        let partition = ExistencePartition::fail_open(records, "connection refused");

        assert_eq!(partition.new_records.len(), 1);
        assert!(partition.existing_records.is_empty());
        assert_eq!(partition.duplicate_count, 0);
        assert!(partition.is_degraded());
        assert_eq!(partition.error.as_deref(), Some("connection refused"));
    }

    #[test]
    fn from_value_parses_well_formed_payload() {
        let partition = ExistencePartition::from_value(json!({
            "new_records": [{"job_id": "A"}],
            "existing_records": [{"job_id": "B", "neon_id": 7}],
            "duplicate_count": 1,
        }))
        .unwrap();

        assert_eq!(partition.new_records.len(), 1);
        assert_eq!(partition.existing_records.len(), 1);
        assert_eq!(partition.duplicate_count, 1);
    }

    #[test]
    fn from_value_rejects_non_object_payload() {
        let err = ExistencePartition::from_value(json!(["not", "a", "partition"])).unwrap_err();
        assert!(matches!(
            err,
            ReconcileError::MalformedPartition { .. }
        ));
    }

    #[test]
    fn from_value_rejects_missing_record_lists() {
        let err =
            ExistencePartition::from_value(json!({"existing_records": []})).unwrap_err();
        assert!(err.to_string().contains("new_records"));
    }

    #[test]
    fn from_value_rejects_non_object_records() {
        let err = ExistencePartition::from_value(json!({
            "new_records": ["J-1"],
            "existing_records": [],
        }))
        .unwrap_err();
        assert!(matches!(err, ReconcileError::MalformedPartition { .. }));
    }
}
