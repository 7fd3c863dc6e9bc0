//! Testing utilities including mock implementations.
//!
//! Useful for testing code that drives existence checks without a real
//! database or graph behind them.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::json;

use crate::error::{ReconcileError, Result};
use crate::identity::resolve_identity;
use crate::traits::store::RecordStore;
use crate::types::{partition::ExistencePartition, record::Record};

/// A mock record store with deterministic, configurable behavior.
///
/// By default every record is new. Keys registered via
/// [`with_existing_key`](MockStore::with_existing_key) come back as
/// existing, annotated with a synthetic reference. A configured failure
/// makes every check error, for exercising fail-open paths.
#[derive(Default)]
pub struct MockStore {
    annotation_field: &'static str,
    existing_keys: RwLock<HashSet<String>>,
    failure: RwLock<Option<String>>,
    calls: AtomicUsize,
}

impl MockStore {
    pub fn new(annotation_field: &'static str) -> Self {
        Self {
            annotation_field,
            ..Default::default()
        }
    }

    /// Mark an identity key as already held by the store.
    pub fn with_existing_key(self, key: impl Into<String>) -> Self {
        self.existing_keys.write().unwrap().insert(key.into());
        self
    }

    /// Make every check fail with the given message.
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        *self.failure.write().unwrap() = Some(message.into());
        self
    }

    /// Number of checks performed (for assertions).
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordStore for MockStore {
    fn annotation_field(&self) -> &'static str {
        self.annotation_field
    }

    async fn check_existing(&self, records: &[Record]) -> Result<ExistencePartition> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = self.failure.read().unwrap().clone() {
            return Err(ReconcileError::store(std::io::Error::other(message)));
        }

        let existing_keys = self.existing_keys.read().unwrap();
        let mut new_records = Vec::new();
        let mut existing_records = Vec::new();

        for record in records {
            let hit = resolve_identity(record)
                .filter(|key| existing_keys.contains(key.as_str()));
            match hit {
                Some(key) => {
                    let mut annotated = record.clone();
                    annotated.set(
                        self.annotation_field,
                        json!(format!("{}-{}", self.annotation_field, key)),
                    );
                    existing_records.push(annotated);
                }
                None => new_records.push(record.clone()),
            }
        }

        Ok(ExistencePartition::of(new_records, existing_records))
    }
}
