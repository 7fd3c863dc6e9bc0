//! In-memory record store.
//!
//! Backs local development and tests; mirrors how the real stores behave
//! (identity-keyed lookup, annotation of existing records) without any
//! external service.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::identity::resolve_identity;
use crate::traits::store::RecordStore;
use crate::types::{partition::ExistencePartition, record::Record};

/// Identity-keyed in-memory store.
pub struct MemoryStore {
    annotation_field: &'static str,
    entries: RwLock<HashMap<String, Value>>,
}

impl MemoryStore {
    /// Create an empty store annotating hits with `annotation_field`.
    pub fn new(annotation_field: &'static str) -> Self {
        Self {
            annotation_field,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Register a record as held by the store under its identity key,
    /// with the store-internal reference to attach on hits.
    pub fn insert(&self, record: &Record, reference: impl Into<Value>) {
        if let Some(key) = resolve_identity(record) {
            self.entries
                .write()
                .unwrap_or_else(|e| e.into_inner())
                .insert(key.to_string(), reference.into());
        }
    }

    /// Number of records held.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_empty()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    fn annotation_field(&self) -> &'static str {
        self.annotation_field
    }

    async fn check_existing(&self, records: &[Record]) -> Result<ExistencePartition> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());

        let mut new_records = Vec::new();
        let mut existing_records = Vec::new();

        for record in records {
            let hit = resolve_identity(record)
                .and_then(|key| entries.get(key.as_str()).cloned());
            match hit {
                Some(reference) => {
                    let mut annotated = record.clone();
                    annotated.set(self.annotation_field, reference);
                    existing_records.push(annotated);
                }
                None => new_records.push(record.clone()),
            }
        }

        Ok(ExistencePartition::of(new_records, existing_records))
    }
}
