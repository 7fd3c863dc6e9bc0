//! Existence check against the relational store.
//!
//! Batch lookup keyed `(board, external_id)`. Hits come back annotated
//! with `neon_id` (the row id), which downstream steps rely on to update
//! rather than re-insert.

use async_trait::async_trait;
use reconcile::{
    resolve_identity, ExistencePartition, ReconcileError, Record, RecordStore,
};
use sqlx::PgPool;

use crate::domains::jobs::models::JobPosting;

/// `RecordStore` over the `job_postings` table.
pub struct RelationalJobStore {
    pool: PgPool,
    board: String,
}

impl RelationalJobStore {
    pub fn new(pool: PgPool, board: impl Into<String>) -> Self {
        Self {
            pool,
            board: board.into(),
        }
    }
}

#[async_trait]
impl RecordStore for RelationalJobStore {
    fn annotation_field(&self) -> &'static str {
        "neon_id"
    }

    async fn check_existing(
        &self,
        records: &[Record],
    ) -> reconcile::Result<ExistencePartition> {
        let keys: Vec<String> = records
            .iter()
            .filter_map(|record| resolve_identity(record).map(|key| key.to_string()))
            .collect();

        let hits = JobPosting::find_existing_ids(&self.board, &keys, &self.pool)
            .await
            .map_err(|err| ReconcileError::Store(err.into()))?;
        let by_key: std::collections::HashMap<String, uuid::Uuid> = hits.into_iter().collect();

        let mut new_records = Vec::new();
        let mut existing_records = Vec::new();
        for record in records {
            let hit = resolve_identity(record).and_then(|key| by_key.get(key.as_str()));
            match hit {
                Some(row_id) => {
                    let mut annotated = record.clone();
                    annotated.set("neon_id", row_id.to_string());
                    existing_records.push(annotated);
                }
                None => new_records.push(record.clone()),
            }
        }

        Ok(ExistencePartition::of(new_records, existing_records))
    }
}
