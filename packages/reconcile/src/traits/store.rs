//! The `RecordStore` seam: batch existence checks against one store.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{partition::ExistencePartition, record::Record};

/// A store that can answer "which of these records do you already hold?".
///
/// Implementations must return a true partition: every input record in
/// exactly one list, matched by identity key, with `existing_records`
/// annotated via [`annotation_field`](RecordStore::annotation_field).
/// Checks must be idempotent — re-running against an unchanged store
/// yields the same partition — since the workflow host retries them.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Name of the store-specific reference field attached to existing
    /// records (e.g. `"neon_id"`, `"zep_node_id"`).
    fn annotation_field(&self) -> &'static str;

    /// Partition a batch into records the store does/does not already hold.
    async fn check_existing(&self, records: &[Record]) -> Result<ExistencePartition>;
}

/// Run an existence check, degrading to fail-open on store failure.
///
/// The unreachable-store policy lives here, once: rather than failing the
/// batch (and silently losing scraped data), every record is treated as
/// new and the error is carried on the partition. Downstream writes are
/// idempotent upserts, so the worst case is a redundant write, not a
/// duplicate row.
pub async fn check_existing_fail_open(
    store: &dyn RecordStore,
    records: &[Record],
) -> ExistencePartition {
    match store.check_existing(records).await {
        Ok(partition) => partition,
        Err(err) => {
            tracing::warn!(
                store = store.annotation_field(),
                error = %err,
                record_count = records.len(),
                "existence check failed; degrading to fail-open (all records new)"
            );
            ExistencePartition::fail_open(records.to_vec(), err.to_string())
        }
    }
}
