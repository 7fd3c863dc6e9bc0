//! Batch ingestion: the check → reconcile → dispatch pipeline step.
//!
//! The two existence checks have no ordering dependency and run
//! concurrently; reconciliation waits for both (or their fail-open
//! degradations). Dispatch per bucket:
//!
//! - `completely_new` — classify, persist to Postgres, sync to the graph
//! - `in_secondary_only` — classify and backfill into Postgres (drift)
//! - `in_primary_only` — sync to the graph, refresh `last_seen_at`
//! - `in_both` — refresh `last_seen_at` only
//!
//! Every write is an upsert, so re-running the whole step with the same
//! batch is safe.

use reconcile::{
    check_existing_fail_open, reconcile, resolve_identity, ExistencePartition, Record, Warning,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::domains::jobs::activities::check_graph::GraphJobStore;
use crate::domains::jobs::activities::check_relational::RelationalJobStore;
use crate::domains::jobs::classify::classify_new_records;
use crate::domains::jobs::models::JobPosting;
use crate::kernel::PipelineDeps;

/// Counts reported back to the workflow host.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestSummary {
    pub completely_new: usize,
    pub in_primary_only: usize,
    pub in_secondary_only: usize,
    pub in_both: usize,
    pub unidentifiable: usize,
    pub persisted: usize,
    pub synced_to_graph: usize,
    pub timestamps_refreshed: u64,
    pub primary_degraded: bool,
    pub secondary_degraded: bool,
}

/// Ingest one scraped batch for a board.
pub async fn ingest_batch(
    board: &str,
    records: Vec<Record>,
    deps: &PipelineDeps,
) -> anyhow::Result<IngestSummary> {
    info!(board, batch_size = records.len(), "Starting batch ingestion");

    let relational = RelationalJobStore::new(deps.db_pool.clone(), board);

    let (primary, secondary) = match &deps.graph {
        Some(graph) => {
            let graph_store = GraphJobStore::new(graph.clone());
            tokio::join!(
                check_existing_fail_open(&relational, &records),
                check_existing_fail_open(&graph_store, &records),
            )
        }
        None => (
            check_existing_fail_open(&relational, &records).await,
            ExistencePartition::fail_open(records.clone(), "graph store not configured"),
        ),
    };

    let outcome = reconcile(&primary, &secondary);
    for warning in &outcome.warnings {
        match warning {
            Warning::InconsistentPartition { side, key } => warn!(
                store = side.as_str(),
                key = %key,
                "existence check returned the same key as both new and existing; kept existing"
            ),
            Warning::SecondaryOnlyDrift { count } => warn!(
                count,
                "records exist in the graph but not the relational store; backfilling"
            ),
            Warning::MissingLookup { key } => {
                warn!(key = %key, "bucketed key missing from merged lookup; dropped")
            }
        }
    }
    info!(board, counts = ?outcome.counts(), "Reconciled batch");

    let mut summary = IngestSummary {
        completely_new: outcome.completely_new.len(),
        in_primary_only: outcome.in_primary_only.len(),
        in_secondary_only: outcome.in_secondary_only.len(),
        in_both: outcome.in_both.len(),
        unidentifiable: outcome.unidentifiable_records,
        primary_degraded: primary.is_degraded(),
        secondary_degraded: secondary.is_degraded(),
        ..Default::default()
    };

    // Persist new postings (unseen anywhere, plus graph-only drift),
    // classified first.
    let new_for_primary = classify_new_records(
        [outcome.completely_new.clone(), outcome.in_secondary_only].concat(),
        deps.classifier.as_ref(),
    )
    .await;
    for record in &new_for_primary {
        JobPosting::upsert_from_record(board, record, &deps.db_pool).await?;
        summary.persisted += 1;
    }

    // Sync postings the graph has not seen. Skipped entirely when the
    // graph is not configured; per-record failures are logged and left
    // for the retried run to pick up.
    if let Some(graph) = &deps.graph {
        let to_sync = [outcome.completely_new, outcome.in_primary_only.clone()].concat();
        for record in to_sync {
            let Some(key) = resolve_identity(&record) else {
                continue;
            };
            match graph
                .upsert_node(key.as_str(), serde_json::Value::from(record))
                .await
            {
                Ok(_) => summary.synced_to_graph += 1,
                Err(err) => warn!(key = %key, error = %err, "graph sync failed for record"),
            }
        }
    }

    // Timestamps-only refresh for postings already in the relational store.
    let seen_again: Vec<String> = outcome
        .in_both
        .iter()
        .chain(outcome.in_primary_only.iter())
        .filter_map(|record| resolve_identity(record).map(|key| key.to_string()))
        .collect();
    if !seen_again.is_empty() {
        summary.timestamps_refreshed =
            JobPosting::touch_last_seen(board, &seen_again, &deps.db_pool).await?;
    }

    info!(
        board,
        persisted = summary.persisted,
        synced = summary.synced_to_graph,
        refreshed = summary.timestamps_refreshed,
        "Completed batch ingestion"
    );

    Ok(summary)
}
