//! Integration tests for the full check-then-reconcile flow.
//!
//! These drive both existence checks through the `RecordStore` seam
//! (memory store + mock store) and assert the end-to-end contract:
//! complete, disjoint bucketing; fail-open degradation; merge behavior.

use reconcile::{
    check_existing_fail_open, reconcile, resolve_identity, ExistencePartition, IdentityKey,
    MemoryStore, Record, Warning,
};
use reconcile::testing::MockStore;

fn job(id: &str) -> Record {
    Record::new()
        .with_field("job_id", id)
        .with_field("title", format!("Role {id}"))
}

fn key_set(records: &[Record]) -> std::collections::HashSet<IdentityKey> {
    records
        .iter()
        .map(|r| resolve_identity(r).expect("bucketed record must be identifiable"))
        .collect()
}

#[tokio::test]
async fn batch_flows_into_disjoint_buckets_covering_every_key() {
    let relational = MemoryStore::new("neon_id");
    let graph = MemoryStore::new("zep_node_id");

    // R1 unseen, R2 relational-only, R3 graph-only, R4 in both.
    relational.insert(&job("R2"), 2);
    relational.insert(&job("R4"), 4);
    graph.insert(&job("R3"), "n-3");
    graph.insert(&job("R4"), "n-4");

    let batch = vec![job("R1"), job("R2"), job("R3"), job("R4")];
    let (primary, secondary) = tokio::join!(
        check_existing_fail_open(&relational, &batch),
        check_existing_fail_open(&graph, &batch),
    );

    let outcome = reconcile(&primary, &secondary);

    assert_eq!(key_set(&outcome.completely_new), key_set(&[job("R1")]));
    assert_eq!(key_set(&outcome.in_primary_only), key_set(&[job("R2")]));
    assert_eq!(key_set(&outcome.in_secondary_only), key_set(&[job("R3")]));
    assert_eq!(key_set(&outcome.in_both), key_set(&[job("R4")]));
    assert_eq!(outcome.total(), 4);
    assert_eq!(outcome.unidentifiable_records, 0);

    // Pairwise disjoint by construction of key_set equality above, but
    // assert the union too: every input key in exactly one bucket.
    let mut all = Vec::new();
    all.extend(outcome.completely_new.iter().cloned());
    all.extend(outcome.in_primary_only.iter().cloned());
    all.extend(outcome.in_secondary_only.iter().cloned());
    all.extend(outcome.in_both.iter().cloned());
    assert_eq!(key_set(&all).len(), 4);
}

#[tokio::test]
async fn in_both_records_carry_annotations_from_both_stores() {
    let relational = MemoryStore::new("neon_id");
    let graph = MemoryStore::new("zep_node_id");
    relational.insert(&job("R1"), 7);
    graph.insert(&job("R1"), "abc");

    let batch = vec![job("R1")];
    let (primary, secondary) = tokio::join!(
        check_existing_fail_open(&relational, &batch),
        check_existing_fail_open(&graph, &batch),
    );

    let outcome = reconcile(&primary, &secondary);

    assert_eq!(outcome.in_both.len(), 1);
    let merged = &outcome.in_both[0];
    assert_eq!(merged.field("neon_id").as_deref(), Some("7"));
    assert_eq!(merged.field("zep_node_id").as_deref(), Some("abc"));
}

#[tokio::test]
async fn unreachable_primary_degrades_to_all_new_without_failing_the_run() {
    let relational = MockStore::new("neon_id").with_failure("connection refused");
    let graph = MemoryStore::new("zep_node_id");

    let batch = vec![job("R1"), job("R2")];
    let (primary, secondary) = tokio::join!(
        check_existing_fail_open(&relational, &batch),
        check_existing_fail_open(&graph, &batch),
    );

    assert!(primary.is_degraded());
    assert!(!secondary.is_degraded());

    let outcome = reconcile(&primary, &secondary);

    assert!(outcome.is_all_new());
    assert_eq!(outcome.completely_new.len(), 2);
}

#[tokio::test]
async fn both_stores_unreachable_still_produces_a_usable_outcome() {
    let relational = MockStore::new("neon_id").with_failure("timeout");
    let graph = MockStore::new("zep_node_id").with_failure("dns failure");

    let batch = vec![job("R1"), job("R2"), job("R3")];
    let (primary, secondary) = tokio::join!(
        check_existing_fail_open(&relational, &batch),
        check_existing_fail_open(&graph, &batch),
    );

    let outcome = reconcile(&primary, &secondary);

    assert_eq!(outcome.completely_new.len(), 3);
    assert!(outcome.is_all_new());
    assert!(outcome.warnings.is_empty());
}

#[tokio::test]
async fn unidentifiable_record_is_excluded_and_counted_once() {
    let relational = MemoryStore::new("neon_id");
    let graph = MemoryStore::new("zep_node_id");

    // Both checks see the same batch, so the keyless record comes back
    // in both partitions' new lists. It must still count once.
    let nameless = Record::new().with_field("company", "Acme");
    let batch = vec![job("R1"), nameless];

    let (primary, secondary) = tokio::join!(
        check_existing_fail_open(&relational, &batch),
        check_existing_fail_open(&graph, &batch),
    );

    let outcome = reconcile(&primary, &secondary);

    assert_eq!(outcome.unidentifiable_records, 1);
    assert_eq!(outcome.total(), 1);
    for bucket in [
        &outcome.completely_new,
        &outcome.in_primary_only,
        &outcome.in_secondary_only,
        &outcome.in_both,
    ] {
        for record in bucket.iter() {
            assert!(resolve_identity(record).is_some());
        }
    }
}

#[tokio::test]
async fn graph_only_drift_is_reported_as_a_warning() {
    let relational = MemoryStore::new("neon_id");
    let graph = MemoryStore::new("zep_node_id");
    graph.insert(&job("R1"), "n-1");

    let batch = vec![job("R1")];
    let (primary, secondary) = tokio::join!(
        check_existing_fail_open(&relational, &batch),
        check_existing_fail_open(&graph, &batch),
    );

    let outcome = reconcile(&primary, &secondary);

    assert_eq!(outcome.in_secondary_only.len(), 1);
    assert!(outcome
        .warnings
        .contains(&Warning::SecondaryOnlyDrift { count: 1 }));
}

#[test]
fn untyped_partition_payloads_round_trip_through_validation() {
    let payload = serde_json::json!({
        "new_records": [{"job_id": "R1"}],
        "existing_records": [{"job_id": "R2", "neon_id": 9}],
        "duplicate_count": 1,
    });
    let primary = ExistencePartition::from_value(payload).unwrap();
    let secondary = ExistencePartition::of(
        vec![
            Record::new().with_field("job_id", "R1"),
            Record::new().with_field("job_id", "R2"),
        ],
        vec![],
    );

    let outcome = reconcile(&primary, &secondary);

    assert_eq!(outcome.completely_new.len(), 1);
    assert_eq!(outcome.in_primary_only.len(), 1);
}

#[test]
fn structurally_invalid_payload_is_a_hard_error() {
    let err = ExistencePartition::from_value(serde_json::json!(42)).unwrap_err();
    assert!(matches!(
        err,
        reconcile::ReconcileError::MalformedPartition { .. }
    ));
}
