//! Existence check against the knowledge graph.
//!
//! The graph has no `(board, external_id)` key; postings are located by
//! free-text search over whichever identity fields the record carries.
//! Hits come back annotated with `zep_node_id`.

use std::sync::Arc;

use async_trait::async_trait;
use reconcile::{
    resolve_identity, ExistencePartition, ReconcileError, Record, RecordStore,
};

use crate::kernel::graph_client::GraphStore;

/// Matches below this score are treated as misses rather than dedup hits.
const MIN_MATCH_SCORE: f32 = 0.75;

/// `RecordStore` over the knowledge graph.
pub struct GraphJobStore {
    graph: Arc<dyn GraphStore>,
}

impl GraphJobStore {
    pub fn new(graph: Arc<dyn GraphStore>) -> Self {
        Self { graph }
    }
}

/// Build the free-text search query for a record from its
/// partially-specified identity fields.
pub fn build_search_query(record: &Record) -> Option<String> {
    let key = resolve_identity(record)?;

    let mut parts = vec![key.to_string()];
    for field in ["title", "company"] {
        if let Some(value) = record.field(field) {
            parts.push(value);
        }
    }
    Some(parts.join(" "))
}

#[async_trait]
impl RecordStore for GraphJobStore {
    fn annotation_field(&self) -> &'static str {
        "zep_node_id"
    }

    async fn check_existing(
        &self,
        records: &[Record],
    ) -> reconcile::Result<ExistencePartition> {
        let mut new_records = Vec::new();
        let mut existing_records = Vec::new();

        for record in records {
            let Some(query) = build_search_query(record) else {
                // Unidentifiable: leave in "new" and let the reconciler
                // count and exclude it.
                new_records.push(record.clone());
                continue;
            };

            let nodes = self
                .graph
                .search_nodes(&query, 3)
                .await
                .map_err(|err| ReconcileError::Store(err.into()))?;

            match nodes.into_iter().find(|node| node.score >= MIN_MATCH_SCORE) {
                Some(node) => {
                    let mut annotated = record.clone();
                    annotated.set("zep_node_id", node.node_id);
                    existing_records.push(annotated);
                }
                None => new_records.push(record.clone()),
            }
        }

        Ok(ExistencePartition::of(new_records, existing_records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::test_dependencies::MockGraphStore;
    use reconcile::check_existing_fail_open;

    fn job(id: &str, company: &str) -> Record {
        Record::new()
            .with_field("job_id", id)
            .with_field("company", company)
    }

    #[test]
    fn search_query_combines_identity_and_descriptive_fields() {
        let record = job("J-9", "Acme").with_field("title", "Platform Engineer");
        assert_eq!(
            build_search_query(&record).as_deref(),
            Some("J-9 Platform Engineer Acme")
        );
    }

    #[test]
    fn search_query_requires_an_identity() {
        let record = Record::new().with_field("title", "Platform Engineer");
        assert_eq!(build_search_query(&record), None);
    }

    #[tokio::test]
    async fn graph_hits_are_annotated_with_node_id() {
        let graph = Arc::new(MockGraphStore::new());
        graph.seed("J-1", serde_json::json!({}));
        let store = GraphJobStore::new(graph);

        let partition = store
            .check_existing(&[job("J-1", "Acme"), job("J-2", "Acme")])
            .await
            .unwrap();

        assert_eq!(partition.duplicate_count, 1);
        assert_eq!(
            partition.existing_records[0].field("zep_node_id").as_deref(),
            Some("node-J-1")
        );
        assert_eq!(partition.new_records.len(), 1);
    }

    #[tokio::test]
    async fn unreachable_graph_degrades_fail_open() {
        let store = GraphJobStore::new(Arc::new(MockGraphStore::failing()));
        let batch = [job("J-1", "Acme")];

        let partition = check_existing_fail_open(&store, &batch).await;

        assert!(partition.is_degraded());
        assert_eq!(partition.new_records.len(), 1);
    }
}
