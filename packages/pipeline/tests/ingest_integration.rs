//! Integration tests for batch ingestion and article saving.
//!
//! These need a migrated Postgres; run with:
//!   DATABASE_URL=postgres://... cargo test -p pipeline -- --ignored

use std::sync::Arc;

use pipeline_core::common::types::{ArticleDraft, VideoMetadata};
use pipeline_core::domains::articles::{save_article, Article};
use pipeline_core::domains::jobs::{ingest_batch, JobPosting};
use pipeline_core::kernel::test_dependencies::{MockClassifier, MockGenerator, MockGraphStore};
use pipeline_core::kernel::PipelineDeps;
use reconcile::Record;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

async fn test_pool() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("failed to connect")
}

fn test_deps(pool: PgPool, graph: Arc<MockGraphStore>) -> PipelineDeps {
    PipelineDeps::new(
        pool,
        Arc::new(MockClassifier::new("engineering")),
        Arc::new(MockGenerator),
        Some(graph),
    )
}

fn job(id: &str) -> Record {
    Record::new()
        .with_field("job_id", id)
        .with_field("title", format!("Role {id}"))
        .with_field("company", "Acme")
}

#[tokio::test]
#[ignore] // Requires database
async fn ingest_persists_new_and_syncs_to_graph() {
    let pool = test_pool().await;
    let graph = Arc::new(MockGraphStore::new());
    let deps = test_deps(pool.clone(), graph.clone());
    let board = format!("board-{}", uuid::Uuid::new_v4());

    let summary = ingest_batch(&board, vec![job("J-1"), job("J-2")], &deps)
        .await
        .unwrap();

    assert_eq!(summary.completely_new, 2);
    assert_eq!(summary.persisted, 2);
    assert_eq!(summary.synced_to_graph, 2);
    assert_eq!(graph.node_count(), 2);

    let stored = JobPosting::find_by_identity(&board, "J-1", &pool)
        .await
        .unwrap()
        .expect("J-1 persisted");
    assert_eq!(stored.company.as_deref(), Some("Acme"));
    let attributes = stored.attributes.expect("classified before persisting");
    assert_eq!(attributes["category"], "engineering");
}

#[tokio::test]
#[ignore] // Requires database
async fn reingesting_the_same_batch_refreshes_instead_of_duplicating() {
    let pool = test_pool().await;
    let graph = Arc::new(MockGraphStore::new());
    let deps = test_deps(pool.clone(), graph.clone());
    let board = format!("board-{}", uuid::Uuid::new_v4());
    let batch = vec![job("J-1")];

    let first = ingest_batch(&board, batch.clone(), &deps).await.unwrap();
    assert_eq!(first.persisted, 1);

    // Seed the graph mock so the second run's search hits.
    graph.seed("J-1", serde_json::json!({}));

    let second = ingest_batch(&board, batch, &deps).await.unwrap();
    assert_eq!(second.in_both, 1);
    assert_eq!(second.persisted, 0);
    assert_eq!(second.timestamps_refreshed, 1);

    let rows: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM job_postings WHERE board = $1")
            .bind(&board)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(rows.0, 1);
}

#[tokio::test]
#[ignore] // Requires database
async fn article_saves_merge_optional_fields_across_runs() {
    let pool = test_pool().await;
    let slug = format!("trends-{}", uuid::Uuid::new_v4());

    // First save: body and keywords.
    let mut first = ArticleDraft::new(&slug);
    first.title = Some("Hiring Trends".to_string());
    first.body_markdown = Some("# Hiring Trends\n\nRemote roles keep growing.".to_string());
    first.seo_keywords = Some(vec!["remote jobs".to_string()]);
    save_article(&first, &pool).await.unwrap();

    // Second save: video only. Must not erase body or keywords.
    let mut second = ArticleDraft::new(&slug);
    second.video = Some(VideoMetadata {
        url: "https://cdn.example.com/v/1.mp4".to_string(),
        thumbnail_url: None,
        duration_seconds: Some(90),
    });
    save_article(&second, &pool).await.unwrap();

    let stored = Article::find_by_slug(&slug, &pool)
        .await
        .unwrap()
        .expect("article exists");
    assert!(stored.body_markdown.unwrap().contains("Remote roles"));
    assert_eq!(stored.seo_keywords.unwrap(), vec!["remote jobs"]);
    assert_eq!(
        stored.video_url.as_deref(),
        Some("https://cdn.example.com/v/1.mp4")
    );
    assert_eq!(stored.video_duration_seconds, Some(90));
}

#[tokio::test]
#[ignore] // Requires database
async fn unreachable_graph_never_blocks_persistence() {
    let pool = test_pool().await;
    let deps = PipelineDeps::new(
        pool,
        Arc::new(MockClassifier::new("engineering")),
        Arc::new(MockGenerator),
        Some(Arc::new(MockGraphStore::failing())),
    );
    let board = format!("board-{}", uuid::Uuid::new_v4());

    let summary = ingest_batch(&board, vec![job("J-1")], &deps).await.unwrap();

    assert!(summary.secondary_degraded);
    assert_eq!(summary.persisted, 1);
}
