//! JobPosting model - one posting persisted in the relational store.
//!
//! Keyed `(board, external_id)`; all writes are upserts on that key so
//! retried activities never create duplicate rows.

use anyhow::Result;
use chrono::{DateTime, Utc};
use reconcile::{resolve_identity, Record};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct JobPosting {
    pub id: Uuid,
    pub board: String,
    pub external_id: String,
    pub title: Option<String>,
    pub company: Option<String>,
    pub url: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    /// Structured attributes from classification (JSONB).
    pub attributes: Option<serde_json::Value>,
    /// Full raw record as scraped (JSONB), for reprocessing.
    pub raw: serde_json::Value,
    pub first_seen_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
}

impl JobPosting {
    /// Idempotent insert-or-update keyed on `(board, external_id)`.
    ///
    /// Re-running with the same record refreshes mutable fields and
    /// `last_seen_at`; `first_seen_at` is never overwritten.
    pub async fn upsert_from_record(board: &str, record: &Record, pool: &PgPool) -> Result<Self> {
        let external_id = resolve_identity(record)
            .ok_or_else(|| anyhow::anyhow!("record has no resolvable identity"))?;

        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO job_postings
                (board, external_id, title, company, url, location, description, attributes, raw)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (board, external_id) DO UPDATE SET
                title = COALESCE(EXCLUDED.title, job_postings.title),
                company = COALESCE(EXCLUDED.company, job_postings.company),
                url = COALESCE(EXCLUDED.url, job_postings.url),
                location = COALESCE(EXCLUDED.location, job_postings.location),
                description = COALESCE(EXCLUDED.description, job_postings.description),
                attributes = COALESCE(EXCLUDED.attributes, job_postings.attributes),
                raw = EXCLUDED.raw,
                last_seen_at = NOW()
            RETURNING *
            "#,
        )
        .bind(board)
        .bind(external_id.as_str())
        .bind(record.field("title"))
        .bind(record.field("company"))
        .bind(record.field("url"))
        .bind(record.field("location"))
        .bind(record.field("description"))
        .bind(record.get("attributes").cloned())
        .bind(serde_json::Value::from(record.clone()))
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Which of these external ids already exist for a board.
    ///
    /// Returns `(external_id, id)` pairs for hits.
    pub async fn find_existing_ids(
        board: &str,
        external_ids: &[String],
        pool: &PgPool,
    ) -> Result<Vec<(String, Uuid)>> {
        sqlx::query_as::<_, (String, Uuid)>(
            r#"
            SELECT external_id, id FROM job_postings
            WHERE board = $1 AND external_id = ANY($2)
            "#,
        )
        .bind(board)
        .bind(external_ids)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Refresh `last_seen_at` for postings observed again in a scrape.
    /// Timestamps-only: no other field is touched.
    pub async fn touch_last_seen(
        board: &str,
        external_ids: &[String],
        pool: &PgPool,
    ) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE job_postings
            SET last_seen_at = NOW()
            WHERE board = $1 AND external_id = ANY($2)
            "#,
        )
        .bind(board)
        .bind(external_ids)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn find_by_identity(
        board: &str,
        external_id: &str,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM job_postings WHERE board = $1 AND external_id = $2",
        )
        .bind(board)
        .bind(external_id)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }
}
