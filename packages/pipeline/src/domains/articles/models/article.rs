//! Article model - generated marketing content keyed by slug.
//!
//! Generation produces side artifacts at different times (body first,
//! video later, SEO keywords from a separate pass), so every optional
//! field merges independently: saving a draft that carries only video
//! metadata must not erase a previously saved body or keyword set.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;

use crate::common::types::ArticleDraft;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Article {
    pub id: Uuid,
    pub slug: String,
    pub title: Option<String>,
    pub body_markdown: Option<String>,
    pub summary: Option<String>,
    pub seo_keywords: Option<Vec<String>>,
    /// Alternative renderings (JSONB array of {kind, body_markdown}).
    pub content_variants: Option<serde_json::Value>,
    pub video_url: Option<String>,
    pub video_thumbnail_url: Option<String>,
    pub video_duration_seconds: Option<i32>,
    /// Knowledge-graph facts the article is grounded in (JSONB).
    pub graph_facts: Option<serde_json::Value>,
    /// SHA-256 of the body, for change detection.
    pub content_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Article {
    /// Idempotent merge-upsert keyed on `slug`.
    ///
    /// Fields absent from the draft keep their stored values (COALESCE on
    /// the excluded row); fields present overwrite. Saving the same draft
    /// twice is a no-op apart from `updated_at`.
    pub async fn upsert_merge(draft: &ArticleDraft, pool: &PgPool) -> Result<Self> {
        let content_hash = draft.body_markdown.as_deref().map(hash_content);
        let content_variants = draft
            .content_variants
            .as_ref()
            .map(serde_json::to_value)
            .transpose()?;
        let graph_facts = draft
            .graph_facts
            .as_ref()
            .map(serde_json::to_value)
            .transpose()?;

        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO articles
                (slug, title, body_markdown, summary, seo_keywords, content_variants,
                 video_url, video_thumbnail_url, video_duration_seconds, graph_facts,
                 content_hash)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (slug) DO UPDATE SET
                title = COALESCE(EXCLUDED.title, articles.title),
                body_markdown = COALESCE(EXCLUDED.body_markdown, articles.body_markdown),
                summary = COALESCE(EXCLUDED.summary, articles.summary),
                seo_keywords = COALESCE(EXCLUDED.seo_keywords, articles.seo_keywords),
                content_variants = COALESCE(EXCLUDED.content_variants, articles.content_variants),
                video_url = COALESCE(EXCLUDED.video_url, articles.video_url),
                video_thumbnail_url = COALESCE(EXCLUDED.video_thumbnail_url, articles.video_thumbnail_url),
                video_duration_seconds = COALESCE(EXCLUDED.video_duration_seconds, articles.video_duration_seconds),
                graph_facts = COALESCE(EXCLUDED.graph_facts, articles.graph_facts),
                content_hash = COALESCE(EXCLUDED.content_hash, articles.content_hash),
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(&draft.slug)
        .bind(&draft.title)
        .bind(&draft.body_markdown)
        .bind(&draft.summary)
        .bind(&draft.seo_keywords)
        .bind(content_variants)
        .bind(draft.video.as_ref().map(|v| v.url.clone()))
        .bind(draft.video.as_ref().and_then(|v| v.thumbnail_url.clone()))
        .bind(draft.video.as_ref().and_then(|v| v.duration_seconds))
        .bind(graph_facts)
        .bind(content_hash)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_slug(slug: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM articles WHERE slug = $1")
            .bind(slug)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_recent(limit: i64, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM articles ORDER BY updated_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}

/// SHA-256 of article content, hex-encoded.
pub fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}
