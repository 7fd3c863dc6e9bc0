//! Save-article activity: validate a draft and merge it into storage.

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::info;

use crate::common::types::ArticleDraft;
use crate::domains::articles::models::Article;
use crate::kernel::PipelineDeps;

/// Save a generated draft, merging into any previously saved fields.
///
/// Retry-safe: the underlying write is a slug-keyed merge-upsert.
pub async fn save_article(draft: &ArticleDraft, pool: &PgPool) -> Result<Article> {
    if draft.slug.trim().is_empty() {
        anyhow::bail!("article draft has an empty slug");
    }

    let article = Article::upsert_merge(draft, pool)
        .await
        .context("Failed to save article")?;

    info!(
        slug = %article.slug,
        has_body = draft.body_markdown.is_some(),
        has_video = draft.video.is_some(),
        has_keywords = draft.seo_keywords.is_some(),
        "Saved article draft"
    );

    Ok(article)
}

/// Generate an article for a topic and save it in one step.
pub async fn generate_and_save_article(
    topic: &str,
    keywords: &[String],
    facts: &[String],
    deps: &PipelineDeps,
) -> Result<Article> {
    let draft = deps
        .generator
        .generate_article(topic, keywords, facts)
        .await
        .context("Failed to generate article")?;

    save_article(&draft, &deps.db_pool).await
}
