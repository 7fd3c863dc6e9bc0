// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Business logic (like "ingest a scraped batch") lives in domain
// activities that use these traits.
//
// Naming convention: Base* for trait names (e.g. BaseClassifier)

use anyhow::Result;
use async_trait::async_trait;
use reconcile::Record;

use crate::common::types::{ArticleDraft, JobAttributes};

// =============================================================================
// Classifier Trait (Infrastructure - LLM classification)
// =============================================================================

#[async_trait]
pub trait BaseClassifier: Send + Sync {
    /// Classify one raw posting into structured attributes
    async fn classify(&self, record: &Record) -> Result<JobAttributes>;

    /// Classify a batch. Default implementation classifies sequentially;
    /// providers with batch endpoints should override.
    async fn classify_batch(&self, records: &[Record]) -> Result<Vec<JobAttributes>> {
        let mut attributes = Vec::with_capacity(records.len());
        for record in records {
            attributes.push(self.classify(record).await?);
        }
        Ok(attributes)
    }
}

// =============================================================================
// Generator Trait (Infrastructure - LLM long-form generation)
// =============================================================================

#[async_trait]
pub trait BaseGenerator: Send + Sync {
    /// Generate a long-form article draft for a topic.
    ///
    /// `facts` are knowledge-graph extracts the article must stay
    /// grounded in; `keywords` seed the SEO keyword set.
    async fn generate_article(
        &self,
        topic: &str,
        keywords: &[String],
        facts: &[String],
    ) -> Result<ArticleDraft>;
}
