// Common types used across multiple domains and layers
//
// These types are shared between the kernel and domain layers to avoid
// circular dependencies while maintaining type safety.

use serde::{Deserialize, Serialize};

/// Structured attributes produced by classifying a raw job posting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobAttributes {
    pub category: String,
    pub seniority: Option<String>,
    pub employment_type: Option<String>, // "full_time" | "part_time" | "contract"
    #[serde(default)]
    pub remote: bool,
    #[serde(default)]
    pub skills: Vec<String>,
    pub confidence: Option<String>, // "high" | "medium" | "low"
}

/// One alternative rendering of an article body (e.g. short-form,
/// newsletter, social). Variants are independently updatable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentVariant {
    pub kind: String,
    pub body_markdown: String,
}

/// Metadata for a generated companion video
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub url: String,
    pub thumbnail_url: Option<String>,
    pub duration_seconds: Option<i32>,
}

/// A generated article draft to be saved.
///
/// Every field except `slug` is optional and independently updatable: a
/// draft carrying only video metadata must merge into the stored article
/// without erasing previously saved content, keywords, or facts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleDraft {
    pub slug: String,
    pub title: Option<String>,
    pub body_markdown: Option<String>,
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo_keywords: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_variants: Option<Vec<ContentVariant>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<VideoMetadata>,
    /// Facts extracted from the knowledge graph that ground the article.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graph_facts: Option<Vec<String>>,
}

impl ArticleDraft {
    pub fn new(slug: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            title: None,
            body_markdown: None,
            summary: None,
            seo_keywords: None,
            content_variants: None,
            video: None,
            graph_facts: None,
        }
    }
}
