//! Mock implementations of kernel traits for tests.

use std::collections::HashMap;
use std::sync::RwLock;

use anyhow::Result;
use async_trait::async_trait;
use reconcile::Record;
use serde_json::Value;

use crate::common::types::{ArticleDraft, JobAttributes};
use crate::kernel::graph_client::{GraphNode, GraphStore};
use crate::kernel::traits::{BaseClassifier, BaseGenerator};

/// Classifier returning a fixed category for every record.
pub struct MockClassifier {
    pub category: String,
}

impl MockClassifier {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
        }
    }
}

#[async_trait]
impl BaseClassifier for MockClassifier {
    async fn classify(&self, _record: &Record) -> Result<JobAttributes> {
        Ok(JobAttributes {
            category: self.category.clone(),
            seniority: Some("senior".to_string()),
            employment_type: Some("full_time".to_string()),
            remote: true,
            skills: vec!["rust".to_string()],
            confidence: Some("high".to_string()),
        })
    }
}

/// Classifier that fails every call, for fail-open paths.
pub struct FailingClassifier;

#[async_trait]
impl BaseClassifier for FailingClassifier {
    async fn classify(&self, _record: &Record) -> Result<JobAttributes> {
        anyhow::bail!("classifier unavailable")
    }
}

/// Generator echoing the topic into a minimal draft.
pub struct MockGenerator;

#[async_trait]
impl BaseGenerator for MockGenerator {
    async fn generate_article(
        &self,
        topic: &str,
        keywords: &[String],
        facts: &[String],
    ) -> Result<ArticleDraft> {
        let mut draft = ArticleDraft::new(topic.to_lowercase().replace(' ', "-"));
        draft.title = Some(topic.to_string());
        draft.body_markdown = Some(format!("# {topic}\n\n{}", facts.join("\n")));
        draft.seo_keywords = Some(keywords.to_vec());
        draft.graph_facts = Some(facts.to_vec());
        Ok(draft)
    }
}

/// In-memory graph store keyed by external key.
#[derive(Default)]
pub struct MockGraphStore {
    nodes: RwLock<HashMap<String, Value>>,
    fail_search: bool,
}

impl MockGraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make searches fail, for exercising fail-open behavior.
    pub fn failing() -> Self {
        Self {
            nodes: RwLock::new(HashMap::new()),
            fail_search: true,
        }
    }

    /// Seed a node so searches matching `key` hit.
    pub fn seed(&self, key: impl Into<String>, payload: Value) {
        self.nodes.write().unwrap().insert(key.into(), payload);
    }

    pub fn node_count(&self) -> usize {
        self.nodes.read().unwrap().len()
    }
}

#[async_trait]
impl GraphStore for MockGraphStore {
    async fn search_nodes(&self, query: &str, _limit: usize) -> Result<Vec<GraphNode>> {
        if self.fail_search {
            anyhow::bail!("graph unreachable");
        }
        let nodes = self.nodes.read().unwrap();
        Ok(nodes
            .iter()
            .filter(|(key, _)| query.contains(key.as_str()))
            .map(|(key, _)| GraphNode {
                node_id: format!("node-{key}"),
                score: 1.0,
                summary: None,
            })
            .collect())
    }

    async fn upsert_node(&self, external_key: &str, payload: Value) -> Result<GraphNode> {
        self.nodes
            .write()
            .unwrap()
            .insert(external_key.to_string(), payload);
        Ok(GraphNode {
            node_id: format!("node-{external_key}"),
            score: 1.0,
            summary: None,
        })
    }
}
