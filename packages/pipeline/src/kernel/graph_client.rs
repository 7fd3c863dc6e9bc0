//! Knowledge-graph client (Zep).
//!
//! The graph has no stable primary key for scraped postings; lookups go
//! through free-text search over whatever identity fields a record
//! carries. The `GraphStore` trait keeps activities testable without a
//! live graph behind them.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A node returned by a graph search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    pub node_id: String,
    #[serde(default)]
    pub score: f32,
    #[serde(default)]
    pub summary: Option<String>,
}

/// Knowledge-graph operations used by the pipeline.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Free-text search for nodes matching a query.
    async fn search_nodes(&self, query: &str, limit: usize) -> Result<Vec<GraphNode>>;

    /// Add (or refresh) a node for a posting. Must be idempotent: adding
    /// the same payload twice may not create a duplicate node.
    async fn upsert_node(&self, external_key: &str, payload: serde_json::Value)
        -> Result<GraphNode>;
}

// =============================================================================
// Zep HTTP client
// =============================================================================

/// Zep graph API client
pub struct ZepClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    limit: usize,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    nodes: Vec<GraphNode>,
}

#[derive(Debug, Serialize)]
struct UpsertNodeRequest<'a> {
    external_key: &'a str,
    payload: serde_json::Value,
}

impl ZepClient {
    /// Create a new Zep client
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        })
    }
}

#[async_trait]
impl GraphStore for ZepClient {
    async fn search_nodes(&self, query: &str, limit: usize) -> Result<Vec<GraphNode>> {
        let response = self
            .client
            .post(format!("{}/graph/search", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&SearchRequest { query, limit })
            .send()
            .await
            .context("Failed to send graph search request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Graph API error {}: {}", status, body);
        }

        let search: SearchResponse = response
            .json()
            .await
            .context("Failed to parse graph search response")?;

        Ok(search.nodes)
    }

    async fn upsert_node(
        &self,
        external_key: &str,
        payload: serde_json::Value,
    ) -> Result<GraphNode> {
        let response = self
            .client
            .put(format!("{}/graph/nodes", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&UpsertNodeRequest {
                external_key,
                payload,
            })
            .send()
            .await
            .context("Failed to send graph upsert request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Graph API error {}: {}", status, body);
        }

        response
            .json()
            .await
            .context("Failed to parse graph upsert response")
    }
}
