// AI implementation using OpenAI
//
// This is the infrastructure implementation of BaseClassifier and
// BaseGenerator. Business logic (what to do with the output) lives in
// domain layers.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reconcile::Record;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::common::types::{ArticleDraft, JobAttributes};
use crate::kernel::traits::{BaseClassifier, BaseGenerator};

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
const CLASSIFY_MODEL: &str = "gpt-4o-mini";
const GENERATE_MODEL: &str = "gpt-4o";

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

/// OpenAI implementation of classification and generation
#[derive(Clone)]
pub struct OpenAIClient {
    api_key: String,
    client: reqwest::Client,
}

impl OpenAIClient {
    pub fn new(api_key: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { api_key, client })
    }

    async fn chat(&self, request: &ChatRequest) -> Result<String> {
        let response = self
            .client
            .post(CHAT_COMPLETIONS_URL)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .context("Failed to send chat completion request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("OpenAI API error {}: {}", status, body);
        }

        let chat: ChatResponse = response
            .json()
            .await
            .context("Failed to parse chat completion response")?;

        chat.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| anyhow::anyhow!("OpenAI returned no choices"))
    }
}

#[async_trait]
impl BaseClassifier for OpenAIClient {
    async fn classify(&self, record: &Record) -> Result<JobAttributes> {
        let posting = serde_json::to_string(record)?;
        let request = ChatRequest {
            model: CLASSIFY_MODEL.to_string(),
            messages: vec![
                json!({
                    "role": "system",
                    "content": "Classify the job posting. Respond with JSON: \
                        {category, seniority, employment_type, remote, skills, confidence}."
                }),
                json!({"role": "user", "content": posting}),
            ],
            response_format: Some(json!({"type": "json_object"})),
        };

        let content = self.chat(&request).await?;
        serde_json::from_str(&content).context("Failed to parse classification JSON")
    }
}

#[async_trait]
impl BaseGenerator for OpenAIClient {
    async fn generate_article(
        &self,
        topic: &str,
        keywords: &[String],
        facts: &[String],
    ) -> Result<ArticleDraft> {
        let request = ChatRequest {
            model: GENERATE_MODEL.to_string(),
            messages: vec![
                json!({
                    "role": "system",
                    "content": "Write a long-form markdown article grounded ONLY in the \
                        provided facts. Respond with JSON: \
                        {slug, title, body_markdown, summary, seo_keywords}."
                }),
                json!({
                    "role": "user",
                    "content": format!(
                        "Topic: {topic}\nTarget keywords: {}\nFacts:\n{}",
                        keywords.join(", "),
                        facts.join("\n")
                    )
                }),
            ],
            response_format: Some(json!({"type": "json_object"})),
        };

        let content = self.chat(&request).await?;
        let mut draft: ArticleDraft =
            serde_json::from_str(&content).context("Failed to parse article JSON")?;
        draft.graph_facts = Some(facts.to_vec());
        Ok(draft)
    }
}
