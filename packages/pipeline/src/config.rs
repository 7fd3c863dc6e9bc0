use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Knowledge-graph API. Optional: when absent the graph existence
    /// check degrades to fail-open and graph sync is skipped.
    pub zep_api_url: Option<String>,
    pub zep_api_key: Option<String>,
    pub openai_api_key: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            zep_api_url: env::var("ZEP_API_URL").ok(),
            zep_api_key: env::var("ZEP_API_KEY").ok(),
            openai_api_key: env::var("OPENAI_API_KEY").ok(),
        })
    }
}
