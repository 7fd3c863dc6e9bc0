//! Pipeline worker: runs activities on demand.
//!
//! The workflow host normally invokes these as retried steps; this binary
//! exposes the same entry points for operations and local runs.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;

use pipeline_core::domains::articles::generate_and_save_article;
use pipeline_core::domains::jobs::ingest_batch;
use pipeline_core::kernel::{GraphStore, OpenAIClient, PipelineDeps, ZepClient};
use pipeline_core::Config;
use reconcile::Record;

#[derive(Parser)]
#[command(name = "worker", about = "Job-data pipeline worker")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ingest a scraped batch (JSON array of records) for a board
    Ingest {
        #[arg(long)]
        board: String,
        /// Path to a JSON file containing the scraped records
        #[arg(long)]
        input: PathBuf,
    },
    /// Generate and save an article for a topic
    GenerateArticle {
        #[arg(long)]
        topic: String,
        #[arg(long, value_delimiter = ',')]
        keywords: Vec<String>,
        /// Path to a JSON file containing grounding facts (array of strings)
        #[arg(long)]
        facts: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,sqlx=warn".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    let openai = OpenAIClient::new(
        config
            .openai_api_key
            .clone()
            .context("OPENAI_API_KEY must be set for worker runs")?,
    )?;

    let graph: Option<Arc<dyn GraphStore>> = match (&config.zep_api_url, &config.zep_api_key) {
        (Some(url), Some(key)) => Some(Arc::new(ZepClient::new(url.clone(), key.clone())?)),
        _ => {
            tracing::warn!("ZEP_API_URL/ZEP_API_KEY not set; running relational-only");
            None
        }
    };

    let deps = PipelineDeps::new(
        db_pool,
        Arc::new(openai.clone()),
        Arc::new(openai),
        graph,
    );

    match cli.command {
        Command::Ingest { board, input } => {
            let raw = std::fs::read_to_string(&input)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            let records: Vec<Record> =
                serde_json::from_str(&raw).context("Input must be a JSON array of records")?;

            let summary = ingest_batch(&board, records, &deps).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::GenerateArticle {
            topic,
            keywords,
            facts,
        } => {
            let facts: Vec<String> = match facts {
                Some(path) => {
                    let raw = std::fs::read_to_string(&path)
                        .with_context(|| format!("Failed to read {}", path.display()))?;
                    serde_json::from_str(&raw).context("Facts must be a JSON array of strings")?
                }
                None => Vec::new(),
            };

            let article = generate_and_save_article(&topic, &keywords, &facts, &deps).await?;
            println!("saved article: {} ({})", article.slug, article.id);
        }
    }

    Ok(())
}
