//! Jobs domain: scraped posting ingestion and dual-store reconciliation.

pub mod activities;
pub mod classify;
pub mod models;

pub use activities::ingest::{ingest_batch, IngestSummary};
pub use models::job_posting::JobPosting;
