//! Pipeline orchestration for scraped job data.
//!
//! Activities invoked by the workflow host: check a scraped batch against
//! the relational store and the knowledge graph, reconcile the results
//! (via the `reconcile` library), then dispatch each bucket — persist new
//! postings, backfill drifted ones, sync to the graph, refresh timestamps.
//! A second domain saves generated marketing articles with idempotent
//! field-preserving merges.
//!
//! Every activity is independently retryable: reads are naturally
//! idempotent and all writes are upserts keyed on stable identities.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;

pub use config::Config;
