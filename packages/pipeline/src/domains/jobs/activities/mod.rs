//! Jobs domain activities
//!
//! Each activity is one independently retried workflow step.

pub mod check_graph;
pub mod check_relational;
pub mod ingest;

pub use check_graph::GraphJobStore;
pub use check_relational::RelationalJobStore;
pub use ingest::{ingest_batch, IngestSummary};
