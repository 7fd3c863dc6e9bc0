//! Store-Agnostic Record Reconciliation Library
//!
//! Scraped records (job postings, company profiles) are checked for
//! existence against two independent stores: a relational database and a
//! knowledge graph. Each check partitions a batch into new/existing. This
//! library combines the two partitions into a single four-way
//! categorization that downstream steps consume:
//!
//! - `completely_new` — unseen by both stores
//! - `in_primary_only` — already in the relational store
//! - `in_secondary_only` — already in the graph (drift; rare)
//! - `in_both` — fully synced
//!
//! # Design Philosophy
//!
//! - Reconciliation is a pure function over already-fetched data. No I/O,
//!   no logging side effects: diagnostics come back as data on the result.
//! - Dirty data never fails a run. Unidentifiable records are counted and
//!   excluded; inconsistent upstream partitions are repaired with a
//!   warning; an unreachable store degrades to "everything is new"
//!   (fail-open) because downstream writes are idempotent upserts.
//! - Identity lives in one place. The `job_id` / `external_id` / URL-suffix
//!   precedence chain is encoded once in [`resolve_identity`], not
//!   re-derived at call sites.
//!
//! # Usage
//!
//! ```rust,ignore
//! use reconcile::{check_existing_fail_open, reconcile, Record, RecordStore};
//!
//! let batch: Vec<Record> = scrape_board().await?;
//! let (primary, secondary) = tokio::join!(
//!     check_existing_fail_open(&relational_store, &batch),
//!     check_existing_fail_open(&graph_store, &batch),
//! );
//! let outcome = reconcile(&primary, &secondary);
//! for warning in &outcome.warnings {
//!     tracing::warn!(?warning, "reconciliation warning");
//! }
//! persist_new(&outcome.completely_new).await?;
//! ```
//!
//! # Modules
//!
//! - [`identity`] - Identity-key extraction policy
//! - [`reconciler`] - Dual-store four-way reconciliation
//! - [`types`] - Records, partitions, and outcomes
//! - [`traits`] - The `RecordStore` seam and fail-open wrapper
//! - [`stores`] - Storage implementations (MemoryStore)
//! - [`testing`] - Mock implementations for testing

pub mod error;
pub mod identity;
pub mod reconciler;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{ReconcileError, Result};
pub use identity::{resolve_identity, IdentityKey};
pub use reconciler::reconcile;
pub use traits::store::{check_existing_fail_open, RecordStore};
pub use types::{
    outcome::{ReconciledResult, StoreSide, Warning},
    partition::ExistencePartition,
    record::Record,
};

// Re-export stores
pub use stores::MemoryStore;
