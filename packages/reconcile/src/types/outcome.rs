//! ReconciledResult - the four-way categorization and its diagnostics.

use serde::{Deserialize, Serialize};

use crate::identity::IdentityKey;
use crate::types::record::Record;

/// Which store a diagnostic refers to.
///
/// `Primary` is store A (the relational database), `Secondary` is store B
/// (the knowledge graph). Under normal operation the primary is populated
/// before the secondary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreSide {
    Primary,
    Secondary,
}

impl StoreSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreSide::Primary => "primary",
            StoreSide::Secondary => "secondary",
        }
    }
}

/// A non-fatal condition observed during reconciliation.
///
/// Warnings come back as data rather than being logged inline so the
/// reconciler stays a pure function; the caller decides whether to log,
/// alert, or ignore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Warning {
    /// The same identity key appeared in both the new and existing lists
    /// of one partition — an upstream contract violation. The key was
    /// treated as existing.
    InconsistentPartition { side: StoreSide, key: IdentityKey },

    /// Records exist in the secondary store but not the primary. Expected
    /// to be rare, since the primary is populated first; non-empty drift
    /// is worth a warning but never an error.
    SecondaryOnlyDrift { count: usize },

    /// A bucketed key had no record in the merged lookup. Should not occur;
    /// the key is dropped rather than crashing the run.
    MissingLookup { key: IdentityKey },
}

/// The four-way partition produced by reconciling two existence checks.
///
/// The buckets are pairwise disjoint by identity key and together cover
/// every identifiable key seen in either input partition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReconciledResult {
    /// New in both stores: persist everywhere.
    pub completely_new: Vec<Record>,

    /// Already in the primary store only: sync to the secondary.
    pub in_primary_only: Vec<Record>,

    /// Already in the secondary store only (drift): backfill the primary.
    pub in_secondary_only: Vec<Record>,

    /// Already in both stores: refresh timestamps only.
    pub in_both: Vec<Record>,

    /// Records excluded because no identity key could be resolved.
    pub unidentifiable_records: usize,

    /// Non-fatal conditions observed while reconciling.
    #[serde(default)]
    pub warnings: Vec<Warning>,
}

impl ReconciledResult {
    /// Total records across the four buckets.
    pub fn total(&self) -> usize {
        self.completely_new.len()
            + self.in_primary_only.len()
            + self.in_secondary_only.len()
            + self.in_both.len()
    }

    /// Whether every reconciled record landed in `completely_new` —
    /// the expected shape when both upstream checks degraded fail-open.
    pub fn is_all_new(&self) -> bool {
        self.in_primary_only.is_empty()
            && self.in_secondary_only.is_empty()
            && self.in_both.is_empty()
    }

    /// Per-bucket counts, in a log-friendly shape.
    pub fn counts(&self) -> BucketCounts {
        BucketCounts {
            completely_new: self.completely_new.len(),
            in_primary_only: self.in_primary_only.len(),
            in_secondary_only: self.in_secondary_only.len(),
            in_both: self.in_both.len(),
            unidentifiable: self.unidentifiable_records,
        }
    }
}

/// Bucket sizes emitted alongside the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketCounts {
    pub completely_new: usize,
    pub in_primary_only: usize,
    pub in_secondary_only: usize,
    pub in_both: usize,
    pub unidentifiable: usize,
}
