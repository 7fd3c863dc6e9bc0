//! Typed errors for the reconciliation library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.
//!
//! Data-quality problems (unidentifiable records, inconsistent upstream
//! partitions, unreachable stores) are NOT errors here — they are absorbed
//! into counters and warnings on the result. Only caller contract
//! violations and store transport failures surface as `ReconcileError`.

use thiserror::Error;

/// Errors that can occur during reconciliation operations.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// A partition payload is not the expected shape at all
    /// (e.g. not a JSON object, or missing the record lists).
    /// This indicates a caller bug, not a data-quality issue.
    #[error("malformed partition: {reason}")]
    MalformedPartition { reason: String },

    /// A backing store failed while checking existence.
    /// Callers that want fail-open behavior should go through
    /// [`check_existing_fail_open`](crate::check_existing_fail_open)
    /// instead of handling this directly.
    #[error("store error: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// JSON (de)serialization error.
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl ReconcileError {
    /// Convenience constructor for malformed-partition errors.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedPartition {
            reason: reason.into(),
        }
    }

    /// Convenience constructor for store errors.
    pub fn store<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Store(Box::new(err))
    }
}

/// Result type alias for reconciliation operations.
pub type Result<T> = std::result::Result<T, ReconcileError>;
