//! Data types for reconciliation.

pub mod outcome;
pub mod partition;
pub mod record;

pub use outcome::{ReconciledResult, StoreSide, Warning};
pub use partition::ExistencePartition;
pub use record::Record;
