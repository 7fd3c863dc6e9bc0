//! Core trait abstractions.

pub mod store;

pub use store::{check_existing_fail_open, RecordStore};
