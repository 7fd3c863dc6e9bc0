//! Shared types used across domains and the kernel.

pub mod types;

pub use types::{ArticleDraft, ContentVariant, JobAttributes, VideoMetadata};
