//! Domain layers: business logic grouped by concern.

pub mod articles;
pub mod jobs;
