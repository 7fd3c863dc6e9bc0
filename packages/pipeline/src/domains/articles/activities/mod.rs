//! Articles domain activities

pub mod save_article;

pub use save_article::{generate_and_save_article, save_article};
