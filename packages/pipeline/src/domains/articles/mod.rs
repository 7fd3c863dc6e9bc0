//! Articles domain: saving generated long-form content.

pub mod activities;
pub mod models;

pub use activities::save_article::{generate_and_save_article, save_article};
pub use models::article::Article;
