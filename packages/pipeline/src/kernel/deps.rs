//! Pipeline dependencies for activities (using traits for testability)
//!
//! Central dependency container handed to every domain activity. External
//! services sit behind trait objects so activities can be tested with the
//! mocks in [`test_dependencies`](crate::kernel::test_dependencies).

use std::sync::Arc;

use sqlx::PgPool;

use crate::kernel::{BaseClassifier, BaseGenerator, GraphStore};

/// Dependencies accessible to pipeline activities
#[derive(Clone)]
pub struct PipelineDeps {
    pub db_pool: PgPool,
    /// LLM classifier for enriching new postings.
    pub classifier: Arc<dyn BaseClassifier>,
    /// LLM generator for long-form articles.
    pub generator: Arc<dyn BaseGenerator>,
    /// Knowledge graph. Optional: environments without a graph configured
    /// run relational-only, and the graph check degrades to fail-open.
    pub graph: Option<Arc<dyn GraphStore>>,
}

impl PipelineDeps {
    pub fn new(
        db_pool: PgPool,
        classifier: Arc<dyn BaseClassifier>,
        generator: Arc<dyn BaseGenerator>,
        graph: Option<Arc<dyn GraphStore>>,
    ) -> Self {
        Self {
            db_pool,
            classifier,
            generator,
            graph,
        }
    }
}
