//! Infrastructure layer: trait seams, external clients, and the
//! dependency container handed to domain activities.

pub mod ai;
pub mod deps;
pub mod graph_client;
pub mod test_dependencies;
pub mod traits;

pub use ai::OpenAIClient;
pub use deps::PipelineDeps;
pub use graph_client::{GraphNode, GraphStore, ZepClient};
pub use traits::{BaseClassifier, BaseGenerator};
