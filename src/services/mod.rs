pub mod collaborative;
pub mod content;
pub mod insights;
pub mod loader;
pub mod recommendations;
pub mod title_search;

pub use collaborative::ItemSimilarityMatrix;
pub use content::{ContentEngineKind, ContentModel, ContentSimilarity};
pub use loader::Dataset;
pub use recommendations::Recommender;
