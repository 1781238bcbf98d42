//! Similarity scoring and exact re-ranking of coarse search results

pub mod metadata;
pub mod rerank;
pub mod similarity;

pub use metadata::SourceField;
pub use rerank::{rerank, score_candidates};
pub use similarity::cosine_similarity;
