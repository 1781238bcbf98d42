//! medrag: retrieval and citation pipeline for medical textbook Q&A
//!
//! Coarse vector search results are re-ranked by exact cosine similarity,
//! deduplicated into a numbered reference list, turned into a grounded
//! prompt, and the model's answer is normalized so its inline `[n]`
//! citations line up with the reference list appended to it.

pub mod config;
pub mod error;
pub mod generation;
pub mod pipeline;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod types;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use generation::{CitationNormalizer, PromptBuilder, Reference, ReferenceRegistry};
pub use pipeline::{HealthReport, PipelineSettings, RagPipeline};
pub use retrieval::{cosine_similarity, rerank};
pub use types::{
    format_hits_markdown, Candidate, Hit, QueryRequest, QueryResponse, SourceKey,
    NO_CONTEXT_MESSAGE,
};
