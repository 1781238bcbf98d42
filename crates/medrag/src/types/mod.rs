//! Core types for the retrieval pipeline

pub mod candidate;
pub mod hit;
pub mod query;
pub mod response;

pub use candidate::{Candidate, Metadata, ScoredCandidate};
pub use hit::{format_hits_markdown, Hit, SourceKey, MISSING_FIELD};
pub use query::QueryRequest;
pub use response::{QueryResponse, NO_CONTEXT_MESSAGE};
