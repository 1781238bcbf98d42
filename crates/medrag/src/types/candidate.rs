//! Coarse-search candidates

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Free-form metadata attached to an indexed chunk.
///
/// Upstream indexers disagree on shape (`chapter` vs `chapters`, numeric vs
/// string pages, explicit nulls), so values are kept as raw JSON and
/// resolved later by [`crate::retrieval::metadata`].
pub type Metadata = HashMap<String, serde_json::Value>;

/// One record returned by the coarse vector search, scoped to a single query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    /// Stored embedding
    pub vector: Vec<f32>,
    /// Chunk text
    pub text: String,
    /// Source attribution
    #[serde(default)]
    pub metadata: Metadata,
}

impl Candidate {
    /// Create a candidate without metadata
    pub fn new(vector: Vec<f32>, text: impl Into<String>) -> Self {
        Self {
            vector,
            text: text.into(),
            metadata: Metadata::new(),
        }
    }

    /// Builder-style metadata insert
    pub fn with_meta(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }
}

/// A candidate with its exact similarity to the query.
///
/// `coarse_rank` is the 0-based position the candidate had in the coarse
/// result list; it breaks score ties.
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub candidate: Candidate,
    pub score: f32,
    pub coarse_rank: usize,
}
