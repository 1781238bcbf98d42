//! Response types for RAG queries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::hit::Hit;
use crate::generation::registry::Reference;

/// Terminal answer when retrieval finds nothing to ground on
pub const NO_CONTEXT_MESSAGE: &str = "Maaf, tidak ditemukan konteks untuk pertanyaan ini.";

/// Response from a RAG query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Query identifier, also used in log lines
    pub id: Uuid,
    /// The question as asked
    pub question: String,
    /// Normalized answer body followed by the reference block
    pub answer: String,
    /// Re-ranked hits the answer was grounded on
    pub hits: Vec<Hit>,
    /// Deduplicated sources in citation order
    pub references: Vec<Reference>,
    /// True when retrieval came back empty and generation was skipped
    pub no_context: bool,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
    /// When the answer was produced
    pub generated_at: DateTime<Utc>,
}

impl QueryResponse {
    /// Create a grounded answer response
    pub fn new(
        id: Uuid,
        question: &str,
        answer: String,
        hits: Vec<Hit>,
        references: Vec<Reference>,
        processing_time_ms: u64,
    ) -> Self {
        Self {
            id,
            question: question.to_string(),
            answer,
            hits,
            references,
            no_context: false,
            processing_time_ms,
            generated_at: Utc::now(),
        }
    }

    /// Create the terminal response used when no context was found
    pub fn no_context(id: Uuid, question: &str, message: &str, processing_time_ms: u64) -> Self {
        Self {
            id,
            question: question.to_string(),
            answer: message.to_string(),
            hits: Vec::new(),
            references: Vec::new(),
            no_context: true,
            processing_time_ms,
            generated_at: Utc::now(),
        }
    }
}
