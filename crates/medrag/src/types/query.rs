//! Query request types

use serde::{Deserialize, Serialize};

/// Query request accepted by the HTTP surface
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    /// The question to answer
    pub question: String,

    /// Hits kept after re-ranking (server default when absent)
    #[serde(default)]
    pub top_k: Option<usize>,
}
