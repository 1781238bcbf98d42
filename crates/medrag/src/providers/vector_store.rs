//! Vector store provider trait for coarse candidate search

use async_trait::async_trait;

use crate::error::Result;
use crate::types::Candidate;

/// Trait for the coarse search stage
///
/// Results carry their stored vectors so the pipeline can re-rank them
/// exactly; the order returned here is not trusted.
///
/// Implementations:
/// - `LocalVectorStore`: in-memory records loaded from a JSONL index
#[async_trait]
pub trait VectorStoreProvider: Send + Sync {
    /// Return up to `n` plausible candidates for `query_embedding`
    async fn coarse_search(&self, query_embedding: &[f32], n: usize) -> Result<Vec<Candidate>>;

    /// Get total number of vectors stored
    async fn len(&self) -> Result<usize>;

    /// Check if store is empty
    async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }

    /// Check if the provider is healthy
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
