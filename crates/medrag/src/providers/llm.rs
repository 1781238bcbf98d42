//! LLM provider trait for answer generation

use async_trait::async_trait;

use crate::error::Result;

/// Trait for invoking a language model on an assembled prompt
///
/// Failures come back as [`crate::Error::GenerationFailure`] carrying the
/// collaborator's diagnostic text.
///
/// Implementations:
/// - `OllamaLlm`: Ollama HTTP API
/// - `OllamaCliLlm`: `ollama run <model>` subprocess
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Run the prompt and return the raw model text
    async fn invoke(&self, prompt: &str) -> Result<String>;

    /// Check if the provider is healthy and available
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}
