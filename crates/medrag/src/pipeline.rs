//! End-to-end query pipeline
//!
//! embed -> coarse search -> rerank -> registry -> prompt -> LLM -> citations.
//! Collaborators are injected so each stage can be replaced in tests. Every
//! call builds its own registry, prompt and answer; only the providers are
//! shared.

use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::config::{LlmBackend, RagConfig};
use crate::error::{Error, Result};
use crate::generation::{
    persist_last_prompt, CitationNormalizer, OllamaClient, PromptBuilder, ReferenceRegistry,
};
use crate::providers::{
    EmbeddingProvider, LlmProvider, LocalVectorStore, OllamaCliLlm, OllamaEmbedder, OllamaLlm,
    VectorStoreProvider,
};
use crate::retrieval::rerank;
use crate::types::{Hit, QueryResponse, NO_CONTEXT_MESSAGE};

/// Per-pipeline knobs taken from [`RagConfig`]
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Coarse candidates requested per final hit
    pub coarse_multiplier: usize,
    /// Upper bound on one LLM invocation
    pub llm_timeout: Duration,
    /// Answer returned when nothing was retrieved
    pub no_context_message: String,
    /// Where to write the last prompt, if anywhere
    pub prompt_path: Option<PathBuf>,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            coarse_multiplier: 4,
            llm_timeout: Duration::from_secs(120),
            no_context_message: NO_CONTEXT_MESSAGE.to_string(),
            prompt_path: None,
        }
    }
}

impl PipelineSettings {
    pub fn from_config(config: &RagConfig) -> Self {
        Self {
            coarse_multiplier: config.retrieval.coarse_multiplier,
            llm_timeout: Duration::from_secs(config.llm.timeout_secs),
            no_context_message: config.retrieval.no_context_message.clone(),
            prompt_path: config
                .debug
                .persist_prompt
                .then(|| config.debug.prompt_path.clone()),
        }
    }
}

/// Collaborator status as reported by `health`
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub embedder: bool,
    pub vector_store: bool,
    pub llm: bool,
    pub indexed_records: usize,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.embedder && self.vector_store && self.llm
    }
}

/// Retrieval-augmented answering over injected providers
pub struct RagPipeline {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStoreProvider>,
    llm: Arc<dyn LlmProvider>,
    normalizer: CitationNormalizer,
    settings: PipelineSettings,
}

impl RagPipeline {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStoreProvider>,
        llm: Arc<dyn LlmProvider>,
        settings: PipelineSettings,
    ) -> Result<Self> {
        Ok(Self {
            embedder,
            store,
            llm,
            normalizer: CitationNormalizer::new()?,
            settings,
        })
    }

    /// Wire Ollama providers and the JSONL index from configuration
    pub fn from_config(config: &RagConfig) -> Result<Self> {
        let ollama = Arc::new(OllamaClient::new(&config.llm)?);
        tracing::info!(
            "Ollama client initialized (using {} for embeddings)",
            config.llm.embed_model
        );

        let embedder: Arc<dyn EmbeddingProvider> = Arc::new(OllamaEmbedder::from_client(
            Arc::clone(&ollama),
            config.embeddings.dimensions,
        ));

        let llm: Arc<dyn LlmProvider> = match config.llm.backend {
            LlmBackend::Http => Arc::new(OllamaLlm::from_client(ollama)),
            LlmBackend::Cli => Arc::new(OllamaCliLlm::new(&config.llm)),
        };
        tracing::info!("LLM provider: {} ({})", llm.name(), llm.model());

        let store: Arc<dyn VectorStoreProvider> =
            Arc::new(LocalVectorStore::load_jsonl(&config.vector_db.index_path)?);

        Self::new(embedder, store, llm, PipelineSettings::from_config(config))
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    pub fn llm(&self) -> &Arc<dyn LlmProvider> {
        &self.llm
    }

    pub fn embedder(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.embedder
    }

    pub fn vector_store(&self) -> &Arc<dyn VectorStoreProvider> {
        &self.store
    }

    /// Answer `query` from the top `top_k` hits; the final answer text only
    pub async fn generate_answer(&self, query: &str, top_k: usize) -> Result<String> {
        Ok(self.answer(query, top_k).await?.answer)
    }

    /// Embed, search and re-rank without generating
    pub async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<Hit>> {
        self.retrieve_hits(Uuid::new_v4(), query, top_k).await
    }

    /// Full pipeline with a structured result
    pub async fn answer(&self, query: &str, top_k: usize) -> Result<QueryResponse> {
        let start = Instant::now();
        let id = Uuid::new_v4();

        tracing::info!(%id, "Query: \"{}\" (top_k={})", query, top_k);

        let hits = self.retrieve_hits(id, query, top_k).await?;
        if hits.is_empty() {
            tracing::info!(%id, "No context found, skipping generation");
            return Ok(QueryResponse::no_context(
                id,
                query,
                &self.settings.no_context_message,
                elapsed_ms(start),
            ));
        }

        let registry = ReferenceRegistry::build(&hits);
        tracing::info!(%id, "{} hits from {} distinct sources", hits.len(), registry.len());

        let prompt = PromptBuilder::build_rag_prompt(query, &hits, &registry)?;
        if let Some(path) = &self.settings.prompt_path {
            persist_last_prompt(path, &prompt).await;
        }

        let raw = self.invoke_llm(id, &prompt).await?;
        let answer = self.normalizer.normalize(&raw, &hits, &registry);

        let processing_time_ms = elapsed_ms(start);
        tracing::info!(
            %id,
            "Query completed in {}ms, {} references",
            processing_time_ms,
            registry.len()
        );

        Ok(QueryResponse::new(
            id,
            query,
            answer,
            hits,
            registry.references(),
            processing_time_ms,
        ))
    }

    /// Report whether each collaborator answers
    pub async fn health(&self) -> HealthReport {
        HealthReport {
            embedder: self.embedder.health_check().await.unwrap_or(false),
            vector_store: self.store.health_check().await.unwrap_or(false),
            llm: self.llm.health_check().await.unwrap_or(false),
            indexed_records: self.store.len().await.unwrap_or(0),
        }
    }

    async fn retrieve_hits(&self, id: Uuid, query: &str, top_k: usize) -> Result<Vec<Hit>> {
        if query.trim().is_empty() || top_k == 0 {
            return Ok(Vec::new());
        }

        let query_embedding = self.embedder.embed(query).await?;

        let coarse_k = top_k.saturating_mul(self.settings.coarse_multiplier);
        let candidates = self.store.coarse_search(&query_embedding, coarse_k).await?;
        tracing::info!(
            %id,
            "Coarse search via {} returned {} candidates (requested {})",
            self.store.name(),
            candidates.len(),
            coarse_k
        );

        rerank(&query_embedding, &candidates, top_k)
    }

    async fn invoke_llm(&self, id: Uuid, prompt: &str) -> Result<String> {
        tracing::info!(%id, "Invoking {} ({})", self.llm.name(), self.llm.model());

        match tokio::time::timeout(self.settings.llm_timeout, self.llm.invoke(prompt)).await {
            Ok(Ok(raw)) => Ok(raw),
            Ok(Err(e)) => {
                tracing::error!(%id, "Generation failed: {}", e);
                Err(e)
            }
            Err(_) => {
                let secs = self.settings.llm_timeout.as_secs();
                tracing::error!(%id, "Generation timed out after {}s", secs);
                Err(Error::GenerationTimeout { secs })
            }
        }
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_settings_from_config() {
        let mut config = RagConfig::default();
        config.retrieval.coarse_multiplier = 3;
        config.llm.timeout_secs = 9;
        config.debug.persist_prompt = false;

        let settings = PipelineSettings::from_config(&config);
        assert_eq!(settings.coarse_multiplier, 3);
        assert_eq!(settings.llm_timeout, Duration::from_secs(9));
        assert!(settings.prompt_path.is_none());
    }

    #[test]
    fn test_settings_keep_prompt_path_when_enabled() {
        let settings = PipelineSettings::from_config(&RagConfig::default());
        assert_eq!(
            settings.prompt_path.as_deref(),
            Some(Path::new("debug/last_prompt.txt"))
        );
        assert_eq!(settings.no_context_message, NO_CONTEXT_MESSAGE);
    }

    #[test]
    fn test_from_config_requires_index() {
        let mut config = RagConfig::default();
        config.vector_db.index_path = PathBuf::from("/nonexistent/index.jsonl");
        assert!(matches!(RagPipeline::from_config(&config), Err(Error::VectorDb(_))));
    }

    #[test]
    fn test_health_report() {
        let report = HealthReport {
            embedder: true,
            vector_store: true,
            llm: false,
            indexed_records: 10,
        };
        assert!(!report.is_healthy());
    }
}
