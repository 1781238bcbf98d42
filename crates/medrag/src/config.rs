//! Configuration for the RAG system
//!
//! Values come from a TOML file (every section optional) and a handful of
//! `MEDRAG_*` environment overrides applied on top.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Environment variable naming the config file to load
pub const CONFIG_ENV: &str = "MEDRAG_CONFIG";

/// Config file picked up from the working directory when present
pub const DEFAULT_CONFIG_FILE: &str = "medrag.toml";

/// Main RAG system configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Embedding configuration
    pub embeddings: EmbeddingConfig,
    /// Ollama/LLM configuration
    pub llm: LlmConfig,
    /// Retrieval and answer assembly
    pub retrieval: RetrievalConfig,
    /// Vector store configuration
    pub vector_db: VectorDbConfig,
    /// Diagnostic artifacts
    pub debug: DebugConfig,
}

impl RagConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        let config: Self = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve config from `MEDRAG_CONFIG`, then `medrag.toml`, then defaults,
    /// and apply environment overrides.
    pub fn from_env_or_default() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::load(Path::new(&path))?,
            Err(_) if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::load(Path::new(DEFAULT_CONFIG_FILE))?
            }
            Err(_) => Self::default(),
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `MEDRAG_*` environment overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(url) = std::env::var("MEDRAG_OLLAMA_URL") {
            self.llm.base_url = url;
        }
        if let Ok(model) = std::env::var("MEDRAG_GENERATE_MODEL") {
            self.llm.generate_model = model;
        }
        if let Ok(model) = std::env::var("MEDRAG_EMBED_MODEL") {
            self.llm.embed_model = model;
        }
        if let Ok(path) = std::env::var("MEDRAG_INDEX_PATH") {
            self.vector_db.index_path = PathBuf::from(path);
        }
        if let Ok(secs) = std::env::var("MEDRAG_LLM_TIMEOUT_SECS") {
            self.llm.timeout_secs = secs.parse().map_err(|_| {
                Error::Config(format!("MEDRAG_LLM_TIMEOUT_SECS is not a number: {}", secs))
            })?;
        }
        Ok(())
    }

    /// Reject values the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.retrieval.coarse_multiplier == 0 {
            return Err(Error::Config("retrieval.coarse_multiplier must be at least 1".to_string()));
        }
        if self.llm.timeout_secs == 0 {
            return Err(Error::Config("llm.timeout_secs must be at least 1".to_string()));
        }
        if self.embeddings.dimensions == 0 {
            return Err(Error::Config("embeddings.dimensions must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7860,
            enable_cors: true,
        }
    }
}

/// Embedding configuration. The model itself is `llm.embed_model`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Embedding dimensions (384 for MiniLM)
    pub dimensions: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self { dimensions: 384 }
    }
}

/// How the language model is reached
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LlmBackend {
    /// Ollama HTTP API
    #[default]
    Http,
    /// `ollama run <model>` subprocess
    Cli,
}

/// LLM (Ollama) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Transport used for generation
    pub backend: LlmBackend,
    /// Ollama base URL
    pub base_url: String,
    /// Embedding model name
    pub embed_model: String,
    /// Generation model name
    pub generate_model: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Upper bound on a single generation call, in seconds
    pub timeout_secs: u64,
    /// Retries for embedding requests (generation is never retried)
    pub max_embed_retries: u32,
    /// Program spawned by the CLI backend
    pub cli_program: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            backend: LlmBackend::Http,
            base_url: "http://localhost:11434".to_string(),
            embed_model: "all-minilm".to_string(),
            generate_model: "deepseek-r1:7b".to_string(),
            temperature: 0.2,
            timeout_secs: 120,
            max_embed_retries: 2,
            cli_program: "ollama".to_string(),
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Hits kept after re-ranking when the caller does not say
    pub default_top_k: usize,
    /// Coarse candidates requested per final hit
    pub coarse_multiplier: usize,
    /// Terminal answer when nothing was retrieved
    pub no_context_message: String,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            default_top_k: 5,
            coarse_multiplier: 4,
            no_context_message: crate::types::NO_CONTEXT_MESSAGE.to_string(),
        }
    }
}

/// Vector store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorDbConfig {
    /// JSONL file with one stored record per line
    pub index_path: PathBuf,
}

impl Default for VectorDbConfig {
    fn default() -> Self {
        let index_path = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("medrag")
            .join("index.jsonl");

        Self { index_path }
    }
}

/// Diagnostic artifact configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Write the last assembled prompt to `prompt_path`
    pub persist_prompt: bool,
    /// Where the last prompt goes
    pub prompt_path: PathBuf,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            persist_prompt: true,
            prompt_path: PathBuf::from("debug").join("last_prompt.txt"),
        }
    }
}
