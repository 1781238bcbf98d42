//! Provider abstractions for the pipeline's external collaborators
//!
//! The pipeline only talks to these traits, so tests can swap in fakes for
//! the embedding model, the vector store and the language model.

pub mod embedding;
pub mod llm;
pub mod local;
pub mod ollama;
pub mod subprocess;
pub mod vector_store;

pub use embedding::EmbeddingProvider;
pub use llm::LlmProvider;
pub use local::{LocalVectorStore, StoredRecord};
pub use ollama::{OllamaEmbedder, OllamaLlm};
pub use subprocess::OllamaCliLlm;
pub use vector_store::VectorStoreProvider;
