//! Grounded answer generation: citation numbering, prompts and normalization

pub mod citation;
pub mod ollama;
pub mod prompt;
pub mod registry;

pub use citation::{CitationNormalizer, REFERENCES_HEADING};
pub use ollama::OllamaClient;
pub use prompt::{persist_last_prompt, PromptBuilder};
pub use registry::{Reference, ReferenceRegistry};
