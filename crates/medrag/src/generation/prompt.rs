//! Prompt templates for grounded RAG generation

use std::path::Path;

use super::registry::ReferenceRegistry;
use crate::error::{Error, Result};
use crate::types::Hit;

const INSTRUCTIONS: &str = r#"You are a careful medical assistant that answers ONLY from the numbered excerpts below.

RULES - FOLLOW THEM EXACTLY:
1. Paraphrase the excerpts in your own words; never copy sentences verbatim
2. End EVERY sentence with the bracketed number of the excerpt it relies on, e.g. [1] or [2]
3. Use only the numbers shown in front of the excerpts; several excerpts may share a number
4. NEVER add knowledge that is not in the excerpts
5. If the excerpts do not answer the question, say that the information is not available"#;

/// Prompt builder for RAG queries
pub struct PromptBuilder;

impl PromptBuilder {
    /// One line per hit: `[n] chunk — source`, numbered through the registry
    pub fn build_context(hits: &[Hit], registry: &ReferenceRegistry) -> Result<String> {
        let mut lines = Vec::with_capacity(hits.len());

        for hit in hits {
            let key = hit.key();
            let index = registry
                .index_of(&key)
                .ok_or_else(|| Error::UnknownReference(key.prompt_label()))?;

            lines.push(format!(
                "[{}] {} — {}",
                index,
                single_line(&hit.chunk),
                key.prompt_label()
            ));
        }

        Ok(lines.join("\n"))
    }

    /// Build the full grounded prompt
    pub fn build_rag_prompt(
        question: &str,
        hits: &[Hit],
        registry: &ReferenceRegistry,
    ) -> Result<String> {
        let context = Self::build_context(hits, registry)?;

        Ok(format!(
            "{instructions}\n\nEXCERPTS:\n{context}\n\nQuestion: {question}\nAnswer:",
            instructions = INSTRUCTIONS,
            context = context,
            question = question
        ))
    }
}

/// Chunks extracted from PDFs carry hard line breaks
fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Write the last prompt for debugging. Failures are logged, never returned.
pub async fn persist_last_prompt(path: &Path, prompt: &str) {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = tokio::fs::create_dir_all(parent).await {
            tracing::warn!("Could not create {}: {}", parent.display(), e);
            return;
        }
    }

    match tokio::fs::write(path, prompt).await {
        Ok(()) => tracing::debug!("Saved prompt to {}", path.display()),
        Err(e) => tracing::warn!("Could not save prompt to {}: {}", path.display(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(chunk: &str, book: &str, chapter: &str, rank: usize) -> Hit {
        Hit {
            chunk: chunk.to_string(),
            source_book: book.to_string(),
            chapter: chapter.to_string(),
            section: "–".to_string(),
            pages: "12".to_string(),
            score: 0.5,
            rank,
        }
    }

    #[test]
    fn test_context_uses_registry_indices() {
        let hits = vec![
            hit("Exertional chest pain.", "Harrison", "Angina", 1),
            hit("ECG at rest is often normal.", "Braunwald", "–", 2),
            hit("Relieved by rest.", "Harrison", "Angina", 3),
        ];
        let registry = ReferenceRegistry::build(&hits);
        let context = PromptBuilder::build_context(&hits, &registry).unwrap();
        let lines: Vec<&str> = context.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "[1] Exertional chest pain. — Harrison, Chapter: Angina, Page 12");
        assert_eq!(lines[1], "[2] ECG at rest is often normal. — Braunwald, Page 12");
        assert!(lines[2].starts_with("[1] Relieved by rest."));
    }

    #[test]
    fn test_prompt_layout() {
        let hits = vec![hit("Multi\nline\n chunk", "Harrison", "–", 1)];
        let registry = ReferenceRegistry::build(&hits);
        let prompt =
            PromptBuilder::build_rag_prompt("nyeri dada saat beraktivitas?", &hits, &registry)
                .unwrap();

        assert!(prompt.starts_with("You are a careful medical assistant"));
        assert!(prompt.contains("[1] Multi line chunk — Harrison, Page 12"));
        assert!(prompt.ends_with("Question: nyeri dada saat beraktivitas?\nAnswer:"));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let hits = vec![hit("a", "A", "–", 1), hit("b", "B", "–", 2)];
        let registry = ReferenceRegistry::build(&hits);
        let first = PromptBuilder::build_rag_prompt("q", &hits, &registry).unwrap();
        let second = PromptBuilder::build_rag_prompt("q", &hits, &registry).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unregistered_hit_is_rejected() {
        let registry = ReferenceRegistry::build(&[hit("a", "A", "–", 1)]);
        let stranger = vec![hit("b", "B", "–", 1)];
        let err = PromptBuilder::build_context(&stranger, &registry).unwrap_err();
        assert!(matches!(err, Error::UnknownReference(_)));
    }

    #[tokio::test]
    async fn test_persist_last_prompt_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("debug").join("last_prompt.txt");

        persist_last_prompt(&path, "prompt body").await;
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "prompt body");
    }
}
