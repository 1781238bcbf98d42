//! Citation normalization for raw model output
//!
//! The model is asked to cite with `[n]`, but its output is untrusted: it may
//! skip citations, cite out of order or invent numbers. [`CitationNormalizer`]
//! guarantees the final answer carries compact inline citations and ends with
//! the reference list from the same [`ReferenceRegistry`] the prompt used.

use regex::Regex;
use std::collections::HashMap;

use super::registry::ReferenceRegistry;
use crate::error::{Error, Result};
use crate::types::Hit;

const TOKEN_PATTERN: &str = r"\[(\d+)\]";

/// Heading of the appended reference block
pub const REFERENCES_HEADING: &str = "References:";

/// A bracketed citation found in the answer body
#[derive(Debug, Clone, PartialEq, Eq)]
struct CitationToken {
    start: usize,
    end: usize,
    /// Digits with leading zeros stripped, so `[01]` and `[1]` agree
    number: String,
}

/// Rewrites citations in model output against a reference registry
#[derive(Debug, Clone)]
pub struct CitationNormalizer {
    token: Regex,
}

impl CitationNormalizer {
    pub fn new() -> Result<Self> {
        let token = Regex::new(TOKEN_PATTERN)
            .map_err(|e| Error::internal(format!("citation pattern: {}", e)))?;
        Ok(Self { token })
    }

    /// Produce the final answer: normalized body, blank line, reference block
    pub fn normalize(&self, raw: &str, hits: &[Hit], registry: &ReferenceRegistry) -> String {
        let n_refs = registry.ordered_keys().len();
        tracing::debug!(
            "Normalizing citations over {} hits and {} references",
            hits.len(),
            n_refs
        );

        let body = if self.token.is_match(raw) {
            raw.trim().to_string()
        } else {
            self.inject_citations(raw, n_refs)
        };

        let tokens = self.collect_tokens(&body);
        let remap = build_remap(&tokens);
        let body = rewrite(&body, &tokens, &remap);

        format!("{}\n\n{}", body, render_references(registry))
    }

    /// Append `[i]` to each of the first `n_refs` sentences lacking one
    fn inject_citations(&self, raw: &str, n_refs: usize) -> String {
        split_sentences(raw)
            .into_iter()
            .enumerate()
            .map(|(i, sentence)| {
                if i < n_refs && !self.ends_with_token(sentence) {
                    format!("{} [{}]", sentence, i + 1)
                } else {
                    sentence.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn ends_with_token(&self, sentence: &str) -> bool {
        self.token
            .find_iter(sentence)
            .last()
            .is_some_and(|m| m.end() == sentence.len())
    }

    /// First pass: every token with its byte span
    fn collect_tokens(&self, text: &str) -> Vec<CitationToken> {
        self.token
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let digits = caps.get(1)?.as_str().trim_start_matches('0');
                Some(CitationToken {
                    start: whole.start(),
                    end: whole.end(),
                    number: if digits.is_empty() { "0".to_string() } else { digits.to_string() },
                })
            })
            .collect()
    }
}

/// Split on `.`, `!` or `?` followed by whitespace. Abbreviations and
/// decimals like "approx. 5" are split too.
fn split_sentences(text: &str) -> Vec<&str> {
    let text = text.trim();
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((_, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        let Some(&(boundary, next)) = chars.peek() else {
            break;
        };
        if next.is_whitespace() {
            sentences.push(&text[start..boundary]);
            while chars.peek().is_some_and(|&(_, c)| c.is_whitespace()) {
                chars.next();
            }
            start = chars.peek().map_or(text.len(), |&(j, _)| j);
        }
    }

    if start < text.len() {
        sentences.push(&text[start..]);
    }
    sentences
}

/// Cited number -> position in first-occurrence order
fn build_remap(tokens: &[CitationToken]) -> HashMap<&str, usize> {
    let mut remap = HashMap::new();
    for token in tokens {
        let next = remap.len() + 1;
        remap.entry(token.number.as_str()).or_insert(next);
    }
    remap
}

/// Second pass: copy the text, replacing each token through the remap
fn rewrite(text: &str, tokens: &[CitationToken], remap: &HashMap<&str, usize>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;

    for token in tokens {
        out.push_str(&text[cursor..token.start]);
        match remap.get(token.number.as_str()) {
            Some(index) => out.push_str(&format!("[{}]", index)),
            None => out.push_str(&text[token.start..token.end]),
        }
        cursor = token.end;
    }
    out.push_str(&text[cursor..]);
    out
}

fn render_references(registry: &ReferenceRegistry) -> String {
    let mut block = String::from(REFERENCES_HEADING);
    for reference in registry.references() {
        block.push_str(&format!("\n{}. {}", reference.index, reference.label()));
    }
    block
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(book: &str, pages: &str, rank: usize) -> Hit {
        Hit {
            chunk: format!("chunk {}", rank),
            source_book: book.to_string(),
            chapter: "Angina".to_string(),
            section: "–".to_string(),
            pages: pages.to_string(),
            score: 0.8,
            rank,
        }
    }

    fn three_sources() -> (Vec<Hit>, ReferenceRegistry) {
        let hits = vec![hit("A", "1", 1), hit("B", "2", 2), hit("C", "3", 3)];
        let registry = ReferenceRegistry::build(&hits);
        (hits, registry)
    }

    fn body(answer: &str) -> &str {
        answer.split("\n\nReferences:").next().unwrap_or("")
    }

    #[test]
    fn test_injects_missing_citations() {
        let (hits, registry) = three_sources();
        let normalizer = CitationNormalizer::new().unwrap();
        let answer = normalizer.normalize(
            "Pain occurs on exertion. It resolves with rest! Is it angina? Probably.",
            &hits,
            &registry,
        );

        assert_eq!(
            body(&answer),
            "Pain occurs on exertion. [1] It resolves with rest! [2] Is it angina? [3] Probably."
        );
        let refs: Vec<&str> = answer.split("References:\n").nth(1).unwrap().lines().collect();
        assert_eq!(refs.len(), 3);
        assert_eq!(refs[0], "1. A, Bab: Angina, Halaman 1");
    }

    #[test]
    fn test_remaps_in_first_occurrence_order() {
        let (hits, registry) = three_sources();
        let normalizer = CitationNormalizer::new().unwrap();
        let answer = normalizer.normalize(
            "Angina is exertional [5]. ECG may be normal [2]. Rest helps [5].",
            &hits,
            &registry,
        );

        assert_eq!(
            body(&answer),
            "Angina is exertional [1]. ECG may be normal [2]. Rest helps [1]."
        );
    }

    #[test]
    fn test_leading_zeros_share_a_number() {
        let (hits, registry) = three_sources();
        let normalizer = CitationNormalizer::new().unwrap();
        let answer = normalizer.normalize("X [03]. Y [3]. Z [7].", &hits, &registry);
        assert_eq!(body(&answer), "X [1]. Y [1]. Z [2].");
    }

    #[test]
    fn test_huge_numbers_do_not_overflow() {
        let (hits, registry) = three_sources();
        let normalizer = CitationNormalizer::new().unwrap();
        let answer =
            normalizer.normalize("X [99999999999999999999999].", &hits, &registry);
        assert_eq!(body(&answer), "X [1].");
    }

    #[test]
    fn test_sentences_beyond_reference_count_untouched() {
        let hits = vec![hit("A", "1", 1)];
        let registry = ReferenceRegistry::build(&hits);
        let normalizer = CitationNormalizer::new().unwrap();
        let answer = normalizer.normalize("First. Second. Third.", &hits, &registry);

        assert_eq!(body(&answer), "First. [1] Second. Third.");
    }

    #[test]
    fn test_empty_raw_text_yields_reference_block() {
        let (hits, registry) = three_sources();
        let normalizer = CitationNormalizer::new().unwrap();
        let answer = normalizer.normalize("", &hits, &registry);

        assert_eq!(
            answer,
            "\n\nReferences:\n1. A, Bab: Angina, Halaman 1\n2. B, Bab: Angina, Halaman 2\n3. C, Bab: Angina, Halaman 3"
        );
    }

    #[test]
    fn test_split_sentences() {
        assert_eq!(
            split_sentences("  One. Two!\n\nThree? four"),
            vec!["One.", "Two!", "Three?", "four"]
        );
        assert_eq!(split_sentences("Dose 2.5 mg. Done."), vec!["Dose 2.5 mg.", "Done."]);
        assert!(split_sentences("   ").is_empty());
    }

    #[test]
    fn test_build_remap_is_first_seen() {
        let normalizer = CitationNormalizer::new().unwrap();
        let tokens = normalizer.collect_tokens("[4] [2] [4] [9]");
        let remap = build_remap(&tokens);

        assert_eq!(remap["4"], 1);
        assert_eq!(remap["2"], 2);
        assert_eq!(remap["9"], 3);
        assert_eq!(rewrite("[4] [2] [4] [9]", &tokens, &remap), "[1] [2] [1] [3]");
    }
}
