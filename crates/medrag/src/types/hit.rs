//! Ranked retrieval results and their source attribution

use serde::{Deserialize, Serialize};

/// Placeholder for a chapter/section/page the upstream metadata did not carry
pub const MISSING_FIELD: &str = "–";

fn is_present(field: &str) -> bool {
    field != MISSING_FIELD
}

/// Identity of a cited source: structural equality over all four fields
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceKey {
    pub book: String,
    pub chapter: String,
    pub section: String,
    pub pages: String,
}

impl SourceKey {
    /// Source line used inside the prompt context
    pub fn prompt_label(&self) -> String {
        let mut label = self.book.clone();
        if is_present(&self.chapter) {
            label.push_str(&format!(", Chapter: {}", self.chapter));
        }
        if is_present(&self.section) {
            label.push_str(&format!(", Section: {}", self.section));
        }
        label.push_str(&format!(", Page {}", self.pages));
        label
    }

    /// Source line used in the reference list shown to the reader
    pub fn reference_label(&self) -> String {
        let mut label = self.book.clone();
        if is_present(&self.chapter) {
            label.push_str(&format!(", Bab: {}", self.chapter));
        }
        if is_present(&self.section) {
            label.push_str(&format!(", Subbab: {}", self.section));
        }
        label.push_str(&format!(", Halaman {}", self.pages));
        label
    }
}

/// One re-ranked result. `rank` is 1-based and follows final relevance order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    pub chunk: String,
    pub source_book: String,
    pub chapter: String,
    pub section: String,
    pub pages: String,
    pub score: f32,
    pub rank: usize,
}

impl Hit {
    /// Deduplication key for the reference registry
    pub fn key(&self) -> SourceKey {
        SourceKey {
            book: self.source_book.clone(),
            chapter: self.chapter.clone(),
            section: self.section.clone(),
            pages: self.pages.clone(),
        }
    }
}

/// Render hits for the result browser, one block per hit
pub fn format_hits_markdown(hits: &[Hit]) -> String {
    hits.iter()
        .map(|hit| {
            format!(
                "### Hasil {}\n**Sumber:** {}\n\n{}",
                hit.rank,
                hit.key().reference_label(),
                hit.chunk
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n---\n\n")
}
