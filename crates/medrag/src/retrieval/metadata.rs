//! Display metadata resolution across differently-shaped indexers
//!
//! Each attribution field has an ordered list of accepted keys. The first key
//! holding a usable value wins; otherwise the field falls back to
//! [`MISSING_FIELD`].

use serde_json::Value;

use crate::types::{Metadata, MISSING_FIELD};

/// Attribution fields extracted for every hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceField {
    Book,
    Chapter,
    Section,
    Pages,
}

impl SourceField {
    /// Accepted keys in priority order. Plural keys come from chunkers that
    /// merge several units and win over the singular per-unit keys.
    pub const fn aliases(self) -> &'static [&'static str] {
        match self {
            SourceField::Book => &["book", "source"],
            SourceField::Chapter => &["chapters", "chapter"],
            SourceField::Section => &["sections", "section"],
            SourceField::Pages => &["pages", "page"],
        }
    }
}

/// Resolve one field from candidate metadata
pub fn resolve(metadata: &Metadata, field: SourceField) -> String {
    field
        .aliases()
        .iter()
        .filter_map(|key| metadata.get(*key))
        .find_map(render_value)
        .unwrap_or_else(|| MISSING_FIELD.to_string())
}

/// Nulls, blanks and explicit placeholders count as absent
fn render_value(value: &Value) -> Option<String> {
    let rendered = match value {
        Value::Null | Value::Object(_) => return None,
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(render_value)
            .collect::<Vec<_>>()
            .join(", "),
    };

    if rendered.is_empty() || rendered == MISSING_FIELD {
        None
    } else {
        Some(rendered)
    }
}
