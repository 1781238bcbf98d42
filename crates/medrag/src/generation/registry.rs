//! Reference registry: deduplicated, order-preserving citation numbering
//!
//! Built once per query from the ranked hits. The prompt assembler and the
//! citation normalizer must share the same instance so the numbers the model
//! sees in context match the numbers in the final reference list.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::{Hit, SourceKey};

/// A distinct source and its 1-based citation index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub index: usize,
    #[serde(flatten)]
    pub key: SourceKey,
}

impl Reference {
    /// Rendered entry for the reference list, without the index
    pub fn label(&self) -> String {
        self.key.reference_label()
    }
}

/// Mapping from source key to citation index, assigned in first-seen hit order
#[derive(Debug, Clone, Default)]
pub struct ReferenceRegistry {
    keys: Vec<SourceKey>,
    indices: HashMap<SourceKey, usize>,
}

impl ReferenceRegistry {
    /// Build from hits in rank order
    pub fn build(hits: &[Hit]) -> Self {
        let mut registry = Self::default();
        for hit in hits {
            registry.register(hit.key());
        }
        registry
    }

    /// Index for `key`, assigning the next one if unseen
    fn register(&mut self, key: SourceKey) -> usize {
        if let Some(&index) = self.indices.get(&key) {
            return index;
        }
        self.keys.push(key.clone());
        let index = self.keys.len();
        self.indices.insert(key, index);
        index
    }

    /// Citation index of a source, if registered
    pub fn index_of(&self, key: &SourceKey) -> Option<usize> {
        self.indices.get(key).copied()
    }

    /// Distinct sources in index order
    pub fn ordered_keys(&self) -> &[SourceKey] {
        &self.keys
    }

    /// Distinct sources paired with their indices
    pub fn references(&self) -> Vec<Reference> {
        self.keys
            .iter()
            .enumerate()
            .map(|(i, key)| Reference {
                index: i + 1,
                key: key.clone(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
