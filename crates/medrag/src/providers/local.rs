//! In-memory vector store loaded from a JSONL index
//!
//! Each line is one [`StoredRecord`]. Search is an exact scan, which is fine
//! for the few thousand chunks a textbook collection yields.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::retrieval::cosine_similarity;
use crate::types::{Candidate, Metadata};

use super::vector_store::VectorStoreProvider;

fn new_record_id() -> String {
    Uuid::new_v4().to_string()
}

/// One indexed chunk as written by the indexer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredRecord {
    #[serde(default = "new_record_id")]
    pub id: String,
    #[serde(alias = "embedding")]
    pub vector: Vec<f32>,
    #[serde(alias = "document")]
    pub text: String,
    #[serde(default)]
    pub metadata: Metadata,
}

impl From<StoredRecord> for Candidate {
    fn from(record: StoredRecord) -> Self {
        Candidate {
            vector: record.vector,
            text: record.text,
            metadata: record.metadata,
        }
    }
}

/// Local exact-scan vector store
#[derive(Default)]
pub struct LocalVectorStore {
    records: Arc<RwLock<Vec<StoredRecord>>>,
}

impl LocalVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every record from a JSONL file. Blank lines are skipped.
    pub fn load_jsonl(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|e| {
            Error::vector_db(format!("Failed to open index {}: {}", path.display(), e))
        })?;

        let mut records = Vec::new();
        for (line_no, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: StoredRecord = serde_json::from_str(&line).map_err(|e| {
                Error::vector_db(format!("{}:{}: {}", path.display(), line_no + 1, e))
            })?;
            records.push(record);
        }

        tracing::info!("Loaded {} records from {}", records.len(), path.display());
        Ok(Self {
            records: Arc::new(RwLock::new(records)),
        })
    }

    /// Add a record
    pub fn insert(&self, record: StoredRecord) {
        self.records.write().push(record);
    }

    fn search_sync(records: &[StoredRecord], query: &[f32], n: usize) -> Result<Vec<Candidate>> {
        let mut scored = records
            .iter()
            .map(|record| cosine_similarity(query, &record.vector).map(|score| (score, record)))
            .collect::<Result<Vec<_>>>()?;

        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        scored.truncate(n);

        Ok(scored
            .into_iter()
            .map(|(_, record)| Candidate::from(record.clone()))
            .collect())
    }
}

#[async_trait]
impl VectorStoreProvider for LocalVectorStore {
    async fn coarse_search(&self, query_embedding: &[f32], n: usize) -> Result<Vec<Candidate>> {
        if n == 0 {
            return Ok(Vec::new());
        }

        let records = Arc::clone(&self.records);
        let query = query_embedding.to_vec();

        tokio::task::spawn_blocking(move || Self::search_sync(&records.read(), &query, n))
            .await
            .map_err(|e| Error::Internal(format!("Task join error: {}", e)))?
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.records.read().len())
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "local-jsonl"
    }
}
