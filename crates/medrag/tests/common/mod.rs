//! In-process fakes for the pipeline's collaborators

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use medrag::providers::{EmbeddingProvider, LlmProvider, VectorStoreProvider};
use medrag::{Candidate, Error, PipelineSettings, RagPipeline, Result};

/// Returns the same query vector for every text
pub struct FakeEmbedder {
    pub vector: Vec<f32>,
    pub calls: AtomicUsize,
}

impl FakeEmbedder {
    pub fn new(vector: Vec<f32>) -> Self {
        Self {
            vector,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for FakeEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.vector.clone())
    }

    fn dimensions(&self) -> usize {
        self.vector.len()
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "fake-embedder"
    }
}

/// Returns canned candidates in the given order
pub struct FakeStore {
    pub candidates: Vec<Candidate>,
    pub requested: Mutex<Vec<usize>>,
}

impl FakeStore {
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self {
            candidates,
            requested: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl VectorStoreProvider for FakeStore {
    async fn coarse_search(&self, _query: &[f32], n: usize) -> Result<Vec<Candidate>> {
        self.requested.lock().push(n);
        Ok(self.candidates.iter().take(n).cloned().collect())
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.candidates.len())
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "fake-store"
    }
}

pub enum LlmBehavior {
    Reply(String),
    Fail(String),
    Hang(Duration),
}

/// Scripted language model that records every prompt it sees
pub struct FakeLlm {
    pub behavior: LlmBehavior,
    pub prompts: Mutex<Vec<String>>,
}

impl FakeLlm {
    pub fn replying(text: &str) -> Self {
        Self::with(LlmBehavior::Reply(text.to_string()))
    }

    pub fn with(behavior: LlmBehavior) -> Self {
        Self {
            behavior,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().len()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().last().cloned()
    }
}

#[async_trait]
impl LlmProvider for FakeLlm {
    async fn invoke(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().push(prompt.to_string());
        match &self.behavior {
            LlmBehavior::Reply(text) => Ok(text.clone()),
            LlmBehavior::Fail(diagnostic) => Err(Error::generation(diagnostic.clone())),
            LlmBehavior::Hang(duration) => {
                tokio::time::sleep(*duration).await;
                Ok(String::new())
            }
        }
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "fake-llm"
    }

    fn model(&self) -> &str {
        "fake-model"
    }
}

pub struct Harness {
    pub embedder: Arc<FakeEmbedder>,
    pub store: Arc<FakeStore>,
    pub llm: Arc<FakeLlm>,
    pub pipeline: RagPipeline,
}

pub fn harness(candidates: Vec<Candidate>, llm: FakeLlm, settings: PipelineSettings) -> Harness {
    let embedder = Arc::new(FakeEmbedder::new(vec![1.0, 0.0, 0.0]));
    let store = Arc::new(FakeStore::new(candidates));
    let llm = Arc::new(llm);

    let pipeline = RagPipeline::new(
        Arc::clone(&embedder) as Arc<dyn EmbeddingProvider>,
        Arc::clone(&store) as Arc<dyn VectorStoreProvider>,
        Arc::clone(&llm) as Arc<dyn LlmProvider>,
        settings,
    )
    .unwrap();

    Harness {
        embedder,
        store,
        llm,
        pipeline,
    }
}

/// Eight candidates alternating between two textbook locations, in
/// descending similarity to the fake query vector
pub fn chest_pain_candidates() -> Vec<Candidate> {
    (0..8)
        .map(|i| {
            let text = format!("Excerpt {} on exertional chest pain.", i);
            let candidate = Candidate::new(vec![1.0, i as f32 * 0.1, 0.0], text);
            if i % 2 == 0 {
                candidate
                    .with_meta("book", "Harrison's Principles of Internal Medicine")
                    .with_meta("chapters", "Chest Discomfort")
                    .with_meta("page", 102)
            } else {
                candidate
                    .with_meta("source", "braunwald.pdf")
                    .with_meta("chapter", "Stable Ischemic Heart Disease")
                    .with_meta("section", "Angina")
                    .with_meta("pages", "1210")
            }
        })
        .collect()
}

/// The bracket-indexed context lines of a prompt
pub fn context_lines(prompt: &str) -> Vec<String> {
    prompt
        .split("EXCERPTS:\n")
        .nth(1)
        .and_then(|rest| rest.split("\n\n").next())
        .map(|block| block.lines().map(str::to_string).collect())
        .unwrap_or_default()
}
