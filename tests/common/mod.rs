//! Shared test support: deterministic embedders and a scripted model.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use ragkit::{Chunk, ChunkMetadata, EmbeddingProvider, LanguageModel, RagError, Result};

/// A deterministic bag-of-words embedder for tests.
///
/// Each distinct word gets its own dimension in first-seen order, so texts
/// sharing no words are exactly orthogonal and texts sharing words score
/// strictly higher. Counts every `embed` call so tests can assert that an
/// operation made no embedding round-trip.
pub struct VocabEmbedder {
    dims: usize,
    vocab: Mutex<HashMap<String, usize>>,
    calls: AtomicUsize,
}

impl VocabEmbedder {
    pub fn new(dims: usize) -> Self {
        Self { dims, vocab: Mutex::new(HashMap::new()), calls: AtomicUsize::new(0) }
    }

    /// Number of `embed` calls made so far (batch calls count per text).
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for VocabEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let mut vector = vec![0.0f32; self.dims];
        let mut vocab = self.vocab.lock().unwrap();
        for raw in text.split_whitespace() {
            let word: String =
                raw.chars().filter(|c| c.is_alphanumeric()).collect::<String>().to_lowercase();
            if word.is_empty() {
                continue;
            }
            let next = vocab.len();
            let idx = *vocab.entry(word).or_insert(next) % self.dims;
            vector[idx] += 1.0;
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut vector {
                *x /= norm;
            }
        }
        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        self.dims
    }
}

/// An embedder that always fails, for atomicity tests.
pub struct FailingEmbedder;

#[async_trait]
impl EmbeddingProvider for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(RagError::EmbeddingError {
            provider: "failing".to_string(),
            message: "service unavailable".to_string(),
        })
    }

    fn dimensions(&self) -> usize {
        8
    }
}

/// A language model that echoes its prompt, so tests can inspect template
/// assembly.
pub struct EchoModel;

#[async_trait]
impl LanguageModel for EchoModel {
    async fn generate(&self, prompt: &str) -> Result<String> {
        Ok(prompt.to_string())
    }
}

/// Build a chunk with explicit id, parent document, text, and embedding.
pub fn make_chunk(id: &str, document_id: &str, text: &str, embedding: Vec<f32>) -> Chunk {
    Chunk {
        id: id.to_string(),
        text: text.to_string(),
        embedding,
        metadata: ChunkMetadata {
            document_id: document_id.to_string(),
            source: format!("/srv/{document_id}.txt"),
            chunk_index: 0,
            total_chunks: 1,
            preview: text.chars().take(100).collect(),
            extra: HashMap::new(),
        },
    }
}

/// A 2500-byte plain text: one 25-byte distinctive sentence followed by 99
/// copies of a 25-byte filler sentence. At chunk size 1000 / overlap 200 it
/// splits into exactly three chunks.
pub fn fixture_text_2500() -> String {
    let distinctive = "zonal quark vexed jumbo. ";
    let filler = "rock sand mud silt clay. ";
    let text = format!("{distinctive}{}", filler.repeat(99));
    assert_eq!(text.len(), 2500);
    text
}

/// The query matching only the distinctive first sentence of
/// [`fixture_text_2500`].
pub const FIXTURE_QUERY: &str = "zonal quark vexed jumbo";
