//! In-memory vector store using cosine distance.
//!
//! [`InMemoryVectorStore`] keeps collections as nested `HashMap`s behind a
//! `tokio::sync::RwLock`. Nothing is persisted; it is meant for tests and
//! small transient corpora. See [`PersistentVectorStore`](crate::persist) for
//! the file-backed variant.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::document::{Chunk, MetadataFilter};
use crate::error::{RagError, Result};
use crate::vectorstore::{ScoredChunk, VectorStore};

/// An in-memory vector store.
///
/// Collections map collection name → chunk id → chunk. All operations are
/// async-safe via `tokio::sync::RwLock`.
#[derive(Debug, Default)]
pub struct InMemoryVectorStore {
    collections: RwLock<HashMap<String, HashMap<String, Chunk>>>,
}

impl InMemoryVectorStore {
    /// Create a new empty in-memory vector store.
    pub fn new() -> Self {
        Self::default()
    }

    fn missing(collection: &str) -> RagError {
        RagError::VectorStoreError {
            backend: "in-memory".to_string(),
            message: format!("collection '{collection}' does not exist"),
        }
    }
}

/// Cosine distance between two vectors: `1 - cos(a, b)`, domain [0, 2].
///
/// A zero-magnitude vector has no direction; its distance to anything is 1
/// (the same as orthogonality).
pub(crate) fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }
    1.0 - dot / (norm_a * norm_b)
}

/// Rank chunks by ascending cosine distance to the query embedding, breaking
/// ties on chunk id, and keep the `top_k` nearest.
pub(crate) fn rank_chunks<'a, I>(chunks: I, embedding: &[f32], top_k: usize) -> Vec<ScoredChunk>
where
    I: Iterator<Item = &'a Chunk>,
{
    let mut scored: Vec<ScoredChunk> = chunks
        .map(|chunk| ScoredChunk {
            distance: cosine_distance(&chunk.embedding, embedding),
            chunk: chunk.clone(),
        })
        .collect();

    scored.sort_by(|a, b| {
        a.distance
            .partial_cmp(&b.distance)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.chunk.id.cmp(&b.chunk.id))
    });
    scored.truncate(top_k);
    scored
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn create_collection(&self, name: &str, _dimensions: usize) -> Result<()> {
        let mut collections = self.collections.write().await;
        collections.entry(name.to_string()).or_default();
        Ok(())
    }

    async fn delete_collection(&self, name: &str) -> Result<()> {
        let mut collections = self.collections.write().await;
        collections.remove(name);
        Ok(())
    }

    async fn upsert(&self, collection: &str, chunks: &[Chunk]) -> Result<()> {
        let mut collections = self.collections.write().await;
        let store = collections.get_mut(collection).ok_or_else(|| Self::missing(collection))?;
        for chunk in chunks {
            store.insert(chunk.id.clone(), chunk.clone());
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, ids: &[&str]) -> Result<()> {
        let mut collections = self.collections.write().await;
        let store = collections.get_mut(collection).ok_or_else(|| Self::missing(collection))?;
        for id in ids {
            store.remove(*id);
        }
        Ok(())
    }

    async fn scan(&self, collection: &str, filter: Option<&MetadataFilter>) -> Result<Vec<Chunk>> {
        let collections = self.collections.read().await;
        let store = collections.get(collection).ok_or_else(|| Self::missing(collection))?;
        Ok(store
            .values()
            .filter(|chunk| filter.is_none_or(|f| f.matches(&chunk.metadata)))
            .cloned()
            .collect())
    }

    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        top_k: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<ScoredChunk>> {
        let collections = self.collections.read().await;
        let store = collections.get(collection).ok_or_else(|| Self::missing(collection))?;

        let candidates =
            store.values().filter(|chunk| filter.is_none_or(|f| f.matches(&chunk.metadata)));
        Ok(rank_chunks(candidates, embedding, top_k))
    }
}
