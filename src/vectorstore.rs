//! Vector store trait: persistence and nearest-neighbor search over chunks.

use async_trait::async_trait;

use crate::document::{Chunk, MetadataFilter};
use crate::error::Result;

/// A chunk returned from a nearest-neighbor search, with its raw distance.
///
/// The distance is the cosine distance (`1 - cosine_similarity`), so it lies
/// in [0, 2] with 0 meaning identical direction. The metric is fixed by this
/// contract; backends must not substitute another one, since the document
/// store derives similarity scores as `1 - distance`.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    /// The stored chunk.
    pub chunk: Chunk,
    /// Cosine distance between the stored embedding and the query embedding.
    pub distance: f32,
}

/// A storage backend for embedded chunks with similarity search.
///
/// Backends manage named collections. All chunks of all documents live in a
/// single collection; document grouping is purely a property of chunk
/// metadata, owned by the document store.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Create a named collection, or open it if it already exists.
    async fn create_collection(&self, name: &str, dimensions: usize) -> Result<()>;

    /// Delete a named collection and all its data.
    async fn delete_collection(&self, name: &str) -> Result<()>;

    /// Upsert chunks into a collection in one batch. Chunks must have
    /// embeddings set.
    async fn upsert(&self, collection: &str, chunks: &[Chunk]) -> Result<()>;

    /// Delete chunks by id from a collection in one batch. Unknown ids are
    /// ignored.
    async fn delete(&self, collection: &str, ids: &[&str]) -> Result<()>;

    /// Enumerate stored chunks, optionally restricted by a metadata filter.
    /// Enumeration order is backend-defined.
    async fn scan(&self, collection: &str, filter: Option<&MetadataFilter>) -> Result<Vec<Chunk>>;

    /// Return the `top_k` nearest chunks to the given embedding, restricted
    /// to chunks matching the filter when one is given.
    ///
    /// Results are ordered by ascending distance; ties break on chunk id so
    /// repeated searches over unchanged data return identical sequences.
    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        top_k: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<ScoredChunk>>;
}
