//! Embedding provider trait for turning text into vectors.

use async_trait::async_trait;

use crate::error::Result;

/// A capability that produces fixed-dimension embedding vectors from text.
///
/// The same provider must be used for ingestion and querying so that vector
/// dimensionality matches. The default
/// [`embed_batch`](EmbeddingProvider::embed_batch) calls
/// [`embed`](EmbeddingProvider::embed) sequentially; providers with native
/// batch endpoints should override it so a document's chunks go out in a
/// single round-trip.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text, such as a search query.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed a batch of texts, such as all chunks of one document.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }

    /// The dimensionality of vectors this provider produces.
    fn dimensions(&self) -> usize;
}
