//! Document store: extract → split → embed → index, plus search and lifecycle.
//!
//! [`DocumentStore`] owns the mapping from a document to its chunk set inside
//! the vector index. No other component writes to the index. Ingestion is
//! all-or-nothing per document: nothing is written unless every chunk of the
//! document was embedded.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use tracing::{error, info};
use uuid::Uuid;

use crate::chunking::{RecursiveCharacterSplitter, TextSplitter};
use crate::config::RagConfig;
use crate::document::{Chunk, ChunkMetadata, MetadataFilter, SearchResult, preview_of};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::extract::extract_text;
use crate::vectorstore::VectorStore;

/// Orchestrates document ingestion and retrieval over an embedding provider
/// and a vector index.
///
/// Construct one via [`DocumentStore::builder()`], then call
/// [`init`](DocumentStore::init) once to get-or-create the collection.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use ragkit::{DocumentStore, PersistentVectorStore, RagConfig};
///
/// let config = RagConfig::default();
/// let store = DocumentStore::builder()
///     .config(config.clone())
///     .embedding_provider(Arc::new(embedder))
///     .vector_store(Arc::new(PersistentVectorStore::new(&config.persist_directory)))
///     .build()?;
/// store.init().await?;
///
/// let doc_id = store.add_document("notes/report.pdf", None).await?;
/// let results = store.search_documents("failure modes", None, None).await?;
/// ```
pub struct DocumentStore {
    config: RagConfig,
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorStore>,
    splitter: Arc<dyn TextSplitter>,
}

impl DocumentStore {
    /// Create a new [`DocumentStoreBuilder`].
    pub fn builder() -> DocumentStoreBuilder {
        DocumentStoreBuilder::default()
    }

    /// Return a reference to the store configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Get-or-create the backing collection with the embedding provider's
    /// dimensionality. Idempotent.
    pub async fn init(&self) -> Result<()> {
        let dimensions = self.embedder.dimensions();
        self.index.create_collection(&self.config.collection_name, dimensions).await.map_err(
            |e| {
                error!(collection = %self.config.collection_name, error = %e,
                    "failed to create collection");
                e
            },
        )
    }

    /// Ingest a file: extract its text, split into chunks, embed every chunk
    /// in one batch, and upsert everything in one batched write.
    ///
    /// Returns the generated document id. A document whose text yields zero
    /// chunks still receives an id but writes nothing to the index. Caller
    /// metadata is merged into every chunk's metadata.
    ///
    /// # Errors
    ///
    /// Propagates extraction errors ([`RagError::UnsupportedFormat`],
    /// [`RagError::DecodeError`], [`RagError::ExtractionError`]),
    /// [`RagError::EmbeddingError`] and [`RagError::VectorStoreError`]. On
    /// any failure no chunk of the document is written.
    pub async fn add_document(
        &self,
        path: impl AsRef<Path>,
        extra_metadata: Option<HashMap<String, String>>,
    ) -> Result<String> {
        let path = path.as_ref();
        let document_id = Uuid::new_v4().to_string();
        let source = path.display().to_string();

        let text = extract_text(path)?;
        let pieces = self.splitter.split(&text);
        if pieces.is_empty() {
            info!(%document_id, %source, chunk_count = 0, "added empty document");
            return Ok(document_id);
        }

        let texts: Vec<&str> = pieces.iter().map(String::as_str).collect();
        let embeddings = self.embedder.embed_batch(&texts).await.map_err(|e| {
            error!(%document_id, error = %e, "embedding failed during ingestion");
            e
        })?;
        if embeddings.len() != pieces.len() {
            return Err(RagError::EmbeddingError {
                provider: "batch".to_string(),
                message: format!(
                    "expected {} embeddings, got {}",
                    pieces.len(),
                    embeddings.len()
                ),
            });
        }

        let total_chunks = pieces.len();
        let extra = extra_metadata.unwrap_or_default();
        let chunks: Vec<Chunk> = pieces
            .into_iter()
            .zip(embeddings)
            .enumerate()
            .map(|(chunk_index, (text, embedding))| Chunk {
                id: format!("{document_id}_{chunk_index}"),
                metadata: ChunkMetadata {
                    document_id: document_id.clone(),
                    source: source.clone(),
                    chunk_index,
                    total_chunks,
                    preview: preview_of(&text),
                    extra: extra.clone(),
                },
                text,
                embedding,
            })
            .collect();

        self.index.upsert(&self.config.collection_name, &chunks).await.map_err(|e| {
            error!(%document_id, error = %e, "upsert failed during ingestion");
            e
        })?;

        info!(%document_id, %source, chunk_count = total_chunks, "added document");
        Ok(document_id)
    }

    /// Search for the chunks most similar to a query.
    ///
    /// `n_results` defaults to the configured value when `None`. The filter,
    /// when given, restricts the search to chunks whose metadata matches
    /// every condition. Results come back best-first with
    /// `score = 1 - cosine_distance`; an empty result set is valid. The
    /// configured `similarity_threshold` is advisory and not applied here.
    pub async fn search_documents(
        &self,
        query: &str,
        n_results: Option<usize>,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<SearchResult>> {
        let n_results = n_results.unwrap_or(self.config.default_n_results);

        let query_embedding = self.embedder.embed(query).await.map_err(|e| {
            error!(error = %e, "embedding failed during search");
            e
        })?;

        let hits = self
            .index
            .search(&self.config.collection_name, &query_embedding, n_results, filter)
            .await
            .map_err(|e| {
                error!(collection = %self.config.collection_name, error = %e, "search failed");
                e
            })?;

        let results: Vec<SearchResult> = hits
            .into_iter()
            .map(|hit| SearchResult {
                content: hit.chunk.text,
                metadata: hit.chunk.metadata,
                score: 1.0 - hit.distance,
            })
            .collect();

        info!(result_count = results.len(), "search completed");
        Ok(results)
    }

    /// Return one metadata record per distinct document in the index.
    ///
    /// The representative record is the first-seen chunk's metadata; order
    /// across documents follows the index's enumeration order and is
    /// unspecified.
    pub async fn get_all_documents(&self) -> Result<Vec<ChunkMetadata>> {
        let chunks = self.index.scan(&self.config.collection_name, None).await?;

        let mut seen = HashSet::new();
        let mut documents = Vec::new();
        for chunk in chunks {
            if seen.insert(chunk.metadata.document_id.clone()) {
                documents.push(chunk.metadata);
            }
        }
        Ok(documents)
    }

    /// Delete a document and all of its chunks in one batched delete.
    ///
    /// Deleting an unknown document id is a no-op, not an error.
    pub async fn delete_document(&self, document_id: &str) -> Result<()> {
        let filter = MetadataFilter::document(document_id);
        let chunks = self.index.scan(&self.config.collection_name, Some(&filter)).await?;
        if chunks.is_empty() {
            return Ok(());
        }

        let ids: Vec<&str> = chunks.iter().map(|c| c.id.as_str()).collect();
        self.index.delete(&self.config.collection_name, &ids).await?;
        info!(%document_id, chunk_count = ids.len(), "deleted document");
        Ok(())
    }
}

/// Builder for constructing a [`DocumentStore`].
///
/// `config`, `embedding_provider`, and `vector_store` are required. The
/// splitter defaults to a [`RecursiveCharacterSplitter`] built from the
/// configured chunk size and overlap.
#[derive(Default)]
pub struct DocumentStoreBuilder {
    config: Option<RagConfig>,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    index: Option<Arc<dyn VectorStore>>,
    splitter: Option<Arc<dyn TextSplitter>>,
}

impl DocumentStoreBuilder {
    /// Set the store configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Set the vector store backend.
    pub fn vector_store(mut self, index: Arc<dyn VectorStore>) -> Self {
        self.index = Some(index);
        self
    }

    /// Override the text splitter.
    pub fn splitter(mut self, splitter: Arc<dyn TextSplitter>) -> Self {
        self.splitter = Some(splitter);
        self
    }

    /// Build the [`DocumentStore`], validating that all required fields are
    /// set and that the chunking configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] on a missing field or an invalid
    /// chunk size/overlap pair.
    pub fn build(self) -> Result<DocumentStore> {
        let config =
            self.config.ok_or_else(|| RagError::ConfigError("config is required".to_string()))?;
        let embedder = self
            .embedder
            .ok_or_else(|| RagError::ConfigError("embedding_provider is required".to_string()))?;
        let index = self
            .index
            .ok_or_else(|| RagError::ConfigError("vector_store is required".to_string()))?;
        let splitter = match self.splitter {
            Some(splitter) => splitter,
            None => {
                Arc::new(RecursiveCharacterSplitter::new(config.chunk_size, config.chunk_overlap)?)
            }
        };

        Ok(DocumentStore { config, embedder, index, splitter })
    }
}
