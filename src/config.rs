//! Configuration for the document store and retrieval agent.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

/// Configuration parameters for document ingestion and retrieval.
///
/// The supported file extensions are not configurable; they are fixed by the
/// [`FileKind`](crate::extract::FileKind) dispatch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RagConfig {
    /// Directory where the persistent vector index stores its collections.
    pub persist_directory: PathBuf,
    /// Name of the collection holding all chunks across all documents.
    pub collection_name: String,
    /// Maximum chunk size in characters.
    pub chunk_size: usize,
    /// Number of overlapping characters between consecutive chunks.
    pub chunk_overlap: usize,
    /// Number of results a search returns when the caller does not specify one.
    pub default_n_results: usize,
    /// Advisory similarity threshold. The store never filters by it; callers
    /// that want threshold filtering must apply it to returned scores.
    pub similarity_threshold: f32,
    /// Identifier of the embedding model, passed through to remote providers.
    pub embedding_model: String,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            persist_directory: PathBuf::from("./ragkit_db"),
            collection_name: "documents".to_string(),
            chunk_size: 1000,
            chunk_overlap: 200,
            default_n_results: 5,
            similarity_threshold: 0.7,
            embedding_model: "models/embedding-001".to_string(),
        }
    }
}

impl RagConfig {
    /// Create a new builder for constructing a [`RagConfig`].
    pub fn builder() -> RagConfigBuilder {
        RagConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`RagConfig`].
#[derive(Debug, Clone, Default)]
pub struct RagConfigBuilder {
    config: RagConfig,
}

impl RagConfigBuilder {
    /// Set the directory used by the persistent vector index.
    pub fn persist_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.persist_directory = dir.into();
        self
    }

    /// Set the collection name.
    pub fn collection_name(mut self, name: impl Into<String>) -> Self {
        self.config.collection_name = name.into();
        self
    }

    /// Set the maximum chunk size in characters.
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    /// Set the overlap between consecutive chunks in characters.
    pub fn chunk_overlap(mut self, overlap: usize) -> Self {
        self.config.chunk_overlap = overlap;
        self
    }

    /// Set the default number of search results.
    pub fn default_n_results(mut self, n: usize) -> Self {
        self.config.default_n_results = n;
        self
    }

    /// Set the advisory similarity threshold.
    pub fn similarity_threshold(mut self, threshold: f32) -> Self {
        self.config.similarity_threshold = threshold;
        self
    }

    /// Set the embedding model identifier.
    pub fn embedding_model(mut self, model: impl Into<String>) -> Self {
        self.config.embedding_model = model.into();
        self
    }

    /// Build the [`RagConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if:
    /// - `chunk_overlap >= chunk_size`
    /// - `default_n_results == 0`
    pub fn build(self) -> Result<RagConfig> {
        if self.config.chunk_overlap >= self.config.chunk_size {
            return Err(RagError::ConfigError(format!(
                "chunk_overlap ({}) must be less than chunk_size ({})",
                self.config.chunk_overlap, self.config.chunk_size
            )));
        }
        if self.config.default_n_results == 0 {
            return Err(RagError::ConfigError(
                "default_n_results must be greater than zero".to_string(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_passes_validation() {
        let config = RagConfig::builder().build().unwrap();
        assert_eq!(config, RagConfig::default());
    }

    #[test]
    fn overlap_must_be_less_than_chunk_size() {
        let err = RagConfig::builder().chunk_size(100).chunk_overlap(100).build().unwrap_err();
        assert!(matches!(err, RagError::ConfigError(_)));
    }

    #[test]
    fn n_results_must_be_positive() {
        let err = RagConfig::builder().default_n_results(0).build().unwrap_err();
        assert!(matches!(err, RagError::ConfigError(_)));
    }
}
