//! Error types for the `ragkit` crate.

use thiserror::Error;

/// Errors that can occur in RAG operations.
#[derive(Debug, Error)]
pub enum RagError {
    /// The file extension is not in the supported set.
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// The file contents could not be decoded as text.
    #[error("Decode error for '{path}': {message}")]
    DecodeError {
        /// The file that failed to decode.
        path: String,
        /// A description of the failure.
        message: String,
    },

    /// Text extraction from a supported file failed.
    #[error("Extraction error for '{path}': {message}")]
    ExtractionError {
        /// The file that failed to parse.
        path: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    EmbeddingError {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred in the vector store backend.
    #[error("Vector store error ({backend}): {message}")]
    VectorStoreError {
        /// The vector store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A language model error.
    #[error("Language model error: {0}")]
    ModelError(String),

    /// A generation operation was invoked without a configured language model.
    #[error("Language model is not configured")]
    MissingModel,

    /// An I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A convenience result type for RAG operations.
pub type Result<T> = std::result::Result<T, RagError>;
