//! # ragkit
//!
//! Document ingestion and retrieval core for retrieval-augmented generation
//! (RAG) agents.
//!
//! The crate splits documents into overlapping chunks, embeds them, persists
//! them in a vector index keyed by document identity, and answers similarity
//! searches with metadata filtering and normalized scores. A thin
//! [`RagAgent`] turns search results into a context block and fills a prompt
//! template for a language model.
//!
//! ## Overview
//!
//! - [`extract`] — file → raw text, dispatched on extension (PDF, DOCX, TXT)
//! - [`chunking`] — recursive separator-aware splitting with overlap
//! - [`embedding`] — the [`EmbeddingProvider`] capability seam
//! - [`vectorstore`] — the [`VectorStore`] trait, with
//!   [`InMemoryVectorStore`] and [`PersistentVectorStore`] backends
//! - [`store`] — [`DocumentStore`]: add / search / list / delete documents
//! - [`agent`] — [`RagAgent`] over a [`LanguageModel`]
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ragkit::{DocumentStore, PersistentVectorStore, RagConfig};
//!
//! let config = RagConfig::default();
//! let index = Arc::new(PersistentVectorStore::new(&config.persist_directory));
//! let store = DocumentStore::builder()
//!     .config(config)
//!     .embedding_provider(embedder)
//!     .vector_store(index)
//!     .build()?;
//! store.init().await?;
//!
//! let doc_id = store.add_document("papers/alloys.pdf", None).await?;
//! for result in store.search_documents("creep resistance", None, None).await? {
//!     println!("{:.3}  {}", result.score, result.metadata.source);
//! }
//! ```

pub mod agent;
pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod extract;
#[cfg(feature = "gemini")]
pub mod gemini;
pub mod inmemory;
pub mod persist;
pub mod store;
pub mod vectorstore;

pub use agent::{LanguageModel, NO_RESULTS_MESSAGE, RagAgent};
pub use chunking::{RecursiveCharacterSplitter, TextSplitter};
pub use config::{RagConfig, RagConfigBuilder};
pub use document::{Chunk, ChunkMetadata, MetadataFilter, SearchResult};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use extract::{FileKind, extract_text};
#[cfg(feature = "gemini")]
pub use gemini::GeminiEmbeddingProvider;
pub use inmemory::InMemoryVectorStore;
pub use persist::PersistentVectorStore;
pub use store::{DocumentStore, DocumentStoreBuilder};
pub use vectorstore::{ScoredChunk, VectorStore};
