//! File-backed vector store.
//!
//! [`PersistentVectorStore`] keeps the same in-memory shape as
//! [`InMemoryVectorStore`](crate::inmemory::InMemoryVectorStore) but loads
//! each collection from `{root}/{collection}.json` on creation and rewrites
//! the file after every mutation. Collection creation is get-or-create: an
//! existing file is loaded, a missing one is initialized empty.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::document::{Chunk, MetadataFilter};
use crate::error::{RagError, Result};
use crate::inmemory::rank_chunks;
use crate::vectorstore::{ScoredChunk, VectorStore};

/// A vector store persisted as one JSON file per collection.
///
/// Writes are serialized through a `tokio::sync::RwLock`; the store itself
/// adds no cross-process locking.
#[derive(Debug)]
pub struct PersistentVectorStore {
    root: PathBuf,
    collections: RwLock<HashMap<String, HashMap<String, Chunk>>>,
}

impl PersistentVectorStore {
    /// Create a store rooted at the given directory. The directory is
    /// created lazily on the first collection creation.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), collections: RwLock::new(HashMap::new()) }
    }

    /// The directory this store persists under.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collection_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.json"))
    }

    fn missing(collection: &str) -> RagError {
        RagError::VectorStoreError {
            backend: "persistent".to_string(),
            message: format!("collection '{collection}' does not exist"),
        }
    }

    fn corrupt(path: &Path, e: serde_json::Error) -> RagError {
        RagError::VectorStoreError {
            backend: "persistent".to_string(),
            message: format!("failed to decode '{}': {e}", path.display()),
        }
    }

    fn load(path: &Path) -> Result<HashMap<String, Chunk>> {
        let bytes = std::fs::read(path)?;
        let chunks: Vec<Chunk> =
            serde_json::from_slice(&bytes).map_err(|e| Self::corrupt(path, e))?;
        Ok(chunks.into_iter().map(|c| (c.id.clone(), c)).collect())
    }

    /// Rewrite a collection file. Chunks are written sorted by id so files
    /// are stable across runs.
    fn flush(&self, name: &str, store: &HashMap<String, Chunk>) -> Result<()> {
        std::fs::create_dir_all(&self.root)?;
        let mut chunks: Vec<&Chunk> = store.values().collect();
        chunks.sort_by(|a, b| a.id.cmp(&b.id));
        let bytes = serde_json::to_vec(&chunks).map_err(|e| RagError::VectorStoreError {
            backend: "persistent".to_string(),
            message: format!("failed to encode collection '{name}': {e}"),
        })?;
        std::fs::write(self.collection_path(name), bytes)?;
        Ok(())
    }
}

#[async_trait]
impl VectorStore for PersistentVectorStore {
    async fn create_collection(&self, name: &str, _dimensions: usize) -> Result<()> {
        let mut collections = self.collections.write().await;
        if collections.contains_key(name) {
            return Ok(());
        }

        let path = self.collection_path(name);
        let store = if path.exists() {
            let store = Self::load(&path)?;
            debug!(collection = name, chunk_count = store.len(), "loaded collection");
            store
        } else {
            let store = HashMap::new();
            self.flush(name, &store)?;
            debug!(collection = name, "created collection");
            store
        };
        collections.insert(name.to_string(), store);
        Ok(())
    }

    async fn delete_collection(&self, name: &str) -> Result<()> {
        let mut collections = self.collections.write().await;
        collections.remove(name);
        match std::fs::remove_file(self.collection_path(name)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn upsert(&self, collection: &str, chunks: &[Chunk]) -> Result<()> {
        let mut collections = self.collections.write().await;
        let store = collections.get_mut(collection).ok_or_else(|| Self::missing(collection))?;
        for chunk in chunks {
            store.insert(chunk.id.clone(), chunk.clone());
        }
        self.flush(collection, store)
    }

    async fn delete(&self, collection: &str, ids: &[&str]) -> Result<()> {
        let mut collections = self.collections.write().await;
        let store = collections.get_mut(collection).ok_or_else(|| Self::missing(collection))?;
        for id in ids {
            store.remove(*id);
        }
        self.flush(collection, store)
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
