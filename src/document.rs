//! Data types for chunks, chunk metadata, search results, and metadata filters.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Maximum number of characters kept in a chunk's metadata preview.
const PREVIEW_LEN: usize = 100;

/// Metadata stored alongside every chunk.
///
/// The reserved fields (`document_id`, `source`, `chunk_index`,
/// `total_chunks`, `preview`) are typed; caller-supplied fields live in
/// [`extra`](ChunkMetadata::extra) and cannot collide with the reserved ones.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChunkMetadata {
    /// Identifier of the parent document.
    pub document_id: String,
    /// Origin path or URI of the parent document.
    pub source: String,
    /// Zero-based position of this chunk within its document.
    pub chunk_index: usize,
    /// Number of chunks the document produced at ingestion time.
    pub total_chunks: usize,
    /// Truncated preview of the chunk text. Display convenience only; it has
    /// no role in search or identity.
    pub preview: String,
    /// Caller-supplied metadata fields.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub extra: HashMap<String, String>,
}

impl ChunkMetadata {
    /// Look up a field by name, reserved fields first, then `extra`.
    ///
    /// Numeric fields are rendered as decimal strings.
    pub fn field(&self, name: &str) -> Option<String> {
        match name {
            "document_id" => Some(self.document_id.clone()),
            "source" => Some(self.source.clone()),
            "chunk_index" => Some(self.chunk_index.to_string()),
            "total_chunks" => Some(self.total_chunks.to_string()),
            "preview" => Some(self.preview.clone()),
            _ => self.extra.get(name).cloned(),
        }
    }
}

/// Build the truncated preview recorded in chunk metadata.
///
/// Keeps the first 100 characters followed by `...`, or the whole text when
/// it is short enough.
pub(crate) fn preview_of(text: &str) -> String {
    let mut chars = text.char_indices();
    match chars.nth(PREVIEW_LEN) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// A segment of a document's extracted text with its vector embedding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// Unique identifier, derived as `{document_id}_{chunk_index}`.
    pub id: String,
    /// The text content of the chunk.
    pub text: String,
    /// The vector embedding for this chunk's text. Computed once at ingestion.
    pub embedding: Vec<f32>,
    /// Metadata inherited from the parent document plus chunk-specific fields.
    pub metadata: ChunkMetadata,
}

/// A retrieved chunk paired with a relevance score. Not persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The retrieved chunk text.
    pub content: String,
    /// The retrieved chunk's metadata.
    pub metadata: ChunkMetadata,
    /// Similarity score, `1 - cosine_distance`. Higher is more relevant.
    /// Because cosine distance spans [0, 2], scores may be negative; callers
    /// must not assume they are non-negative.
    pub score: f32,
}

/// A conjunctive exact-match predicate over chunk metadata fields.
///
/// An empty filter matches everything. Field names may refer to the reserved
/// metadata fields or to caller-supplied `extra` keys.
///
/// # Example
///
/// ```rust,ignore
/// use ragkit::MetadataFilter;
///
/// let filter = MetadataFilter::new().eq("category", "pricing").eq("lang", "en");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataFilter {
    conditions: Vec<(String, String)>,
}

impl MetadataFilter {
    /// Create an empty filter that matches all chunks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a filter matching all chunks of the given document.
    pub fn document(document_id: impl Into<String>) -> Self {
        Self::new().eq("document_id", document_id)
    }

    /// Add an equality condition on a metadata field.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.conditions.push((field.into(), value.into()));
        self
    }

    /// Whether this filter has no conditions.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Whether the given metadata satisfies every condition.
    ///
    /// A condition on a field the metadata does not carry never matches.
    pub fn matches(&self, metadata: &ChunkMetadata) -> bool {
        self.conditions
            .iter()
            .all(|(field, value)| metadata.field(field).is_some_and(|v| v == *value))
    }
}
