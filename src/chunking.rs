//! Text splitting into bounded, overlapping chunks.
//!
//! [`RecursiveCharacterSplitter`] walks a prioritized separator ladder
//! (paragraph break, line break, sentence boundary, word boundary, raw
//! characters) and cuts at the highest-priority boundary that keeps each
//! chunk within the configured size. Consecutive chunks overlap by up to the
//! configured number of characters so context spanning a cut is not lost.

use crate::error::{RagError, Result};

/// Separator ladder, highest priority first. Raw character splitting is the
/// implicit last resort.
const SEPARATORS: [&str; 4] = ["\n\n", "\n", ". ", " "];

/// A strategy for splitting raw text into chunk texts.
///
/// Implementations must be deterministic: the same input always produces the
/// same sequence. Chunk identity and metadata are attached later by the
/// document store.
pub trait TextSplitter: Send + Sync {
    /// Split text into an ordered sequence of chunk texts.
    ///
    /// Returns an empty `Vec` only for empty input.
    fn split(&self, text: &str) -> Vec<String>;
}

/// Splits text recursively along the separator ladder with overlap.
///
/// Each produced chunk is a contiguous substring of the input and is at most
/// `chunk_size` bytes long. Where two chunks meet, the second one starts with
/// up to `chunk_overlap` trailing bytes of the first.
///
/// # Example
///
/// ```rust,ignore
/// use ragkit::{RecursiveCharacterSplitter, TextSplitter};
///
/// let splitter = RecursiveCharacterSplitter::new(1000, 200)?;
/// let chunks = splitter.split(&text);
/// ```
#[derive(Debug, Clone)]
pub struct RecursiveCharacterSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl RecursiveCharacterSplitter {
    /// Create a new splitter.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if `chunk_size` is zero or
    /// `chunk_overlap >= chunk_size`; such a configuration could never make
    /// forward progress.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(RagError::ConfigError("chunk_size must be greater than zero".to_string()));
        }
        if chunk_overlap >= chunk_size {
            return Err(RagError::ConfigError(format!(
                "chunk_overlap ({chunk_overlap}) must be less than chunk_size ({chunk_size})"
            )));
        }
        Ok(Self { chunk_size, chunk_overlap })
    }
}

impl TextSplitter for RecursiveCharacterSplitter {
    fn split(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }
        split_recursive(text, self.chunk_size, self.chunk_overlap, &SEPARATORS)
    }
}

/// Split text using the highest-priority separator it contains; fall back to
/// raw character splitting when none apply.
fn split_recursive(
    text: &str,
    chunk_size: usize,
    chunk_overlap: usize,
    separators: &[&str],
) -> Vec<String> {
    if text.len() <= chunk_size {
        return vec![text.to_string()];
    }

    for (level, separator) in separators.iter().enumerate() {
        if text.contains(separator) {
            let segments = split_keeping_separator(text, separator);
            return merge_segments(segments, chunk_size, chunk_overlap, &separators[level + 1..]);
        }
    }

    split_by_size(text, chunk_size, chunk_overlap)
}

/// Split text at a separator while keeping the separator attached to the
/// preceding segment, so every segment is a contiguous substring of the input.
fn split_keeping_separator<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    let mut result = Vec::new();
    let mut start = 0;

    while let Some(pos) = text[start..].find(separator) {
        let end = start + pos + separator.len();
        result.push(&text[start..end]);
        start = end;
    }

    if start < text.len() {
        result.push(&text[start..]);
    }

    result
}

/// Greedily merge adjacent segments into chunks of at most `chunk_size`
/// bytes, seeding each new chunk with the previous chunk's overlap tail.
/// Segments larger than `chunk_size` recurse into the next separator level.
fn merge_segments(
    segments: Vec<&str>,
    chunk_size: usize,
    chunk_overlap: usize,
    deeper: &[&str],
) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    // Whether `current` holds content not already emitted in a prior chunk
    // (an overlap seed on its own must never become a chunk).
    let mut fresh = false;

    for segment in segments {
        if segment.len() > chunk_size {
            if fresh {
                chunks.push(std::mem::take(&mut current));
            } else {
                current.clear();
            }
            fresh = false;
            chunks.extend(split_recursive(segment, chunk_size, chunk_overlap, deeper));
            continue;
        }

        if !current.is_empty() && current.len() + segment.len() > chunk_size {
            if fresh {
                chunks.push(current.clone());
            }
            current = overlap_tail(&current, chunk_overlap).to_string();
            if current.len() + segment.len() > chunk_size {
                current.clear();
            }
            fresh = false;
        }

        current.push_str(segment);
        fresh = true;
    }

    if fresh {
        chunks.push(current);
    }
    chunks
}

/// Raw character splitting with overlap, the last-resort level. Slices are
/// snapped to UTF-8 boundaries.
fn split_by_size(text: &str, chunk_size: usize, chunk_overlap: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < text.len() {
        let mut end = floor_char_boundary(text, (start + chunk_size).min(text.len()));
        if end <= start {
            // A single code point wider than the window; take it whole.
            end = next_char_boundary(text, start);
        }
        chunks.push(text[start..end].to_string());
        if end >= text.len() {
            break;
        }
        let next = floor_char_boundary(text, end.saturating_sub(chunk_overlap));
        start = if next > start { next } else { end };
    }

    chunks
}

/// The trailing slice of `s` of at most `overlap` bytes, snapped to a UTF-8
/// boundary.
fn overlap_tail(s: &str, overlap: usize) -> &str {
    if overlap == 0 {
        return "";
    }
    if s.len() <= overlap {
        return s;
    }
    let mut idx = s.len() - overlap;
    while !s.is_char_boundary(idx) {
        idx += 1;
    }
    &s[idx..]
}

fn floor_char_boundary(s: &str, mut idx: usize) -> usize {
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

fn next_char_boundary(s: &str, idx: usize) -> usize {
    let mut next = idx + 1;
    while next < s.len() && !s.is_char_boundary(next) {
        next += 1;
    }
    next.min(s.len())
}
