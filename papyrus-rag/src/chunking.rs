//! Document chunking.
//!
//! Splits normalized document text into overlapping fixed-size windows.
//! The windows deliberately ignore sentence and paragraph boundaries;
//! the overlap keeps facts near a window edge visible to both sides, and
//! boundary-aware chunking can be added later as another [`Chunker`]
//! without touching the rest of the pipeline.

use crate::document::Chunk;
use crate::error::{RagError, Result};

/// A strategy for splitting document text into chunks.
///
/// Implementations must be pure: the same text always produces the same
/// chunk sequence, since the sequence is the key space for a previously
/// built index.
pub trait Chunker: Send + Sync {
    /// Split text into an ordered chunk sequence.
    ///
    /// Returns an empty `Vec` for empty text.
    fn chunk(&self, text: &str) -> Vec<Chunk>;
}

/// Splits text into fixed-size character windows with a fixed overlap.
///
/// Sizes are counted in characters, not bytes, so multi-byte text never
/// splits inside a character. The final chunk may be shorter than
/// `chunk_size`; no padding is applied.
#[derive(Debug, Clone)]
pub struct FixedSizeChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl FixedSizeChunker {
    /// Create a new `FixedSizeChunker`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] unless `chunk_size > chunk_overlap`
    /// and `chunk_size > 0`.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 || chunk_overlap >= chunk_size {
            return Err(RagError::ConfigError(format!(
                "chunk_size ({chunk_size}) must be greater than chunk_overlap ({chunk_overlap})"
            )));
        }
        Ok(Self { chunk_size, chunk_overlap })
    }
}

impl Chunker for FixedSizeChunker {
    fn chunk(&self, text: &str) -> Vec<Chunk> {
        if text.is_empty() {
            return Vec::new();
        }

        // Byte offset of every character, so windows slice on character
        // counts without landing inside a multi-byte sequence.
        let offsets: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        let char_count = offsets.len();
        let step = self.chunk_size - self.chunk_overlap;

        let mut chunks = Vec::with_capacity(char_count.div_ceil(step));
        let mut start = 0;
        while start < char_count {
            let end = (start + self.chunk_size).min(char_count);
            let byte_start = offsets[start];
            let byte_end = if end == char_count { text.len() } else { offsets[end] };
            chunks.push(Chunk {
                index: chunks.len(),
                text: text[byte_start..byte_end].to_string(),
            });
            start += step;
        }

        chunks
    }
}
