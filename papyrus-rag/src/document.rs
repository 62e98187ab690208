//! Data types for chunks, search hits, and the persisted searchable form
//! of a document.

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};
use crate::index::FlatIndex;

/// A contiguous window of document text.
///
/// A chunk's identity for retrieval is its position in the chunk
/// sequence; search hits refer back to chunks by that position.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// Position of this chunk in the chunking pass that produced it.
    pub index: usize,
    /// The text content of the chunk.
    pub text: String,
}

/// A nearest-neighbor result from a [`FlatIndex`] search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    /// Position of the matched vector (and therefore chunk).
    pub position: usize,
    /// Squared Euclidean distance to the probe (smaller is closer).
    pub distance: f32,
}

/// An answer together with the context that grounded it.
///
/// The context is returned so callers can audit which passages produced
/// a given answer.
#[derive(Debug, Clone, PartialEq)]
pub struct GroundedAnswer {
    /// The model's answer text, or a user-visible error message when the
    /// completion call failed.
    pub answer: String,
    /// The concatenated chunk texts supplied as grounding; empty when
    /// answering failed or no grounding was available.
    pub context: String,
}

/// The searchable state of one document: its chunk array paired with the
/// vector index built from exactly that array.
///
/// The two are built together, persisted together as a single blob, and
/// never re-derived independently, so a search hit's position is always
/// a valid description of the chunk sequence the index was built from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchableDocument {
    chunks: Vec<Chunk>,
    index: FlatIndex,
}

impl SearchableDocument {
    /// Pair a chunk array with the index built from it.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::IndexUnbuildable`] if the chunk count and the
    /// index vector count disagree.
    pub fn new(chunks: Vec<Chunk>, index: FlatIndex) -> Result<Self> {
        if chunks.len() != index.len() {
            return Err(RagError::IndexUnbuildable(format!(
                "chunk count ({}) does not match index vector count ({})",
                chunks.len(),
                index.len()
            )));
        }
        Ok(Self { chunks, index })
    }

    /// The chunk array the index was built from.
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// The vector index over the chunk array.
    pub fn index(&self) -> &FlatIndex {
        &self.index
    }

    /// Serialize to the persisted blob form.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self)
            .map_err(|e| RagError::IndexCorrupt(format!("failed to serialize document: {e}")))
    }

    /// Reconstruct from a persisted blob.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::IndexCorrupt`] if the blob does not decode or
    /// the decoded chunk/index pairing is inconsistent.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let doc: Self = bincode::deserialize(bytes)
            .map_err(|e| RagError::IndexCorrupt(format!("failed to deserialize document: {e}")))?;
        if doc.chunks.len() != doc.index.len() {
            return Err(RagError::IndexCorrupt(format!(
                "blob pairs {} chunks with {} vectors",
                doc.chunks.len(),
                doc.index.len()
            )));
        }
        Ok(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(index: usize, text: &str) -> Chunk {
        Chunk { index, text: text.to_string() }
    }

    #[test]
    fn pairing_rejects_count_mismatch() {
        let index = FlatIndex::build(&[vec![1.0, 0.0]]).unwrap();
        let err = SearchableDocument::new(vec![chunk(0, "a"), chunk(1, "b")], index).unwrap_err();
        assert!(matches!(err, RagError::IndexUnbuildable(_)));
    }

    #[test]
    fn blob_round_trip_preserves_chunks_and_search() {
        let index = FlatIndex::build(&[vec![0.0, 0.0], vec![3.0, 4.0]]).unwrap();
        let doc =
            SearchableDocument::new(vec![chunk(0, "near"), chunk(1, "far")], index).unwrap();

        let restored = SearchableDocument::from_bytes(&doc.to_bytes().unwrap()).unwrap();
        assert_eq!(restored.chunks(), doc.chunks());

        let probe = vec![0.1, 0.1];
        let a = doc.index().search(&probe, 2).unwrap();
        let b = restored.index().search(&probe, 2).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn garbage_blob_is_corrupt_not_a_panic() {
        let err = SearchableDocument::from_bytes(&[0xde, 0xad, 0xbe, 0xef]).unwrap_err();
        assert!(matches!(err, RagError::IndexCorrupt(_)));
    }
}
