//! Context retrieval: question in, grounding text out.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::document::{Chunk, SearchHit, SearchableDocument};
use crate::embedding::EmbeddingProvider;
use crate::error::Result;

/// Retrieves the chunks most relevant to a question and assembles them
/// into a single grounding context string.
pub struct Retriever {
    embedder: Arc<dyn EmbeddingProvider>,
    top_k: usize,
}

impl Retriever {
    /// Create a retriever over the given embedding provider.
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, top_k: usize) -> Self {
        Self { embedder, top_k }
    }

    /// Embed the question, search the document's index, and assemble the
    /// matched chunk texts into one context string.
    pub async fn retrieve(&self, document: &SearchableDocument, question: &str) -> Result<String> {
        let probe = self.embedder.embed_query(question).await?;
        let hits = document.index().search(&probe, self.top_k)?;
        debug!(hits = hits.len(), top_k = self.top_k, "retrieved nearest chunks");
        Ok(assemble_context(document.chunks(), &hits))
    }
}

/// Join the texts of the hit chunks, nearest first, separated by a blank
/// line. Hits whose position falls outside the chunk array are skipped
/// rather than aborting the whole retrieval.
pub fn assemble_context(chunks: &[Chunk], hits: &[SearchHit]) -> String {
    let mut parts = Vec::with_capacity(hits.len());
    for hit in hits {
        match chunks.get(hit.position) {
            Some(chunk) => parts.push(chunk.text.as_str()),
            None => {
                warn!(
                    position = hit.position,
                    chunk_count = chunks.len(),
                    "search hit outside chunk array, skipping"
                );
            }
        }
    }
    parts.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(index: usize, text: &str) -> Chunk {
        Chunk { index, text: text.to_string() }
    }

    fn hit(position: usize) -> SearchHit {
        SearchHit { position, distance: 0.0 }
    }

    #[test]
    fn context_joins_hits_in_hit_order() {
        let chunks = vec![chunk(0, "alpha"), chunk(1, "beta"), chunk(2, "gamma")];
        let context = assemble_context(&chunks, &[hit(2), hit(0)]);
        assert_eq!(context, "gamma\n\nalpha");
    }

    #[test]
    fn out_of_range_hits_are_skipped() {
        let chunks = vec![chunk(0, "alpha")];
        let context = assemble_context(&chunks, &[hit(0), hit(7)]);
        assert_eq!(context, "alpha");
    }

    #[test]
    fn no_hits_means_empty_context() {
        let chunks = vec![chunk(0, "alpha")];
        assert_eq!(assemble_context(&chunks, &[]), "");
    }
}
