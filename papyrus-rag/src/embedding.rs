//! Embedding provider abstraction.

use async_trait::async_trait;

use crate::error::Result;

/// A provider that maps text to dense vectors.
///
/// Document material and questions are embedded through separate methods
/// because retrieval-tuned models produce different vectors for the two
/// roles; mixing them up silently degrades search quality, so the split
/// is part of the contract rather than a parameter.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed document chunks for storage in an index.
    ///
    /// Returns one vector per input text, in input order. An empty input
    /// slice must return an empty `Vec` without any remote call.
    async fn embed_documents(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;

    /// Embed a question for probing an index.
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>>;
}
