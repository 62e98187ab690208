//! Persistence seams: where document text comes from and where index
//! blobs go.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::Result;

/// A source of extracted document text.
///
/// The pipeline does not parse file formats itself; whatever extracts
/// text from a PDF or any other source sits behind this trait.
#[async_trait]
pub trait TextSource: Send + Sync {
    /// Return the full extracted text for a document, or `None` if the
    /// source knows nothing about it.
    async fn full_text(&self, document_id: &str) -> Result<Option<String>>;
}

/// Storage for persisted searchable-document blobs, keyed by document id.
#[async_trait]
pub trait IndexStore: Send + Sync {
    /// Store a blob, replacing any previous blob for the same document.
    async fn store(&self, document_id: &str, blob: Vec<u8>) -> Result<()>;

    /// Load the blob for a document, or `None` if it was never stored.
    async fn load(&self, document_id: &str) -> Result<Option<Vec<u8>>>;
}

/// An in-memory [`IndexStore`] for tests and single-process use.
#[derive(Debug, Default)]
pub struct MemoryIndexStore {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryIndexStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IndexStore for MemoryIndexStore {
    async fn store(&self, document_id: &str, blob: Vec<u8>) -> Result<()> {
        self.blobs.write().await.insert(document_id.to_string(), blob);
        Ok(())
    }

    async fn load(&self, document_id: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.blobs.read().await.get(document_id).cloned())
    }
}
