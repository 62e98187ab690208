//! The document pipeline: indexing on one side, grounded question
//! answering on the other.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{info, instrument};

use crate::answer::AnswerGenerator;
use crate::chunking::{Chunker, FixedSizeChunker};
use crate::config::RagConfig;
use crate::document::{GroundedAnswer, SearchableDocument};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::index::FlatIndex;
use crate::model::CompletionModel;
use crate::retriever::Retriever;
use crate::store::{IndexStore, TextSource};

/// Chunks, embeds, indexes, and answers questions about documents.
///
/// Indexing is serialized per document id so two concurrent builds of
/// the same document cannot interleave their store writes; different
/// documents index in parallel. Prepared documents are cached after the
/// first question and invalidated on re-index.
pub struct DocumentPipeline {
    config: RagConfig,
    chunker: FixedSizeChunker,
    embedder: Arc<dyn EmbeddingProvider>,
    answerer: AnswerGenerator,
    store: Arc<dyn IndexStore>,
    builds: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    prepared: RwLock<HashMap<String, Arc<SearchableDocument>>>,
}

impl DocumentPipeline {
    /// Create a new builder for constructing a [`DocumentPipeline`].
    pub fn builder() -> DocumentPipelineBuilder {
        DocumentPipelineBuilder::default()
    }

    /// The configuration this pipeline was built with.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Chunk, embed, and index a document's text, persisting the result.
    ///
    /// The chunk array and the index built from it are persisted as one
    /// blob, so a later question can never pair the index with a chunk
    /// sequence it was not built from. Nothing is persisted if any step
    /// fails; a previously stored blob for the document stays intact.
    ///
    /// Returns the number of chunks indexed.
    ///
    /// # Errors
    ///
    /// - [`RagError::IndexUnbuildable`] if the text produced no chunks.
    /// - [`RagError::EmbeddingUnavailable`] if embedding failed.
    /// - [`RagError::StoreUnavailable`] if persisting the blob failed.
    #[instrument(skip(self, text), fields(document_id = document_id, text_chars = text.chars().count()))]
    pub async fn index_document(&self, document_id: &str, text: &str) -> Result<usize> {
        let guard = self.build_lock(document_id).await;
        let _held = guard.lock().await;

        let chunks = self.chunker.chunk(text);
        if chunks.is_empty() {
            return Err(RagError::IndexUnbuildable(format!(
                "document '{document_id}' produced no chunks"
            )));
        }

        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let vectors = self.embedder.embed_documents(&texts).await?;
        let index = FlatIndex::build(&vectors)?;
        let document = SearchableDocument::new(chunks, index)?;

        let chunk_count = document.chunks().len();
        self.store.store(document_id, document.to_bytes()?).await?;
        self.prepared.write().await.insert(document_id.to_string(), Arc::new(document));

        info!(chunks = chunk_count, "document indexed");
        Ok(chunk_count)
    }

    /// Pull a document's text from a [`TextSource`] and index it.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ExtractionFailed`] if the source has no text
    /// for the document or the text is blank, plus everything
    /// [`Self::index_document`] can return.
    pub async fn index_from_source(
        &self,
        source: &dyn TextSource,
        document_id: &str,
    ) -> Result<usize> {
        let text = source
            .full_text(document_id)
            .await?
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| RagError::ExtractionFailed(document_id.to_string()))?;
        self.index_document(document_id, &text).await
    }

    /// Answer a question about a previously indexed document.
    ///
    /// Retrieval failures (no index, corrupt blob, embedding down) are
    /// errors; a completion failure degrades to a readable answer text
    /// with an empty context.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::NotIndexed`] if the document was never
    /// indexed, and the retrieval-side errors of the embedder, index,
    /// and store.
    #[instrument(skip(self, question), fields(document_id = document_id))]
    pub async fn ask(&self, document_id: &str, question: &str) -> Result<GroundedAnswer> {
        let document = self.prepared_document(document_id).await?;
        let retriever = Retriever::new(Arc::clone(&self.embedder), self.config.top_k);
        let context = retriever.retrieve(&document, question).await?;
        Ok(self.answerer.answer(&context, question).await)
    }

    /// Drop the cached prepared form of a document, forcing the next
    /// question to reload it from the store.
    pub async fn invalidate(&self, document_id: &str) {
        self.prepared.write().await.remove(document_id);
    }

    async fn prepared_document(&self, document_id: &str) -> Result<Arc<SearchableDocument>> {
        if let Some(document) = self.prepared.read().await.get(document_id) {
            return Ok(Arc::clone(document));
        }

        let blob = self
            .store
            .load(document_id)
            .await?
            .ok_or_else(|| RagError::NotIndexed(document_id.to_string()))?;
        let document = Arc::new(SearchableDocument::from_bytes(&blob)?);
        self.prepared
            .write()
            .await
            .insert(document_id.to_string(), Arc::clone(&document));
        Ok(document)
    }

    async fn build_lock(&self, document_id: &str) -> Arc<Mutex<()>> {
        let mut builds = self.builds.lock().await;
        Arc::clone(builds.entry(document_id.to_string()).or_default())
    }
}

/// Builder for constructing a [`DocumentPipeline`].
#[derive(Default)]
pub struct DocumentPipelineBuilder {
    config: Option<RagConfig>,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    completion_model: Option<Arc<dyn CompletionModel>>,
    store: Option<Arc<dyn IndexStore>>,
}

impl DocumentPipelineBuilder {
    /// Set the pipeline configuration. Defaults to [`RagConfig::default`].
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider (required).
    pub fn embedder(mut self, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Set the completion model (required).
    pub fn completion_model(mut self, model: Arc<dyn CompletionModel>) -> Self {
        self.completion_model = Some(model);
        self
    }

    /// Set the index store (required).
    pub fn store(mut self, store: Arc<dyn IndexStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Build the pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if a required collaborator is
    /// missing or the configuration is inconsistent.
    pub fn build(self) -> Result<DocumentPipeline> {
        let config = self.config.unwrap_or_default();
        let chunker = FixedSizeChunker::new(config.chunk_size, config.chunk_overlap)?;
        if config.top_k == 0 {
            return Err(RagError::ConfigError("top_k must be greater than zero".to_string()));
        }
        let embedder = self
            .embedder
            .ok_or_else(|| RagError::ConfigError("an embedding provider is required".to_string()))?;
        let model = self
            .completion_model
            .ok_or_else(|| RagError::ConfigError("a completion model is required".to_string()))?;
        let store = self
            .store
            .ok_or_else(|| RagError::ConfigError("an index store is required".to_string()))?;

        Ok(DocumentPipeline {
            config,
            chunker,
            embedder,
            answerer: AnswerGenerator::new(model),
            store,
            builds: Mutex::new(HashMap::new()),
            prepared: RwLock::new(HashMap::new()),
        })
    }
}
