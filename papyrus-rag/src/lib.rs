//! Document question answering over a flat vector index.
//!
//! `papyrus-rag` turns a document's extracted text into a searchable
//! form (overlapping chunks plus a vector index persisted as one blob)
//! and answers questions grounded only in the retrieved passages.
//!
//! The two operations:
//!
//! - [`DocumentPipeline::index_document`]: chunk, embed, build a
//!   [`FlatIndex`], persist the paired [`SearchableDocument`] blob.
//! - [`DocumentPipeline::ask`]: embed the question, retrieve the nearest
//!   chunks, and generate a [`GroundedAnswer`].
//!
//! Model and storage backends plug in behind the [`EmbeddingProvider`],
//! [`CompletionModel`], [`TextSource`], and [`IndexStore`] traits; the
//! `gemini` feature provides Gemini-backed implementations.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use papyrus_rag::{DocumentPipeline, MemoryIndexStore, RagConfig};
//! use papyrus_rag::gemini::{GeminiCompletionModel, GeminiEmbeddingProvider};
//!
//! let pipeline = DocumentPipeline::builder()
//!     .config(RagConfig::default())
//!     .embedder(Arc::new(GeminiEmbeddingProvider::new(api_key)?))
//!     .completion_model(Arc::new(GeminiCompletionModel::new(api_key)?))
//!     .store(Arc::new(MemoryIndexStore::new()))
//!     .build()?;
//!
//! pipeline.index_document("thesis", &text).await?;
//! let answer = pipeline.ask("thesis", "What is the main claim?").await?;
//! ```

pub mod answer;
pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
#[cfg(feature = "gemini")]
pub mod gemini;
pub mod index;
pub mod model;
pub mod pipeline;
pub mod retriever;
pub mod store;

pub use answer::{AnswerGenerator, NOT_FOUND_SENTENCE};
pub use chunking::{Chunker, FixedSizeChunker};
pub use config::{RagConfig, RagConfigBuilder};
pub use document::{Chunk, GroundedAnswer, SearchHit, SearchableDocument};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use index::FlatIndex;
pub use model::CompletionModel;
pub use pipeline::{DocumentPipeline, DocumentPipelineBuilder};
pub use retriever::Retriever;
pub use store::{IndexStore, MemoryIndexStore, TextSource};
