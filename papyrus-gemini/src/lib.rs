//! Compact client for the Google Gemini API.
//!
//! Covers the three call shapes the papyrus pipelines need:
//!
//! - task-typed embeddings (`embedContent` / `batchEmbedContents`)
//! - text generation (`generateContent`)
//! - speech generation (audio response modality)
//!
//! The client is constructed from an explicit API key; nothing reads
//! ambient process state.
//!
//! ```rust,ignore
//! use papyrus_gemini::{Gemini, Model, TaskType};
//!
//! let client = Gemini::with_model(api_key, Model::GeminiEmbedding001)?;
//! let response = client
//!     .embed_content()
//!     .with_task_type(TaskType::RetrievalDocument)
//!     .with_chunks(chunks)
//!     .execute_batch()
//!     .await?;
//! ```

pub mod client;
pub mod embedding;
pub mod generation;


pub use client::{Error, Gemini, Model};
pub use embedding::{
    BatchContentEmbeddingResponse, ContentEmbedding, ContentEmbeddingResponse, EmbedBuilder,
    TaskType,
};
pub use generation::{
    Candidate, Content, ContentBuilder, GenerationConfig, GenerationResponse, InlineData, Part,
    SpeechConfig, UsageMetadata,
};
