//! Error types for the `papyrus-digest` crate.

use papyrus_rag::RagError;
use thiserror::Error;

/// Errors that can occur while producing insights or audio digests.
#[derive(Debug, Error)]
pub enum DigestError {
    /// The model's insight response was not the requested JSON shape.
    #[error("Insight response could not be parsed: {0}")]
    InsightParseFailed(String),

    /// Speech synthesis failed or returned no audio.
    #[error("Speech synthesis failed: {0}")]
    SpeechFailed(String),

    /// An underlying retrieval-stack error (model call, configuration).
    #[error(transparent)]
    Rag(#[from] RagError),
}

/// A convenience result type for digest operations.
pub type Result<T> = std::result::Result<T, DigestError>;
