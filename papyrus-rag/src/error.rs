//! Error types for the `papyrus-rag` crate.

use thiserror::Error;

/// Errors that can occur while indexing or querying a document.
#[derive(Debug, Error)]
pub enum RagError {
    /// The extraction collaborator returned no usable text for a document.
    #[error("No text could be extracted for document '{0}'")]
    ExtractionFailed(String),

    /// The remote embedding call failed or returned a malformed shape.
    #[error("Embedding unavailable ({provider}): {message}")]
    EmbeddingUnavailable {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// Zero chunks or zero vectors were supplied to an index build.
    #[error("Index unbuildable: {0}")]
    IndexUnbuildable(String),

    /// A vector's dimension disagreed with the index dimension.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// The dimension the index was built with.
        expected: usize,
        /// The dimension actually supplied.
        actual: usize,
    },

    /// A persisted index blob failed to deserialize or was internally
    /// inconsistent.
    #[error("Index blob corrupt: {0}")]
    IndexCorrupt(String),

    /// The persistence collaborator failed.
    #[error("Index store error ({backend}): {message}")]
    StoreUnavailable {
        /// The store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// The remote completion call failed.
    #[error("Completion unavailable ({provider}): {message}")]
    CompletionUnavailable {
        /// The completion provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// A question was asked against a document that has no stored index.
    #[error("Document '{0}' has not been indexed")]
    NotIndexed(String),

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// A convenience result type for retrieval operations.
pub type Result<T> = std::result::Result<T, RagError>;
