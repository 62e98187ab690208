//! Embedding requests: single `embedContent` and `batchEmbedContents`.
//!
//! Retrieval quality depends on asking the model for the right task
//! optimization: index document chunks with [`TaskType::RetrievalDocument`]
//! and embed user questions with [`TaskType::RetrievalQuery`].

use serde::{Deserialize, Serialize};

use crate::client::{Error, Gemini};

/// Task type hint for the embedding model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskType {
    RetrievalDocument,
    RetrievalQuery,
    SemanticSimilarity,
    Classification,
    Clustering,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedContent {
    pub parts: Vec<EmbedPart>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedPart {
    pub text: String,
}

impl EmbedContent {
    fn from_text(text: impl Into<String>) -> Self {
        Self { parts: vec![EmbedPart { text: text.into() }] }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedContentRequest {
    pub model: String,
    pub content: EmbedContent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_type: Option<TaskType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dimensionality: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchEmbedContentsRequest {
    pub requests: Vec<EmbedContentRequest>,
}

/// A single embedding vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentEmbedding {
    pub values: Vec<f32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentEmbeddingResponse {
    pub embedding: ContentEmbedding,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BatchContentEmbeddingResponse {
    pub embeddings: Vec<ContentEmbedding>,
}

/// Builder for embedding requests.
///
/// # Example
///
/// ```rust,ignore
/// let response = client
///     .embed_content()
///     .with_task_type(TaskType::RetrievalQuery)
///     .with_text("What is the capital of France?")
///     .execute()
///     .await?;
/// ```
pub struct EmbedBuilder {
    client: Gemini,
    task_type: Option<TaskType>,
    output_dimensionality: Option<i32>,
    text: Option<String>,
    chunks: Vec<String>,
}

impl EmbedBuilder {
    pub(crate) fn new(client: Gemini) -> Self {
        Self { client, task_type: None, output_dimensionality: None, text: None, chunks: Vec::new() }
    }

    /// Set the task type hint for this request.
    pub fn with_task_type(mut self, task_type: TaskType) -> Self {
        self.task_type = Some(task_type);
        self
    }

    /// Truncate output vectors to the given dimensionality.
    pub fn with_output_dimensionality(mut self, dims: i32) -> Self {
        self.output_dimensionality = Some(dims);
        self
    }

    /// Set the text to embed (single request).
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set the texts to embed (batch request).
    pub fn with_chunks(mut self, chunks: Vec<String>) -> Self {
        self.chunks = chunks;
        self
    }

    fn request_for(&self, text: impl Into<String>) -> EmbedContentRequest {
        EmbedContentRequest {
            model: self.client.model.as_str().to_string(),
            content: EmbedContent::from_text(text),
            task_type: self.task_type.clone(),
            output_dimensionality: self.output_dimensionality,
        }
    }

    /// Execute a single embedding request.
    pub async fn execute(self) -> Result<ContentEmbeddingResponse, Error> {
        let request = self.request_for(self.text.clone().unwrap_or_default());
        self.client.embed_content_raw(request).await
    }

    /// Execute a batch embedding request, one vector per chunk, in order.
    pub async fn execute_batch(self) -> Result<BatchContentEmbeddingResponse, Error> {
        let requests = self.chunks.iter().map(|c| self.request_for(c.clone())).collect();
        self.client.embed_content_batch(BatchEmbedContentsRequest { requests }).await
    }
}
