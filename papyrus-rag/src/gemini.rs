//! Gemini-backed implementations of the pipeline's model seams.
//!
//! Enabled by the `gemini` feature.

use async_trait::async_trait;
use papyrus_gemini::{Gemini, Model, TaskType};
use tracing::debug;

use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::model::CompletionModel;

const PROVIDER: &str = "gemini";

/// [`EmbeddingProvider`] backed by the Gemini embedding API.
///
/// Document chunks are embedded with the `RETRIEVAL_DOCUMENT` task type
/// and questions with `RETRIEVAL_QUERY`, matching how the embedding
/// model was trained for retrieval.
pub struct GeminiEmbeddingProvider {
    client: Gemini,
}

impl GeminiEmbeddingProvider {
    /// Create a provider using the default embedding model.
    pub fn new(api_key: impl AsRef<str>) -> Result<Self> {
        let client = Gemini::with_model(api_key, Model::GeminiEmbedding001)
            .map_err(|e| RagError::EmbeddingUnavailable {
                provider: PROVIDER.to_string(),
                message: e.to_string(),
            })?;
        Ok(Self { client })
    }

    /// Create a provider over an already configured client.
    pub fn from_client(client: Gemini) -> Self {
        Self { client }
    }
}

#[async_trait]
impl EmbeddingProvider for GeminiEmbeddingProvider {
    async fn embed_documents(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let response = self
            .client
            .embed_content()
            .with_task_type(TaskType::RetrievalDocument)
            .with_chunks(texts.iter().map(|t| t.to_string()).collect())
            .execute_batch()
            .await
            .map_err(|e| RagError::EmbeddingUnavailable {
                provider: PROVIDER.to_string(),
                message: e.to_string(),
            })?;

        if response.embeddings.len() != texts.len() {
            return Err(RagError::EmbeddingUnavailable {
                provider: PROVIDER.to_string(),
                message: format!(
                    "requested {} embeddings, received {}",
                    texts.len(),
                    response.embeddings.len()
                ),
            });
        }

        debug!(count = texts.len(), "embedded document chunks");
        Ok(response.embeddings.into_iter().map(|e| e.values).collect())
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        let response = self
            .client
            .embed_content()
            .with_task_type(TaskType::RetrievalQuery)
            .with_text(text)
            .execute()
            .await
            .map_err(|e| RagError::EmbeddingUnavailable {
                provider: PROVIDER.to_string(),
                message: e.to_string(),
            })?;
        Ok(response.embedding.values)
    }
}

/// [`CompletionModel`] backed by the Gemini generation API.
pub struct GeminiCompletionModel {
    client: Gemini,
}

impl GeminiCompletionModel {
    /// Create a model using the default generation model.
    pub fn new(api_key: impl AsRef<str>) -> Result<Self> {
        let client = Gemini::with_model(api_key, Model::Gemini25Flash)
            .map_err(|e| RagError::CompletionUnavailable {
                provider: PROVIDER.to_string(),
                message: e.to_string(),
            })?;
        Ok(Self { client })
    }

    /// Create a model over an already configured client.
    pub fn from_client(client: Gemini) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CompletionModel for GeminiCompletionModel {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let response = self
            .client
            .generate_content()
            .with_user_message(prompt)
            .execute()
            .await
            .map_err(|e| RagError::CompletionUnavailable {
                provider: PROVIDER.to_string(),
                message: e.to_string(),
            })?;

        let text = response.text();
        if text.is_empty() {
            return Err(RagError::CompletionUnavailable {
                provider: PROVIDER.to_string(),
                message: "response contained no text".to_string(),
            });
        }
        Ok(text)
    }
}
