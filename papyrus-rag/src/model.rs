//! Completion model abstraction.

use async_trait::async_trait;

use crate::error::Result;

/// A text completion model.
///
/// The pipeline builds the full grounded prompt itself; implementations
/// only turn a prompt into generated text.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// Generate a completion for the given prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;
}
