//! Structured document insights.

use std::sync::Arc;

use papyrus_rag::CompletionModel;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{DigestError, Result};

/// How many characters of document text are sent to the model. Long
/// documents are truncated from the front; the opening of a paper
/// carries its summary-relevant material.
pub const DEFAULT_CHAR_BUDGET: usize = 30_000;

/// Machine-readable insights extracted from a document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentInsights {
    /// The document condensed into a single sentence.
    pub one_sentence_summary: String,
    /// The key concepts the document introduces or relies on.
    pub key_concepts: Vec<String>,
    /// A short prose description of the document's main arguments.
    pub main_arguments: String,
}

/// Generates [`DocumentInsights`] from raw document text.
pub struct InsightGenerator {
    model: Arc<dyn CompletionModel>,
    char_budget: usize,
}

impl InsightGenerator {
    /// Create a generator with the default character budget.
    pub fn new(model: Arc<dyn CompletionModel>) -> Self {
        Self { model, char_budget: DEFAULT_CHAR_BUDGET }
    }

    /// Override the character budget.
    pub fn with_char_budget(mut self, budget: usize) -> Self {
        self.char_budget = budget;
        self
    }

    /// Ask the model for insights over the (possibly truncated) text.
    ///
    /// # Errors
    ///
    /// Returns [`DigestError::InsightParseFailed`] if the model reply is
    /// not the requested JSON shape, or a wrapped model error.
    #[instrument(skip_all, fields(text_chars = text.chars().count()))]
    pub async fn generate(&self, text: &str) -> Result<DocumentInsights> {
        let excerpt = truncate_chars(text, self.char_budget);
        let prompt = insight_prompt(excerpt);
        let reply = self.model.generate(&prompt).await?;
        parse_insights(&reply)
    }
}

fn insight_prompt(excerpt: &str) -> String {
    format!(
        "Analyze the following document and respond with a single JSON object \
         and nothing else. The object must have exactly these keys:\n\
         - \"one_sentence_summary\": a one-sentence summary of the document\n\
         - \"key_concepts\": a list of the key concepts as strings\n\
         - \"main_arguments\": a short description of the main arguments\n\n\
         DOCUMENT:\n{excerpt}"
    )
}

/// Parse a model reply into insights, tolerating a Markdown code fence
/// around the JSON body.
fn parse_insights(reply: &str) -> Result<DocumentInsights> {
    let body = strip_code_fence(reply.trim());
    serde_json::from_str(body)
        .map_err(|e| DigestError::InsightParseFailed(format!("{e}; reply began: {:.80}", body)))
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening fence line.
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Truncate to at most `budget` characters, never splitting a character.
pub(crate) fn truncate_chars(text: &str, budget: usize) -> &str {
    match text.char_indices().nth(budget) {
        Some((byte_offset, _)) => &text[..byte_offset],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use papyrus_rag::RagError;

    struct ScriptedModel(String);

    #[async_trait]
    impl CompletionModel for ScriptedModel {
        async fn generate(&self, _prompt: &str) -> std::result::Result<String, RagError> {
            Ok(self.0.clone())
        }
    }

    const INSIGHTS_JSON: &str = r#"{
        "one_sentence_summary": "A study of tide patterns.",
        "key_concepts": ["tides", "lunar cycles"],
        "main_arguments": "Tides follow the moon."
    }"#;

    #[tokio::test]
    async fn bare_json_reply_parses() {
        let generator = InsightGenerator::new(Arc::new(ScriptedModel(INSIGHTS_JSON.to_string())));
        let insights = generator.generate("some document text").await.unwrap();
        assert_eq!(insights.one_sentence_summary, "A study of tide patterns.");
        assert_eq!(insights.key_concepts, vec!["tides", "lunar cycles"]);
    }

    #[tokio::test]
    async fn fenced_json_reply_parses() {
        let fenced = format!("```json\n{INSIGHTS_JSON}\n```");
        let generator = InsightGenerator::new(Arc::new(ScriptedModel(fenced)));
        let insights = generator.generate("some document text").await.unwrap();
        assert_eq!(insights.main_arguments, "Tides follow the moon.");
    }

    #[tokio::test]
    async fn prose_reply_is_a_parse_error() {
        let generator =
            InsightGenerator::new(Arc::new(ScriptedModel("Here are my thoughts...".to_string())));
        let err = generator.generate("some document text").await.unwrap_err();
        assert!(matches!(err, DigestError::InsightParseFailed(_)));
    }

    #[test]
    fn truncation_respects_character_boundaries() {
        let text = "€".repeat(10);
        assert_eq!(truncate_chars(&text, 4).chars().count(), 4);
        assert_eq!(truncate_chars(&text, 10), text);
        assert_eq!(truncate_chars(&text, 50), text);
    }

    #[test]
    fn fence_stripping_handles_all_forms() {
        assert_eq!(strip_code_fence("{\"a\": 1}"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("```\n{\"a\": 1}\n```"), "{\"a\": 1}");
    }
}
