//! Grounded answer generation.

use std::sync::Arc;

use tracing::error;

use crate::document::GroundedAnswer;
use crate::model::CompletionModel;

/// The sentence the model must produce verbatim when the retrieved
/// context does not contain the answer.
pub const NOT_FOUND_SENTENCE: &str = "I could not find the answer in the document.";

/// Produces answers that are grounded in retrieved context and nothing
/// else.
pub struct AnswerGenerator {
    model: Arc<dyn CompletionModel>,
}

impl AnswerGenerator {
    /// Create an answer generator over the given completion model.
    pub fn new(model: Arc<dyn CompletionModel>) -> Self {
        Self { model }
    }

    /// Answer a question from the given context.
    ///
    /// This never fails: a completion error becomes a user-visible error
    /// message in the answer text, with an empty context, so a flaky
    /// model call degrades to a readable reply instead of an aborted
    /// conversation.
    pub async fn answer(&self, context: &str, question: &str) -> GroundedAnswer {
        let prompt = grounded_prompt(context, question);
        match self.model.generate(&prompt).await {
            Ok(answer) => GroundedAnswer { answer, context: context.to_string() },
            Err(e) => {
                error!(error = %e, "completion failed while answering");
                GroundedAnswer {
                    answer: format!("An error occurred while answering: {e}"),
                    context: String::new(),
                }
            }
        }
    }
}

/// Build the grounding prompt: instructions first, then the context, then
/// the question, so the model sees the restriction before the material.
fn grounded_prompt(context: &str, question: &str) -> String {
    format!(
        "Answer the following user question based ONLY on the provided context. \
         If the answer is not available in the context, you must say \
         '{NOT_FOUND_SENTENCE}'\n\n\
         CONTEXT:\n{context}\n\n\
         USER QUESTION:\n{question}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_carries_context_question_and_escape_sentence() {
        let prompt = grounded_prompt("the sky is blue", "what color is the sky?");
        assert!(prompt.contains("the sky is blue"));
        assert!(prompt.contains("what color is the sky?"));
        assert!(prompt.contains(NOT_FOUND_SENTENCE));
        // Instructions come before the material.
        assert!(prompt.find("ONLY").unwrap() < prompt.find("CONTEXT:").unwrap());
        assert!(prompt.find("CONTEXT:").unwrap() < prompt.find("USER QUESTION:").unwrap());
    }
}
