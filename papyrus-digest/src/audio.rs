//! Audio digests: a spoken summary of a document.

use std::sync::Arc;

use async_trait::async_trait;
use papyrus_rag::CompletionModel;
use tracing::{info, instrument};

#[cfg(any(test, feature = "gemini"))]
use crate::error::DigestError;
use crate::error::Result;
use crate::insight::{truncate_chars, DEFAULT_CHAR_BUDGET};

/// Turns text into spoken audio bytes.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize speech for the given text.
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>>;
}

/// A spoken summary together with the text it was synthesized from.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioDigest {
    /// The summary text that was read aloud.
    pub summary_text: String,
    /// The synthesized audio bytes.
    pub audio: Vec<u8>,
}

/// Produces an [`AudioDigest`]: summarize the document, then synthesize
/// the summary.
pub struct AudioSummarizer {
    model: Arc<dyn CompletionModel>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    char_budget: usize,
}

impl AudioSummarizer {
    /// Create a summarizer with the default character budget.
    pub fn new(model: Arc<dyn CompletionModel>, synthesizer: Arc<dyn SpeechSynthesizer>) -> Self {
        Self { model, synthesizer, char_budget: DEFAULT_CHAR_BUDGET }
    }

    /// Override the character budget.
    pub fn with_char_budget(mut self, budget: usize) -> Self {
        self.char_budget = budget;
        self
    }

    /// Summarize the (possibly truncated) text and read the summary
    /// aloud.
    ///
    /// # Errors
    ///
    /// Returns a wrapped model error if summarization fails, or
    /// [`DigestError::SpeechFailed`] if synthesis fails.
    #[instrument(skip_all, fields(text_chars = text.chars().count()))]
    pub async fn digest(&self, text: &str) -> Result<AudioDigest> {
        let excerpt = truncate_chars(text, self.char_budget);
        let prompt = format!(
            "Write a spoken-word summary of the following document in a few \
             short paragraphs, suitable for listening rather than reading. \
             Respond with the summary text only.\n\nDOCUMENT:\n{excerpt}"
        );
        let summary_text = self.model.generate(&prompt).await?;
        let audio = self.synthesizer.synthesize(&summary_text).await?;
        info!(summary_chars = summary_text.chars().count(), audio_bytes = audio.len(), "audio digest produced");
        Ok(AudioDigest { summary_text, audio })
    }
}

/// [`SpeechSynthesizer`] backed by the Gemini TTS model.
#[cfg(feature = "gemini")]
pub struct GeminiSpeechSynthesizer {
    client: papyrus_gemini::Gemini,
    voice: String,
}

#[cfg(feature = "gemini")]
impl GeminiSpeechSynthesizer {
    /// Default prebuilt voice used when none is chosen.
    pub const DEFAULT_VOICE: &'static str = "Kore";

    /// Create a synthesizer using the TTS preview model.
    pub fn new(api_key: impl AsRef<str>) -> Result<Self> {
        let client =
            papyrus_gemini::Gemini::with_model(api_key, papyrus_gemini::Model::Gemini25FlashTts)
                .map_err(|e| DigestError::SpeechFailed(e.to_string()))?;
        Ok(Self { client, voice: Self::DEFAULT_VOICE.to_string() })
    }

    /// Use a different prebuilt voice.
    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = voice.into();
        self
    }
}

#[cfg(feature = "gemini")]
#[async_trait]
impl SpeechSynthesizer for GeminiSpeechSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .generate_content()
            .with_user_message(text)
            .with_speech_voice(self.voice.clone())
            .execute()
            .await
            .map_err(|e| DigestError::SpeechFailed(e.to_string()))?;

        response
            .audio_bytes()
            .map_err(|e| DigestError::SpeechFailed(e.to_string()))?
            .ok_or_else(|| DigestError::SpeechFailed("response contained no audio".to_string()))
    }
}
