//! Content generation: text completion and speech synthesis over
//! `generateContent`.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use snafu::ResultExt;

use crate::client::{DecodeAudioSnafu, Error, Gemini};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: Some(text.into()), inline_data: None }
    }
}

/// Base64-encoded binary payload (audio for speech responses).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(text: impl Into<String>) -> Self {
        Self { role: Some("user".to_string()), parts: vec![Part::text(text)] }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_modalities: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speech_config: Option<SpeechConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechConfig {
    pub voice_config: VoiceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceConfig {
    pub prebuilt_voice_config: PrebuiltVoiceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrebuiltVoiceConfig {
    pub voice_name: String,
}

impl SpeechConfig {
    pub fn voice(name: impl Into<String>) -> Self {
        Self {
            voice_config: VoiceConfig {
                prebuilt_voice_config: PrebuiltVoiceConfig { voice_name: name.into() },
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
    #[serde(default)]
    pub index: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: Option<i64>,
    #[serde(default)]
    pub candidates_token_count: Option<i64>,
    #[serde(default)]
    pub total_token_count: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub usage_metadata: Option<UsageMetadata>,
    #[serde(default)]
    pub model_version: Option<String>,
    #[serde(default)]
    pub response_id: Option<String>,
}

impl GenerationResponse {
    /// Concatenated text parts of the first candidate, empty if none.
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }

    /// Decoded audio payload of the first candidate, if the response
    /// carries one (speech generation).
    pub fn audio_bytes(&self) -> Result<Option<Vec<u8>>, Error> {
        let Some(inline) = self
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .and_then(|content| content.parts.iter().find_map(|p| p.inline_data.as_ref()))
        else {
            return Ok(None);
        };
        let bytes = BASE64.decode(inline.data.as_bytes()).context(DecodeAudioSnafu)?;
        Ok(Some(bytes))
    }
}

/// Builder for generation requests.
///
/// # Example
///
/// ```rust,ignore
/// let response = client
///     .generate_content()
///     .with_user_message("Summarize this document.")
///     .execute()
///     .await?;
/// println!("{}", response.text());
/// ```
pub struct ContentBuilder {
    client: Gemini,
    contents: Vec<Content>,
    system_instruction: Option<Content>,
    generation_config: Option<GenerationConfig>,
}

impl ContentBuilder {
    pub(crate) fn new(client: Gemini) -> Self {
        Self { client, contents: Vec::new(), system_instruction: None, generation_config: None }
    }

    /// Append a user turn.
    pub fn with_user_message(mut self, text: impl Into<String>) -> Self {
        self.contents.push(Content::user(text));
        self
    }

    /// Set the system instruction.
    pub fn with_system_instruction(mut self, text: impl Into<String>) -> Self {
        self.system_instruction =
            Some(Content { role: None, parts: vec![Part::text(text)] });
        self
    }

    fn config_mut(&mut self) -> &mut GenerationConfig {
        self.generation_config.get_or_insert_with(GenerationConfig::default)
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.config_mut().temperature = Some(temperature);
        self
    }

    /// Cap the number of output tokens.
    pub fn with_max_output_tokens(mut self, max: i32) -> Self {
        self.config_mut().max_output_tokens = Some(max);
        self
    }

    /// Ask for a JSON response body.
    pub fn with_json_response(mut self) -> Self {
        self.config_mut().response_mime_type = Some("application/json".to_string());
        self
    }

    /// Request spoken audio output with the given prebuilt voice.
    ///
    /// Only meaningful against a TTS-capable model.
    pub fn with_speech_voice(mut self, voice: impl Into<String>) -> Self {
        let config = self.config_mut();
        config.response_modalities = Some(vec!["AUDIO".to_string()]);
        config.speech_config = Some(SpeechConfig::voice(voice));
        self
    }

    /// Execute the generation request.
    pub async fn execute(self) -> Result<GenerationResponse, Error> {
        let request = GenerateContentRequest {
            contents: self.contents,
            system_instruction: self.system_instruction,
            generation_config: self.generation_config,
        };
        self.client.generate_content_raw(request).await
    }
}
