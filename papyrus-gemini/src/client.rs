use std::fmt::{self, Formatter};
use std::sync::LazyLock;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, InvalidHeaderValue};
use reqwest::{Client, ClientBuilder, Response};
use serde::{Deserialize, Serialize};
use snafu::{ResultExt, Snafu};
use tracing::instrument;
use url::Url;

use crate::embedding::{
    BatchContentEmbeddingResponse, BatchEmbedContentsRequest, ContentEmbeddingResponse,
    EmbedBuilder, EmbedContentRequest,
};
use crate::generation::{ContentBuilder, GenerateContentRequest, GenerationResponse};

static DEFAULT_BASE_URL: LazyLock<Url> = LazyLock::new(|| {
    Url::parse("https://generativelanguage.googleapis.com/v1beta/")
        .expect("unreachable error: failed to parse default base URL")
});

/// Default timeout applied to every request so a stalled remote call
/// surfaces as an error instead of hanging the pipeline.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Model {
    #[default]
    #[serde(rename = "models/gemini-2.5-flash")]
    Gemini25Flash,
    #[serde(rename = "models/gemini-2.5-flash-lite")]
    Gemini25FlashLite,
    #[serde(rename = "models/gemini-2.5-flash-preview-tts")]
    Gemini25FlashTts,
    #[serde(rename = "models/gemini-embedding-001")]
    GeminiEmbedding001,
    #[serde(rename = "models/text-embedding-004")]
    TextEmbedding004,
    #[serde(untagged)]
    Custom(String),
}

impl Model {
    pub fn as_str(&self) -> &str {
        match self {
            Model::Gemini25Flash => "models/gemini-2.5-flash",
            Model::Gemini25FlashLite => "models/gemini-2.5-flash-lite",
            Model::Gemini25FlashTts => "models/gemini-2.5-flash-preview-tts",
            Model::GeminiEmbedding001 => "models/gemini-embedding-001",
            Model::TextEmbedding004 => "models/text-embedding-004",
            Model::Custom(model) => model,
        }
    }
}

impl From<String> for Model {
    fn from(model: String) -> Self {
        Self::Custom(model)
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("failed to parse API key"))]
    InvalidApiKey {
        source: InvalidHeaderValue,
    },

    #[snafu(display("failed to construct URL (probably incorrect model name): {suffix}"))]
    ConstructUrl {
        source: url::ParseError,
        suffix: String,
    },

    #[snafu(display("failed to perform request"))]
    PerformRequest {
        source: reqwest::Error,
    },

    #[snafu(display(
        "bad response from server; code {code}; description: {}",
        description.as_deref().unwrap_or("none")
    ))]
    BadResponse {
        /// HTTP status code
        code: u16,
        /// HTTP error description
        description: Option<String>,
    },

    #[snafu(display("failed to deserialize JSON response"))]
    DecodeResponse {
        source: reqwest::Error,
    },

    #[snafu(display("failed to decode inline audio data"))]
    DecodeAudio {
        source: base64::DecodeError,
    },
}

/// Client for the Gemini generative language API.
///
/// Holds a reqwest client with the API key installed as a default header
/// and a model the builders inherit. Cheap to clone.
#[derive(Clone)]
pub struct Gemini {
    http_client: Client,
    pub model: Model,
    base_url: Url,
}

impl Gemini {
    /// Create a client for the default generation model.
    pub fn new(api_key: impl AsRef<str>) -> Result<Self, Error> {
        Self::with_model(api_key, Model::default())
    }

    /// Create a client pinned to a specific model.
    pub fn with_model<M: Into<Model>>(api_key: impl AsRef<str>, model: M) -> Result<Self, Error> {
        Self::with_base_url(api_key, model, DEFAULT_BASE_URL.clone())
    }

    /// Create a client with a custom base URL (testing, proxies).
    pub fn with_base_url<M: Into<Model>>(
        api_key: impl AsRef<str>,
        model: M,
        base_url: Url,
    ) -> Result<Self, Error> {
        let headers = HeaderMap::from_iter([(
            HeaderName::from_static("x-goog-api-key"),
            HeaderValue::from_str(api_key.as_ref()).context(InvalidApiKeySnafu)?,
        )]);

        let http_client = ClientBuilder::new()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("all parameters must be valid");

        Ok(Self { http_client, model: model.into(), base_url })
    }

    /// Start an embedding request against this client's model.
    pub fn embed_content(&self) -> EmbedBuilder {
        EmbedBuilder::new(self.clone())
    }

    /// Start a generation request against this client's model.
    pub fn generate_content(&self) -> ContentBuilder {
        ContentBuilder::new(self.clone())
    }

    fn build_url(&self, endpoint: &str) -> Result<Url, Error> {
        let suffix = format!("{}:{endpoint}", self.model.as_str());
        self.base_url.join(&suffix).context(ConstructUrlSnafu { suffix })
    }

    /// Check the response status code and return an error if it is not successful
    async fn check_response(response: Response) -> Result<Response, Error> {
        let status = response.status();
        if !status.is_success() {
            let description = response.text().await.ok();
            BadResponseSnafu { code: status.as_u16(), description }.fail()
        } else {
            Ok(response)
        }
    }

    /// Perform a POST request with JSON body and deserialize the JSON response.
    #[instrument(skip(self, body), fields(request.url = %url))]
    async fn post_json<Req: Serialize, Res: serde::de::DeserializeOwned>(
        &self,
        url: Url,
        body: &Req,
    ) -> Result<Res, Error> {
        let response = self
            .http_client
            .post(url)
            .json(body)
            .send()
            .await
            .context(PerformRequestSnafu)?;
        tracing::debug!("response received");
        let response = Self::check_response(response).await?;
        response.json().await.context(DecodeResponseSnafu)
    }

    /// Generate content
    #[instrument(skip_all, fields(
        model = %self.model,
        messages.parts.count = request.contents.len(),
    ), err)]
    pub(crate) async fn generate_content_raw(
        &self,
        request: GenerateContentRequest,
    ) -> Result<GenerationResponse, Error> {
        let url = self.build_url("generateContent")?;
        self.post_json(url, &request).await
    }

    /// Embed content
    #[instrument(skip_all, fields(
        model = %self.model,
        task.type = request.task_type.as_ref().map(|t| format!("{t:?}")),
    ), err)]
    pub(crate) async fn embed_content_raw(
        &self,
        request: EmbedContentRequest,
    ) -> Result<ContentEmbeddingResponse, Error> {
        let url = self.build_url("embedContent")?;
        self.post_json(url, &request).await
    }

    /// Batch embed content
    #[instrument(skip_all, fields(model = %self.model, batch.size = request.requests.len()), err)]
    pub(crate) async fn embed_content_batch(
        &self,
        request: BatchEmbedContentsRequest,
    ) -> Result<BatchContentEmbeddingResponse, Error> {
        let url = self.build_url("batchEmbedContents")?;
        self.post_json(url, &request).await
    }
}

impl fmt::Debug for Gemini {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gemini")
            .field("model", &self.model)
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}
