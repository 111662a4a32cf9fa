//! Gemini embedding provider using the Generative Language REST API.
//!
//! This module is only available when the `gemini` feature is enabled.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};

/// Base URL of the Generative Language API.
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// The default embedding model.
const DEFAULT_MODEL: &str = "models/embedding-001";

/// The dimensionality of `models/embedding-001` vectors.
const DEFAULT_DIMENSIONS: usize = 768;

/// An [`EmbeddingProvider`] backed by the Gemini embedding API.
///
/// Uses `reqwest` to call the `embedContent` and `batchEmbedContents`
/// endpoints directly, so a whole document's chunks embed in one round-trip.
///
/// # Configuration
///
/// - `model` – defaults to `models/embedding-001`.
/// - `api_key` – from the constructor or the `GOOGLE_API_KEY` environment
///   variable.
///
/// # Example
///
/// ```rust,ignore
/// use ragkit::gemini::GeminiEmbeddingProvider;
///
/// let provider = GeminiEmbeddingProvider::new("AIza...")?;
/// let embedding = provider.embed("hello world").await?;
/// ```
pub struct GeminiEmbeddingProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    dimensions: usize,
}

impl GeminiEmbeddingProvider {
    /// Create a new provider with the given API key and the default model.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(RagError::EmbeddingError {
                provider: "Gemini".into(),
                message: "API key must not be empty".into(),
            });
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model: DEFAULT_MODEL.into(),
            dimensions: DEFAULT_DIMENSIONS,
        })
    }

    /// Create a new provider using the `GOOGLE_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GOOGLE_API_KEY").map_err(|_| RagError::EmbeddingError {
            provider: "Gemini".into(),
            message: "GOOGLE_API_KEY environment variable not set".into(),
        })?;
        Self::new(api_key)
    }

    /// Set the model name (e.g. `models/gemini-embedding-001`).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the reported vector dimensionality for models other than the
    /// default.
    pub fn with_dimensions(mut self, dims: usize) -> Self {
        self.dimensions = dims;
        self
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{GEMINI_API_BASE}/{}:{method}", self.model)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let detail =
            serde_json::from_str::<ErrorResponse>(&body).map(|e| e.error.message).unwrap_or(body);

        error!(provider = "Gemini", %status, "API error");
        Err(RagError::EmbeddingError {
            provider: "Gemini".into(),
            message: format!("API returned {status}: {detail}"),
        })
    }

    fn request_error(e: reqwest::Error) -> RagError {
        error!(provider = "Gemini", error = %e, "request failed");
        RagError::EmbeddingError { provider: "Gemini".into(), message: format!("request failed: {e}") }
    }

    fn parse_error(e: reqwest::Error) -> RagError {
        error!(provider = "Gemini", error = %e, "failed to parse response");
        RagError::EmbeddingError {
            provider: "Gemini".into(),
            message: format!("failed to parse response: {e}"),
        }
    }
}

// ── Gemini API request/response types ──────────────────────────────

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct EmbedContentRequest<'a> {
    model: &'a str,
    content: Content<'a>,
}

#[derive(Serialize)]
struct BatchEmbedRequest<'a> {
    requests: Vec<EmbedContentRequest<'a>>,
}

#[derive(Deserialize)]
struct ContentEmbedding {
    values: Vec<f32>,
}

#[derive(Deserialize)]
struct EmbedContentResponse {
    embedding: ContentEmbedding,
}

#[derive(Deserialize)]
struct BatchEmbedResponse {
    embeddings: Vec<ContentEmbedding>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

// ── EmbeddingProvider implementation ───────────────────────────────

#[async_trait]
impl EmbeddingProvider for GeminiEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        debug!(provider = "Gemini", text_len = text.len(), "embedding single text");

        let request_body = EmbedContentRequest {
            model: &self.model,
            content: Content { parts: vec![Part { text }] },
        };

        let response = self
            .client
            .post(self.endpoint("embedContent"))
            .query(&[("key", &self.api_key)])
            .json(&request_body)
            .send()
            .await
            .map_err(Self::request_error)?;
        let response = Self::check_status(response).await?;

        let parsed: EmbedContentResponse = response.json().await.map_err(Self::parse_error)?;
        Ok(parsed.embedding.values)
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!(provider = "Gemini", batch_size = texts.len(), model = %self.model, "embedding batch");

        let request_body = BatchEmbedRequest {
            requests: texts
                .iter()
                .map(|text| EmbedContentRequest {
                    model: &self.model,
                    content: Content { parts: vec![Part { text }] },
                })
                .collect(),
        };

        let response = self
            .client
            .post(self.endpoint("batchEmbedContents"))
            .query(&[("key", &self.api_key)])
            .json(&request_body)
            .send()
            .await
            .map_err(Self::request_error)?;
        let response = Self::check_status(response).await?;

        let parsed: BatchEmbedResponse = response.json().await.map_err(Self::parse_error)?;
        Ok(parsed.embeddings.into_iter().map(|e| e.values).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
