//! Gemini-compatible text-generation client.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use waypoint_core::{send_with_retry, NetworkError, ReqwestErrorExt, RetryConfig};

use crate::error::PlacesError;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TextGenerationClient {
    client: Arc<Client>,
    base_url: String,
    model: String,
    api_key: Option<String>,
    retry: RetryConfig,
}

impl TextGenerationClient {
    pub fn new(api_key: Option<String>) -> Result<Self, PlacesError> {
        Self::with_options(
            DEFAULT_BASE_URL,
            DEFAULT_MODEL,
            api_key,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }

    pub fn with_options(
        base_url: &str,
        model: &str,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PlacesError::Network(e.into_network_error()))?;

        Ok(Self {
            client: Arc::new(client),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key,
            retry: RetryConfig::default(),
        })
    }

    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Send a prompt and return the concatenated text of the first candidate.
    #[instrument(skip(self, prompt), fields(model = %self.model), level = "debug")]
    pub async fn generate(&self, prompt: &str) -> Result<String, PlacesError> {
        let api_key = self.api_key.as_deref().ok_or(PlacesError::MissingApiKey)?;
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = send_with_retry(&self.retry, || {
            self.client
                .post(&url)
                .query(&[("key", api_key)])
                .json(&body)
                .send()
        })
        .await?;

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| NetworkError::InvalidResponse(e.to_string()))?;

        let Some(candidate) = body.candidates.into_iter().next() else {
            return Err(PlacesError::EmptyResponse("no candidates".to_string()));
        };

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            let reason = candidate
                .finish_reason
                .unwrap_or_else(|| "empty text".to_string());
            return Err(PlacesError::EmptyResponse(reason));
        }

        tracing::debug!("Generated {} bytes of text", text.len());
        Ok(text)
    }
}
