// src/services/gemini.rs
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::config::{ApiKey, RelayConfig};

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("transport failure: {0}")]
    Transport(reqwest::Error),

    #[error("upstream returned {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("upstream body is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

// reqwest includes the request URL in its errors, and ours carries the key.
impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        UpstreamError::Transport(err.without_url())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            parts: vec![Part {
                text: Some(text.into()),
            }],
        }
    }
}

/// Body of a `generateContent` call. The REST API expects `system_instruction`
/// in snake_case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub system_instruction: Content,
}

impl GenerateContentRequest {
    pub fn new(prompt: &str, system_instruction: &str) -> Self {
        Self {
            contents: vec![Content::text(prompt)],
            system_instruction: Content::text(system_instruction),
        }
    }
}

#[derive(Deserialize)]
struct ApiErrorEnvelope {
    error: Option<ApiErrorDetail>,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: Option<String>,
}

/// `candidates[0].content.parts[0].text`, or `None` when any step of that path
/// is missing or has the wrong type. Siblings of that path are not inspected.
pub fn extract_reply_text(body: &Value) -> Option<String> {
    body.get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .get(0)?
        .get("text")?
        .as_str()
        .map(str::to_string)
}

fn upstream_error_message(body: &[u8]) -> String {
    serde_json::from_slice::<ApiErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error)
        .and_then(|detail| detail.message)
        .unwrap_or_else(|| "Unknown error".to_string())
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    endpoint: String,
    api_key: ApiKey,
}

impl GeminiClient {
    pub fn new(config: &RelayConfig) -> Self {
        Self {
            client: Client::new(),
            endpoint: config.endpoint_url(),
            api_key: config.api_key.clone(),
        }
    }

    /// Posts the request and returns the decoded 2xx body as-is. Shape checks
    /// are left to the caller.
    pub async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<Value, UpstreamError> {
        debug!(endpoint = %self.endpoint, "sending generateContent request");

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.expose())])
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(UpstreamError::Status {
                status,
                message: upstream_error_message(&body),
            });
        }

        Ok(serde_json::from_slice(&body)?)
    }
}
