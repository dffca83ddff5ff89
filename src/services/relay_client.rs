// src/services/relay_client.rs
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;

use crate::message::{ChatReply, ChatRequest};

/// Anything that goes wrong between the driver and the relay. The detail is
/// for logs only; the user always sees the same message.
#[derive(Debug, Error)]
pub enum ClientFetchFailure {
    #[error("request to relay failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("relay answered with status {0}")]
    Status(StatusCode),

    #[error("relay reply could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}

/// How the chat driver reaches the Relay Endpoint.
#[async_trait]
pub trait RelayTransport: Send + Sync {
    async fn submit(&self, request: &ChatRequest) -> Result<ChatReply, ClientFetchFailure>;
}

#[derive(Debug, Clone)]
pub struct HttpRelayTransport {
    client: Client,
    endpoint: String,
}

impl HttpRelayTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl RelayTransport for HttpRelayTransport {
    async fn submit(&self, request: &ChatRequest) -> Result<ChatReply, ClientFetchFailure> {
        let response = self.client.post(&self.endpoint).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientFetchFailure::Status(status));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
