// src/services/relay.rs
use tracing::{error, info, warn};

use crate::config::RelayConfig;
use crate::message::ChatReply;
use crate::services::gemini::{GeminiClient, GenerateContentRequest, UpstreamError, extract_reply_text};

/// Returned with a 200 when the upstream answered but not in the expected shape.
pub const INVALID_RESPONSE_FALLBACK: &str = "Maaf, AI gagal menghasilkan respons yang valid.";

/// Stateless bridge between one user prompt and the upstream model.
#[derive(Debug, Clone)]
pub struct Relay {
    system_instruction: String,
    upstream: GeminiClient,
}

impl Relay {
    pub fn new(config: &RelayConfig) -> Self {
        Self {
            system_instruction: config.system_instruction.clone(),
            upstream: GeminiClient::new(config),
        }
    }

    pub async fn diagnose(&self, prompt: &str) -> Result<ChatReply, UpstreamError> {
        let request = GenerateContentRequest::new(prompt, &self.system_instruction);

        let body = self
            .upstream
            .generate_content(&request)
            .await
            .inspect_err(|err| error!(error = %err, "upstream call failed"))?;

        let response = match extract_reply_text(&body) {
            Some(text) => {
                info!(chars = text.chars().count(), "upstream reply extracted");
                text
            }
            None => {
                warn!("upstream reply has no candidates[0].content.parts[0].text, using fallback");
                INVALID_RESPONSE_FALLBACK.to_string()
            }
        };

        Ok(ChatReply { response })
    }
}
