// src/config.rs
use std::{env, fmt};

use thiserror::Error;

pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_PORT: u16 = 3000;

/// Persona every upstream request carries. Users never see or edit it.
pub const SYSTEM_INSTRUCTION: &str = "Anda adalah Asisten AI bernama Priono Teknik AC, seorang teknisi AC profesional, ramah, dan sangat berpengalaman. Tugas Anda adalah:
1. Mendiagnosis masalah AC (Pendingin Udara) yang dijelaskan oleh pengguna.
2. Memberikan jawaban yang ringkas, mudah dipahami, dan profesional.
3. Selalu mengakhiri setiap balasan Anda dengan ajakan bertindak (Call-to-Action) yang mengarahkan pengguna untuk memesan layanan perbaikan atau perawatan dari perusahaan jasa AC Anda.
4. Contoh CTA: \"Kami siap membantu! Segera hubungi tim teknisi profesional Priono Teknik AC di 0881010050528 untuk mendapatkan solusi cepat dan terjamin.\"
5. Jangan pernah menjawab pertanyaan di luar diagnosis AC.";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("GOOGLE_API_KEY is not set")]
    MissingApiKey,

    #[error("PORT must be a valid port number, got {0:?}")]
    InvalidPort(String),
}

/// Upstream secret. Formatting never reveals the value.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub system_instruction: String,
    pub api_base: String,
    pub model: String,
    pub api_key: ApiKey,
}

impl RelayConfig {
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let key = env::var(API_KEY_ENV).unwrap_or_default();
        Self::from_key(&key)
    }

    fn from_key(key: &str) -> Result<Self, ConfigError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        Ok(Self::new(ApiKey::new(key)))
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// `generateContent` URL without the key; the key travels as a query parameter.
    pub fn endpoint_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            self.model
        )
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match env::var("PORT") {
            Ok(value) => parse_port(&value)?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Self {
            host: "0.0.0.0".to_string(),
            port,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_port(value: &str) -> Result<u16, ConfigError> {
    value
        .trim()
        .parse::<u16>()
        .map_err(|_| ConfigError::InvalidPort(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_url_joins_base_and_model() {
        let config = RelayConfig::new(ApiKey::new("k")).with_api_base("http://localhost:9000/v1beta/");
        assert_eq!(
            config.endpoint_url(),
            "http://localhost:9000/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn default_endpoint_targets_gemini_flash() {
        let config = RelayConfig::new(ApiKey::new("k"));
        assert_eq!(
            config.endpoint_url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn blank_key_is_rejected() {
        assert!(matches!(RelayConfig::from_key("   "), Err(ConfigError::MissingApiKey)));
        assert!(RelayConfig::from_key("abc").is_ok());
    }

    #[test]
    fn api_key_is_redacted() {
        let config = RelayConfig::new(ApiKey::new("super-secret"));
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert_eq!(config.api_key.to_string(), "<redacted>");
        assert_eq!(config.api_key.expose(), "super-secret");
    }

    #[test]
    fn port_parsing() {
        assert_eq!(parse_port("8080").unwrap(), 8080);
        assert!(matches!(parse_port("eighty"), Err(ConfigError::InvalidPort(_))));
    }
}
