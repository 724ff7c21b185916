use std::time::Duration;

use crate::error::ChatError;

// ─── ChatConfig ───────────────────────────────────────────────────────────

/// Connection and sampling options for [`OpenAiClient`](crate::OpenAiClient).
///
/// The API key is an explicit field — nothing in this crate reads the
/// environment implicitly. Use [`ChatConfig::from_env`] when the ambient
/// `OPENAI_API_KEY` is the desired source.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub api_key: String,
    /// Endpoint root, e.g. `https://api.openai.com/v1`. `/chat/completions`
    /// is appended by the client.
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Deadline for one completion request, mapped to
    /// [`ChatError::Timeout`] when exceeded.
    pub timeout: Duration,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

impl ChatConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_base_url(),
            model: default_model(),
            temperature: 0.7,
            max_tokens: 1000,
            timeout: Duration::from_secs(30),
        }
    }

    /// Build a config from `OPENAI_API_KEY` (required), `MODEL_NAME` and
    /// `OPENAI_BASE_URL` (optional).
    pub fn from_env() -> Result<Self, ChatError> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| ChatError::MissingApiKey)?;
        let mut cfg = Self::new(api_key);
        if let Ok(model) = std::env::var("MODEL_NAME") {
            cfg.model = model;
        }
        if let Ok(url) = std::env::var("OPENAI_BASE_URL") {
            cfg.base_url = url;
        }
        Ok(cfg)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_applies_defaults() {
        let cfg = ChatConfig::new("sk-test");
        assert_eq!(cfg.model, "gpt-4o-mini");
        assert_eq!(cfg.base_url, "https://api.openai.com/v1");
        assert_eq!(cfg.max_tokens, 1000);
        assert!((cfg.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(cfg.timeout, Duration::from_secs(30));
    }

    #[test]
    fn builder_overrides() {
        let cfg = ChatConfig::new("sk-test")
            .with_model("gpt-4o")
            .with_base_url("http://localhost:9999/v1")
            .with_temperature(0.2)
            .with_max_tokens(256)
            .with_timeout(Duration::from_secs(5));
        assert_eq!(cfg.model, "gpt-4o");
        assert_eq!(cfg.base_url, "http://localhost:9999/v1");
        assert!((cfg.temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(cfg.max_tokens, 256);
        assert_eq!(cfg.timeout, Duration::from_secs(5));
    }
}
