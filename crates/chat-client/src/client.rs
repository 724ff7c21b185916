use async_trait::async_trait;
use tracing::debug;

use crate::config::ChatConfig;
use crate::types::{ChatMessage, ChatRequest, ChatResponse};
use crate::{ChatError, Result};

// ─── ChatClient trait ─────────────────────────────────────────────────────

/// A text-completion capability: system instruction + ordered history in,
/// generated text out.
///
/// Implementations can back this with any chat-completions-shaped endpoint,
/// or with a scripted mock in tests. Returned text is untrusted — callers
/// parse it as structured data only where their own contract promises it.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(&self, system_prompt: &str, history: &[ChatMessage]) -> Result<String>;
}

// ─── OpenAiClient ─────────────────────────────────────────────────────────

/// [`ChatClient`] over an OpenAI-compatible HTTP endpoint.
///
/// One `reqwest::Client` is built per instance with the configured request
/// timeout; an exceeded deadline surfaces as [`ChatError::Timeout`] rather
/// than a generic HTTP error so callers can classify it as transient.
pub struct OpenAiClient {
    config: ChatConfig,
    http: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(config: ChatConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }
}

#[async_trait]
impl ChatClient for OpenAiClient {
    async fn complete(&self, system_prompt: &str, history: &[ChatMessage]) -> Result<String> {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(ChatMessage::system(system_prompt));
        messages.extend_from_slice(history);

        let request = ChatRequest {
            model: &self.config.model,
            messages: &messages,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let url = format!("{}/chat/completions", self.config.base_url);
        debug!(model = %self.config.model, messages = messages.len(), "chat completion request");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.map_err(classify)?;
            return Err(ChatError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await.map_err(classify)?;
        if let Some(usage) = &parsed.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "chat completion response"
            );
        }

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(ChatError::MissingContent)
    }
}

/// The configured deadline can expire during `send()` or while the body is
/// still streaming in; both must surface as [`ChatError::Timeout`].
/// `reqwest::Error::is_timeout` walks the source chain, so it also catches a
/// timeout wrapped in a decode error.
fn classify(e: reqwest::Error) -> ChatError {
    if e.is_timeout() {
        ChatError::Timeout
    } else {
        ChatError::Http(e)
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────
