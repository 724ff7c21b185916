//! `chat-client` — typed client for OpenAI-compatible chat-completions
//! endpoints.
//!
//! # Architecture
//!
//! ```text
//! ChatConfig          ← model, temperature, max_tokens, timeout, api key
//!     │
//!     ▼
//! OpenAiClient        ← POST {base_url}/chat/completions, bearer auth
//!     │
//!     ▼
//! impl ChatClient     ← async trait seam; mockable in tests
//! ```
//!
//! # Quick start
//!
//! ```rust,ignore
//! use chat_client::{ChatClient, ChatConfig, ChatMessage, OpenAiClient};
//!
//! let client = OpenAiClient::new(ChatConfig::from_env()?)?;
//! let text = client
//!     .complete("Eres un asistente.", &[ChatMessage::user("hola")])
//!     .await?;
//! println!("{text}");
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use client::{ChatClient, OpenAiClient};
pub use config::ChatConfig;
pub use error::ChatError;
pub use types::{ChatMessage, Role, TokenUsage};

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, ChatError>;
