use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },

    /// Deadline exceeded talking to the completion endpoint. Transient —
    /// callers may retry where their own policy allows it.
    #[error("request timed out")]
    Timeout,

    #[error("response contained no choices")]
    MissingContent,

    #[error("OPENAI_API_KEY not set")]
    MissingApiKey,
}
