use thiserror::Error;

/// Failure of the mail transport. The bundled [`StubMailer`] never produces
/// one; the variant exists so real transports have a typed channel.
///
/// [`StubMailer`]: crate::mailer::StubMailer
#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail transport failure: {0}")]
    Transport(String),
}

/// A collaborator failure that aborts a workflow run with an `Err`.
///
/// Business-level aborts (no order id in the message, unknown order) are NOT
/// errors — they come back as a well-formed report with `success: false`.
/// Only transport-level failures from the language model or the mailer
/// surface here.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("language model call failed: {0}")]
    Llm(#[from] chat_client::ChatError),

    #[error(transparent)]
    Mail(#[from] MailError),
}

pub type Result<T> = std::result::Result<T, WorkflowError>;
