//! Test doubles shared across the crate's test modules.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chat_client::{ChatClient, ChatError, ChatMessage};

use crate::error::MailError;
use crate::mailer::{DeliveryReceipt, MailSender};

/// ChatClient that pops canned replies in order; errors once exhausted.
pub(crate) struct ScriptedChat {
    replies: Mutex<VecDeque<Result<String, ChatError>>>,
}

impl ScriptedChat {
    pub(crate) fn new(replies: Vec<Result<String, ChatError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
        })
    }

    pub(crate) fn with_texts(texts: &[&str]) -> Arc<Self> {
        Self::new(texts.iter().map(|t| Ok(t.to_string())).collect())
    }
}

#[async_trait]
impl ChatClient for ScriptedChat {
    async fn complete(
        &self,
        _system_prompt: &str,
        _history: &[ChatMessage],
    ) -> chat_client::Result<String> {
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(ChatError::MissingContent))
    }
}

/// Transport that always refuses delivery.
pub(crate) struct FailingMailer;

#[async_trait]
impl MailSender for FailingMailer {
    async fn send(
        &self,
        _to: &str,
        _subject: &str,
        _body: &str,
    ) -> Result<DeliveryReceipt, MailError> {
        Err(MailError::Transport("smtp connection refused".into()))
    }
}
