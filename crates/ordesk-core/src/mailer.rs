//! Mail transport seam and the stub used in demos and tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::MailError;

// ─── MailSender trait ─────────────────────────────────────────────────────

/// Outbound email transport.
#[async_trait]
pub trait MailSender: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str)
        -> Result<DeliveryReceipt, MailError>;
}

/// Acknowledgment returned by a transport on accepted delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryReceipt {
    pub message_id: String,
}

// ─── StubMailer ───────────────────────────────────────────────────────────

/// Transport that logs the email instead of delivering it. Never fails.
pub struct StubMailer;

#[async_trait]
impl MailSender for StubMailer {
    async fn send(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<DeliveryReceipt, MailError> {
        let uuid = Uuid::new_v4().simple().to_string();
        let message_id = format!("MSG-{}", &uuid[..8]);
        info!(%to, %subject, %message_id, body_chars = body.len(), "email sent (stub)");
        Ok(DeliveryReceipt { message_id })
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stub_mailer_returns_receipt() {
        let receipt = StubMailer
            .send("juan@example.com", "Actualización orden #12345", "hola")
            .await
            .unwrap();
        assert!(receipt.message_id.starts_with("MSG-"));
        assert_eq!(receipt.message_id.len(), "MSG-".len() + 8);
    }

    #[tokio::test]
    async fn stub_mailer_ids_are_unique() {
        let a = StubMailer.send("a@x", "s", "b").await.unwrap();
        let b = StubMailer.send("a@x", "s", "b").await.unwrap();
        assert_ne!(a.message_id, b.message_id);
    }
}
