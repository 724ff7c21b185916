//! The five-step support workflow.
//!
//! ```text
//! START → EXTRACTED → LOOKED_UP → UPDATE_DECIDED → DRAFTED → SENT
//!             │            │
//!             ▼            ▼
//!          ABORTED      ABORTED
//!      (no order id) (order not found)
//! ```
//!
//! Linear, no loops, no retries, one run at a time. Each executed step
//! appends exactly one [`LogEntry`], so an aborted run's log is a strict
//! prefix of the full five-entry log. The conditional address-update step is
//! skipped silently (no log entry) when the message requested no change.

use std::sync::Arc;

use chat_client::ChatClient;
use serde_json::json;
use tracing::info;

use crate::error::Result;
use crate::extract::ExtractionStep;
use crate::mailer::MailSender;
use crate::respond::{DraftContext, ResponseDraftingStep};
use crate::store::OrderStore;
use crate::types::{ActionOutcome, ActionTaken, LogEntry, StepName, WorkflowReport};

// ─── WorkflowOrchestrator ─────────────────────────────────────────────────

/// Sequences extraction → lookup → conditional update → drafting → send for
/// one customer message at a time.
pub struct WorkflowOrchestrator {
    extractor: ExtractionStep,
    drafter: ResponseDraftingStep,
    store: Arc<dyn OrderStore>,
    mailer: Arc<dyn MailSender>,
}

impl WorkflowOrchestrator {
    pub fn new(
        client: Arc<dyn ChatClient>,
        store: Arc<dyn OrderStore>,
        mailer: Arc<dyn MailSender>,
    ) -> Self {
        Self {
            extractor: ExtractionStep::new(client.clone()),
            drafter: ResponseDraftingStep::new(client),
            store,
            mailer,
        }
    }

    /// Run the full pipeline for one customer message.
    ///
    /// Business-level dead ends (no order id extracted, order not in the
    /// store) return `Ok` with a `success: false` report. Collaborator
    /// transport failures (LLM, mailer) return `Err` — see
    /// [`WorkflowError`](crate::WorkflowError).
    pub async fn execute(&self, customer_message: &str) -> Result<WorkflowReport> {
        let mut log: Vec<LogEntry> = Vec::new();

        // Step 1: extraction
        let extracted = self.extractor.extract(customer_message).await?;
        log.push(LogEntry::new(
            StepName::Extraction,
            serde_json::to_value(&extracted).unwrap_or_default(),
        ));

        let Some(order_id) = extracted.order_id.clone() else {
            info!("aborting run: no order id found in message");
            return Ok(WorkflowReport::aborted(
                "no order id found in message",
                log,
            ));
        };
        info!(%order_id, problem = ?extracted.problem, "extraction complete");

        // Step 2: order lookup
        let order = self.store.get(&order_id).await;
        log.push(LogEntry::new(
            StepName::DatabaseLookup,
            serde_json::to_value(&order).unwrap_or_default(),
        ));

        let Some(mut order) = order else {
            info!(%order_id, "aborting run: order not found");
            return Ok(WorkflowReport::aborted(
                format!("order #{order_id} not found"),
                log,
            ));
        };
        info!(customer = %order.customer, status = order.status.as_str(), "order found");

        // Step 3: conditional address update. A rejected update is recorded
        // and the run continues — the customer still gets an email about it.
        let actions_taken = match &extracted.new_address {
            Some(new_address) => {
                let outcome = self.store.update_address(&order_id, new_address).await;
                log.push(LogEntry::new(
                    StepName::AddressUpdate,
                    serde_json::to_value(&outcome).unwrap_or_default(),
                ));
                let action = if outcome.success {
                    // Keep the report's order view in sync with the store.
                    order.address = new_address.clone();
                    ActionTaken::AddressUpdated
                } else {
                    ActionTaken::UpdateFailed
                };
                info!(action = action.as_str(), "address update attempted");
                ActionOutcome {
                    action,
                    details: Some(outcome),
                }
            }
            None => ActionOutcome {
                action: ActionTaken::NoChangeRequested,
                details: None,
            },
        };

        // Step 4: draft the reply email
        let ctx = DraftContext {
            customer_name: Some(order.customer.clone()),
            action_taken: actions_taken.action,
            order_id: Some(order_id.clone()),
            new_address: extracted.new_address.clone(),
        };
        let body = self.drafter.draft(&ctx).await?;
        log.push(LogEntry::new(
            StepName::ResponseDraft,
            json!({ "body": body }),
        ));

        // Step 5: send it to the address on file
        let subject = format!("Actualización orden #{order_id}");
        let receipt = self.mailer.send(&order.email, &subject, &body).await?;
        log.push(LogEntry::new(
            StepName::EmailSent,
            serde_json::to_value(&receipt).unwrap_or_default(),
        ));
        info!(message_id = %receipt.message_id, "workflow complete");

        Ok(WorkflowReport::completed(
            extracted,
            order,
            actions_taken,
            body,
            log,
        ))
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────
