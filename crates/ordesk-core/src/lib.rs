//! `ordesk-core` — domain model and workflow orchestration for the ordesk
//! customer-support pipeline.
//!
//! One customer message = one synchronous run of a five-step pipeline:
//!
//! ```text
//! message ──▶ ExtractionStep ──▶ OrderStore.get ──▶ update_address?
//!                                                        │
//!             MailSender.send ◀── ResponseDraftingStep ◀─┘
//! ```
//!
//! The orchestrator keeps an append-only execution log mirroring the steps
//! actually run; the [`eval`] module scores fixed scenarios against the
//! resulting [`WorkflowReport`]s.

pub mod error;
pub mod eval;
pub mod extract;
pub mod mailer;
pub mod respond;
pub mod store;
pub mod types;
pub mod workflow;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{MailError, Result, WorkflowError};
pub use eval::{EvalReport, Evaluator, Scenario, ScenarioResult};
pub use extract::ExtractionStep;
pub use mailer::{DeliveryReceipt, MailSender, StubMailer};
pub use respond::{DraftContext, ResponseDraftingStep};
pub use store::{InMemoryOrderStore, OrderStore};
pub use types::{
    ActionOutcome, ActionTaken, ExtractedRequest, LogEntry, OrderRecord, OrderStatus,
    ProblemCategory, StepName, UpdateOutcome, Urgency, WorkflowReport,
};
pub use workflow::WorkflowOrchestrator;
