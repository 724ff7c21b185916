//! Records passed between pipeline steps.
//!
//! The extraction step produces an [`ExtractedRequest`] from untyped model
//! output, so that type carries serde aliases for the Spanish field and
//! category spellings the extraction prompt asks for. Everything downstream
//! is plain typed data.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ExtractedRequest
// ---------------------------------------------------------------------------

/// Problem classification assigned by the extraction model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemCategory {
    AddressChange,
    Refund,
    GeneralInquiry,
    /// Anything the model labels outside the known categories.
    Other,
}

impl<'de> Deserialize<'de> for ProblemCategory {
    // Accepts both the canonical wire names and the Spanish spellings the
    // extraction prompt uses; anything else folds into `Other` rather than
    // failing the whole record.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.as_str() {
            "address_change" | "cambio_direccion" => Self::AddressChange,
            "refund" | "reembolso" => Self::Refund,
            "general_inquiry" | "consulta_general" => Self::GeneralInquiry,
            _ => Self::Other,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    #[serde(alias = "alta")]
    High,
    #[serde(alias = "media")]
    Medium,
    #[serde(alias = "baja")]
    Low,
}

/// Structured fields extracted from one customer message.
///
/// Immutable once produced. `Default` is the empty record — the non-fatal
/// result of unparsable model output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedRequest {
    /// Digits only, e.g. `"12345"` extracted from `"#12345"`.
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default, alias = "problema")]
    pub problem: Option<ProblemCategory>,
    #[serde(default, alias = "nueva_direccion")]
    pub new_address: Option<String>,
    #[serde(default, alias = "urgencia")]
    pub urgency: Option<Urgency>,
    #[serde(default, alias = "cliente_nombre")]
    pub customer_name: Option<String>,
}

// ---------------------------------------------------------------------------
// OrderRecord
// ---------------------------------------------------------------------------

/// Fulfillment state of an order. `Shipped` (and later) forbids address
/// changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

/// A customer purchase, keyed by its order id in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub status: OrderStatus,
    pub customer: String,
    pub email: String,
    pub address: String,
    pub items: Vec<String>,
    pub total: f64,
    pub date: String,
}

// ---------------------------------------------------------------------------
// ActionOutcome
// ---------------------------------------------------------------------------

/// What the run did about the order, decided once per workflow run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionTaken {
    /// The message asked for no address change; the store was not touched.
    NoChangeRequested,
    AddressUpdated,
    /// The store rejected the change. Deliberately non-fatal: the run still
    /// drafts and sends an email describing the rejection.
    UpdateFailed,
}

impl ActionTaken {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoChangeRequested => "no_change_requested",
            Self::AddressUpdated => "address_updated",
            Self::UpdateFailed => "update_failed",
        }
    }
}

/// Result of a conditional address-update attempt against the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UpdateOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub action: ActionTaken,
    /// The store's verdict when an update was attempted; absent when no
    /// change was requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<UpdateOutcome>,
}

// ---------------------------------------------------------------------------
// Execution log
// ---------------------------------------------------------------------------

/// Pipeline steps, in the only order they may execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepName {
    Extraction,
    DatabaseLookup,
    AddressUpdate,
    ResponseDraft,
    EmailSent,
}

impl StepName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Extraction => "extraction",
            Self::DatabaseLookup => "database_lookup",
            Self::AddressUpdate => "address_update",
            Self::ResponseDraft => "response_draft",
            Self::EmailSent => "email_sent",
        }
    }
}

/// One appended entry per executed step. The log is reset at the start of a
/// run and never used for recovery — observability and evaluation only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub step: StepName,
    pub data: serde_json::Value,
}

impl LogEntry {
    pub fn new(step: StepName, data: serde_json::Value) -> Self {
        Self { step, data }
    }
}

// ---------------------------------------------------------------------------
// WorkflowReport
// ---------------------------------------------------------------------------

/// Terminal artifact of one workflow run.
///
/// An aborted run carries only `success: false`, the error text, and the
/// log prefix of the steps that did execute; the optional payload fields are
/// omitted from JSON entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowReport {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_info: Option<ExtractedRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_info: Option<OrderRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions_taken: Option<ActionOutcome>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_sent: Option<String>,
    pub execution_log: Vec<LogEntry>,
}

impl WorkflowReport {
    /// Early-exit report: a strict prefix of the full execution log plus the
    /// reason the run stopped.
    pub fn aborted(error: impl Into<String>, execution_log: Vec<LogEntry>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            extracted_info: None,
            order_info: None,
            actions_taken: None,
            response_sent: None,
            execution_log,
        }
    }

    pub fn completed(
        extracted_info: ExtractedRequest,
        order_info: OrderRecord,
        actions_taken: ActionOutcome,
        response_sent: String,
        execution_log: Vec<LogEntry>,
    ) -> Self {
        Self {
            success: true,
            error: None,
            extracted_info: Some(extracted_info),
            order_info: Some(order_info),
            actions_taken: Some(actions_taken),
            response_sent: Some(response_sent),
            execution_log,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
