//! Response-drafting step: action context → customer-facing email text.
//!
//! The step returns the generated text verbatim. Length and structure policy
//! lives in the instruction only — nothing here validates the email, which
//! is a deliberately weak contract.

use std::fmt::Write as _;
use std::sync::Arc;

use chat_client::{ChatClient, ChatMessage};
use tracing::debug;

use crate::types::ActionTaken;

const DRAFTING_PROMPT: &str = r#"Eres un experto en comunicación profesional y servicio al cliente.

TU ÚNICA TAREA: Redactar emails de respuesta a clientes.

DIRECTRICES DE REDACCIÓN:
1. Saludo personalizado usando nombre del cliente
2. Confirmar específicamente la acción realizada
3. Dar próximos pasos claros (qué esperar, cuándo)
4. Despedida amigable con firma

TONO Y ESTILO:
- Profesional pero cercano
- Empático y servicial
- Sin jerga técnica
- Máximo 150 palabras

ESTRUCTURA REQUERIDA:
Estimado/a [Nombre],

[Confirmar acción realizada con detalles específicos]

[Próximos pasos o información adicional]

[Despedida + Firma]"#;

// ─── DraftContext ─────────────────────────────────────────────────────────

/// Everything the drafting model is told about the run.
#[derive(Debug, Clone)]
pub struct DraftContext {
    pub customer_name: Option<String>,
    pub action_taken: ActionTaken,
    pub order_id: Option<String>,
    pub new_address: Option<String>,
}

impl DraftContext {
    /// The user-turn prompt, with fixed fallback text for absent fields.
    fn render(&self) -> String {
        let mut prompt = String::from("Genera email de confirmación con esta información:\n\n");
        let _ = writeln!(
            prompt,
            "Cliente: {}",
            self.customer_name.as_deref().unwrap_or("Estimado cliente")
        );
        let _ = writeln!(
            prompt,
            "Orden: #{}",
            self.order_id.as_deref().unwrap_or("N/A")
        );
        let _ = writeln!(prompt, "Acción realizada: {}", self.action_taken.as_str());
        let _ = writeln!(
            prompt,
            "Nueva dirección: {}",
            self.new_address.as_deref().unwrap_or("N/A")
        );
        prompt.push_str("\nRedacta el email completo siguiendo las directrices.");
        prompt
    }
}

// ─── ResponseDraftingStep ─────────────────────────────────────────────────

pub struct ResponseDraftingStep {
    client: Arc<dyn ChatClient>,
}

impl ResponseDraftingStep {
    pub fn new(client: Arc<dyn ChatClient>) -> Self {
        Self { client }
    }

    /// Draft the customer email for one completed (or partially completed)
    /// run. Returns raw model text; transport failures propagate.
    pub async fn draft(&self, ctx: &DraftContext) -> chat_client::Result<String> {
        let body = self
            .client
            .complete(DRAFTING_PROMPT, &[ChatMessage::user(ctx.render())])
            .await?;
        debug!(chars = body.len(), "email drafted");
        Ok(body)
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────
