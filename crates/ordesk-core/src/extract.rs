//! Extraction step: free-text customer message → [`ExtractedRequest`].
//!
//! Malformed model output is not a fatal error — it degrades to the empty
//! record, which downstream logic treats as "no information extracted".
//! Transport failures from the client do propagate.

use std::sync::{Arc, OnceLock};

use chat_client::{ChatClient, ChatMessage};
use regex::Regex;
use tracing::{debug, warn};

use crate::types::ExtractedRequest;

/// System instruction for the extraction model. Demands a bare JSON object
/// with the field names [`ExtractedRequest`] aliases.
const EXTRACTION_PROMPT: &str = r##"Eres un experto en análisis de texto y extracción de información.

TU ÚNICA TAREA: Extraer información clave de consultas de clientes.

CAMPOS A EXTRAER:
- order_id: ID de orden (formato #XXXXX, solo números)
- problema: tipo de problema (cambio_direccion, reembolso, consulta_general, otro)
- nueva_direccion: dirección completa si se menciona cambio (null si no aplica)
- urgencia: nivel (alta, media, baja) basado en palabras como "urgente", "rápido", "cuando puedan"
- cliente_nombre: nombre del cliente si se menciona (null si no)

REGLAS CRÍTICAS:
1. Responde SOLO con JSON válido, sin texto adicional
2. Si un campo no está en el mensaje, usa null
3. Para order_id, extrae solo números (ej: "#12345" → "12345")
4. Para problema, usa exactamente las categorías definidas

EJEMPLO:
Entrada: "Hola soy María, necesito urgente cambiar dirección de orden #67890 a Calle Nueva 123"
Salida:
{
  "order_id": "67890",
  "problema": "cambio_direccion",
  "nueva_direccion": "Calle Nueva 123",
  "urgencia": "alta",
  "cliente_nombre": "María"
}"##;

// ─── ExtractionStep ───────────────────────────────────────────────────────

pub struct ExtractionStep {
    client: Arc<dyn ChatClient>,
}

impl ExtractionStep {
    pub fn new(client: Arc<dyn ChatClient>) -> Self {
        Self { client }
    }

    /// Extract structured fields from one customer message.
    ///
    /// Returns the empty record when the model reply is not valid JSON;
    /// returns `Err` only on transport failure. No retry either way.
    pub async fn extract(&self, message: &str) -> chat_client::Result<ExtractedRequest> {
        let reply = self
            .client
            .complete(EXTRACTION_PROMPT, &[ChatMessage::user(message)])
            .await?;
        Ok(parse_reply(&reply))
    }
}

// ─── Reply parsing ────────────────────────────────────────────────────────

fn parse_reply(reply: &str) -> ExtractedRequest {
    let body = strip_code_fence(reply);
    match serde_json::from_str::<ExtractedRequest>(body) {
        Ok(mut extracted) => {
            extracted.order_id = extracted.order_id.as_deref().and_then(normalize_order_id);
            debug!(?extracted, "extraction parsed");
            extracted
        }
        Err(err) => {
            warn!(%err, reply = %truncate(reply, 200), "extraction reply was not valid JSON");
            ExtractedRequest::default()
        }
    }
}

/// Models occasionally wrap the JSON in a ```json fence despite the
/// instruction. Tolerate it.
fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.trim_end();
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Keep only the digits of whatever the model put in `order_id`
/// ("#12345" → "12345"). Returns `None` when nothing numeric remains.
fn normalize_order_id(raw: &str) -> Option<String> {
    static DIGITS: OnceLock<Regex> = OnceLock::new();
    let re = DIGITS.get_or_init(|| Regex::new(r"\d+").expect("static regex"));
    let id: String = re.find_iter(raw).map(|m| m.as_str()).collect();
    (!id.is_empty()).then_some(id)
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────
