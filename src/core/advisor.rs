use crate::core::{AnalysisResult, CompletionRequest, CompletionService, Ticket, TicketSummary};
use crate::utils::error::{Result, ServiceError};
use serde_json::json;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Tickets included in a report prompt.
pub const REPORT_TICKET_LIMIT: usize = 50;

/// Shown to the user when the report summary cannot be generated.
pub const REPORT_FALLBACK: &str = "No se pudo generar el resumen inteligente en este momento.";

pub fn issue_prompt(model: &str, description: &str) -> String {
    format!(
        "Actúa como un técnico experto en reparación de celulares.\n\
         Analiza el siguiente problema para un dispositivo \"{model}\".\n\
         Descripción del problema: \"{description}\".\n\
         \n\
         Proporciona una respuesta estructurada en JSON con:\n\
         1. Categoría del problema (ej. Pantalla, Batería, Software, Placa).\n\
         2. Precio estimado en USD (solo el número).\n\
         3. Tiempo estimado de reparación (texto breve).\n\
         4. Lista de exactamente 3 acciones sugeridas o piezas a revisar.\n"
    )
}

pub fn analysis_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "category": { "type": "STRING" },
            "estimatedPrice": { "type": "NUMBER" },
            "estimatedTime": { "type": "STRING" },
            "suggestedActions": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "minItems": 3,
                "maxItems": 3
            }
        },
        "required": ["category", "estimatedPrice", "estimatedTime", "suggestedActions"],
        "propertyOrdering": ["category", "estimatedPrice", "estimatedTime", "suggestedActions"]
    })
}

/// 取集合前 50 筆（集合為新到舊排序）
pub fn summary_projection(tickets: &[Ticket]) -> Vec<TicketSummary> {
    tickets
        .iter()
        .take(REPORT_TICKET_LIMIT)
        .map(TicketSummary::from)
        .collect()
}

pub fn report_prompt(tickets: &[Ticket]) -> Result<String> {
    let recent = serde_json::to_string(&summary_projection(tickets))?;
    Ok(format!(
        "Analiza estos datos recientes de reparaciones en el taller:\n\
         {recent}\n\
         \n\
         Genera un resumen ejecutivo breve (máximo 1 párrafo) sobre tendencias, \
         problemas más comunes esta semana y rendimiento general. Sé profesional y directo."
    ))
}

/// Models sometimes wrap JSON in a markdown fence even in schema mode.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = rest.strip_prefix("json").unwrap_or(rest);
    body.strip_suffix("```").unwrap_or(body).trim()
}

pub fn parse_analysis(text: &str) -> std::result::Result<AnalysisResult, ServiceError> {
    let body = strip_code_fence(text);
    if body.is_empty() {
        return Err(ServiceError::EmptyResponse);
    }
    serde_json::from_str(body).map_err(|e| ServiceError::Malformed(e.to_string()))
}

pub struct AdvisoryClient<C: CompletionService> {
    service: C,
    model: String,
}

impl<C: CompletionService> AdvisoryClient<C> {
    pub fn new(service: C, model: impl Into<String>) -> Self {
        Self {
            service,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn analyze_issue(
        &self,
        device_model: &str,
        description: &str,
    ) -> std::result::Result<AnalysisResult, ServiceError> {
        let request = CompletionRequest {
            model: self.model.clone(),
            prompt: issue_prompt(device_model, description),
            response_schema: Some(analysis_schema()),
        };

        tracing::debug!("Requesting issue analysis for {}", device_model);
        let outcome = match self.service.generate(request).await {
            Ok(text) => parse_analysis(&text),
            Err(e) => Err(e),
        };

        match &outcome {
            Ok(result) => {
                if result.suggested_actions.len() != 3 {
                    tracing::warn!(
                        "AI returned {} suggested actions instead of 3",
                        result.suggested_actions.len()
                    );
                }
                tracing::info!("🔧 Issue classified as {}", result.category);
            }
            Err(e) => tracing::error!(
                transient = e.is_transient(),
                "❌ Error analyzing issue with AI service: {}",
                e
            ),
        }
        outcome
    }

    pub async fn try_summarize_report(
        &self,
        tickets: &[Ticket],
    ) -> std::result::Result<String, ServiceError> {
        let prompt =
            report_prompt(tickets).map_err(|e| ServiceError::Malformed(e.to_string()))?;
        let request = CompletionRequest {
            model: self.model.clone(),
            prompt,
            response_schema: None,
        };

        tracing::debug!(
            "Requesting report summary for {} of {} tickets",
            tickets.len().min(REPORT_TICKET_LIMIT),
            tickets.len()
        );
        let text = self.service.generate(request).await?;
        let text = text.trim();
        if text.is_empty() {
            return Err(ServiceError::EmptyResponse);
        }
        Ok(text.to_string())
    }

    /// Always returns displayable text; failures fall back to [`REPORT_FALLBACK`].
    pub async fn summarize_report(&self, tickets: &[Ticket]) -> String {
        match self.try_summarize_report(tickets).await {
            Ok(summary) => summary,
            Err(e) => {
                tracing::error!(
                    transient = e.is_transient(),
                    "❌ Error generating report with AI service: {}",
                    e
                );
                REPORT_FALLBACK.to_string()
            }
        }
    }
}
