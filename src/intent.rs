//! Query-intent extraction.
//!
//! The first of the two language-model calls per question: the normalized
//! question is sent together with a fixed schema description and worked
//! examples, and the reply is parsed as a JSON [`QueryIntent`]. Models tend
//! to wrap JSON in Markdown code fences, so the payload is unfenced before
//! parsing. A malformed payload or a failed call surfaces as a single error
//! to the question handler — it never poisons the table or later questions.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

use crate::llm::LanguageModel;

/// Action requested by the user, as emitted by the model.
///
/// Only the two count actions have dedicated engine paths; everything else
/// (including unknown labels) dispatches to the default search path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum Action {
    #[default]
    #[serde(rename = "buscar")]
    Search,
    #[serde(rename = "comparar")]
    Compare,
    #[serde(rename = "mejor_marca")]
    BestMark,
    #[serde(rename = "contar_atletas_por_prueba_y_ano")]
    CountByEventAndYear,
    #[serde(rename = "contar_atletas_por_marca")]
    CountByMark,
    #[serde(other)]
    Unknown,
}

/// Structured filter parameters extracted from one question.
///
/// Every field is optional: absence means "do not filter on this
/// dimension". The wire keys are the Spanish names the model is instructed
/// to emit. The year fields stay as raw JSON values because the model mixes
/// numbers and numeric strings; the engine coerces them and ignores
/// non-numeric values with a warning.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryIntent {
    #[serde(rename = "atleta")]
    pub athlete: Option<String>,
    #[serde(rename = "prueba")]
    pub event: Option<String>,
    #[serde(rename = "viento")]
    pub wind: Option<f64>,
    #[serde(rename = "puesto_competicion")]
    pub placement: Option<i64>,
    #[serde(rename = "ano")]
    pub year: Option<Value>,
    #[serde(rename = "rango_anos")]
    pub year_range: Option<Value>,
    #[serde(rename = "equipo")]
    pub team: Option<String>,
    #[serde(rename = "ordenar_por")]
    pub sort_by: Option<String>,
    #[serde(rename = "marca_limite")]
    pub mark_limit: Option<f64>,
    #[serde(rename = "accion", default)]
    pub action: Action,
}

/// Fixed instruction sent with every question: the field schema plus worked
/// examples, in the wording the dataset's users phrase questions in.
const SCHEMA_INSTRUCTIONS: &str = r#"Eres un asistente experto en atletismo. Tu tarea es extraer la intencion del usuario y los parametros relevantes de su consulta.
Solo responde con un objeto JSON.

Parametros a extraer (si se encuentran):
- "atleta": Nombre del atleta.
- "prueba": Nombre de la prueba.
- "viento": Viento de la prueba.
- "puesto_competicion": Puesto del atleta en la competicion.
- "ano": Año especifico.
- "rango_anos": Un numero que representa los ultimos X años.
- "equipo": Nombre del equipo.
- "ordenar_por": El campo por el cual ordenar ("fecha", "marca", etc.).
- "marca_limite": Una marca de tiempo en segundos para hacer comparaciones.
- "accion": La accion que el usuario quiere realizar. (ej. "buscar", "comparar", "mejor_marca", "contar_atletas_por_prueba_y_ano", "contar_atletas_por_marca")

Ejemplo de salida para "cuantos atletas han corrido el 100m en 2024?":
{"prueba": "100m", "ano": 2024, "accion": "contar_atletas_por_prueba_y_ano"}

Ejemplo de salida para "cuantos atletas han corrido por debajo de 11.50 segundos en 100 metros lisos en 2024?":
{"prueba": "100 metros lisos", "marca_limite": 11.50, "ano": 2024, "accion": "contar_atletas_por_marca"}

Ejemplo de salida para "dime la mejor marca de Kevin Viñuela en los 200 metros lisos":
{"atleta": "Kevin Viñuela", "prueba": "200 M.L. MASCULINO", "accion": "mejor_marca"}

Ejemplo de salida para "resultados de Jose Perez en el 100 metros de los ultimos 5 años ordenados por fecha":
{"atleta": "Jose Perez", "prueba": "100 metros lisos", "rango_anos": 5, "ordenar_por": "fecha"}"#;

/// Build the full extraction prompt for one (already normalized) question.
pub fn build_extraction_prompt(normalized_question: &str) -> String {
    format!(
        "{SCHEMA_INSTRUCTIONS}\n\nConsulta del usuario: \"{normalized_question}\""
    )
}

/// Strip surrounding Markdown code-fence markup from a model reply.
///
/// Handles ```` ```json … ``` ````, plain ```` ``` … ``` ````, and replies
/// with no fence at all. Only surrounding fences are removed; the payload
/// itself is untouched.
pub fn strip_code_fences(text: &str) -> &str {
    let mut text = text.trim();

    if let Some(rest) = text.strip_prefix("```") {
        // Drop the info string ("json") up to the first newline
        text = match rest.split_once('\n') {
            Some((_, body)) => body,
            None => rest.strip_prefix("json").unwrap_or(rest),
        };
    }
    if let Some(rest) = text.trim_end().strip_suffix("```") {
        text = rest;
    }

    text.trim()
}

/// Parse a model reply into a [`QueryIntent`].
pub fn parse_intent_payload(payload: &str) -> Result<QueryIntent> {
    let unfenced = strip_code_fences(payload);
    serde_json::from_str(unfenced)
        .with_context(|| format!("Malformed intent payload from model: {}", unfenced))
}

/// Extract the structured intent for one normalized question.
///
/// Transport failures and malformed payloads both surface here as the single
/// "request failed" condition the question handler reports to the user.
pub async fn extract_intent(
    model: &dyn LanguageModel,
    normalized_question: &str,
) -> Result<QueryIntent> {
    let prompt = build_extraction_prompt(normalized_question);
    let reply = model
        .generate(&prompt)
        .await
        .context("Intent extraction call failed")?;
    parse_intent_payload(&reply)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_payload() {
        let intent = parse_intent_payload(
            r#"{"atleta": "Jose Perez", "prueba": "100 metros lisos", "rango_anos": 5, "ordenar_por": "fecha"}"#,
        )
        .unwrap();

        assert_eq!(intent.athlete.as_deref(), Some("Jose Perez"));
        assert_eq!(intent.event.as_deref(), Some("100 metros lisos"));
        assert_eq!(intent.year_range, Some(serde_json::json!(5)));
        assert_eq!(intent.sort_by.as_deref(), Some("fecha"));
        assert_eq!(intent.action, Action::Search);
    }

    #[test]
    fn test_parse_fenced_payload() {
        let payload = "```json\n{\"prueba\": \"100m\", \"ano\": 2024, \"accion\": \"contar_atletas_por_prueba_y_ano\"}\n```";
        let intent = parse_intent_payload(payload).unwrap();

        assert_eq!(intent.event.as_deref(), Some("100m"));
        assert_eq!(intent.action, Action::CountByEventAndYear);
    }

    #[test]
    fn test_parse_fence_without_language_tag() {
        let payload = "```\n{\"accion\": \"contar_atletas_por_marca\", \"prueba\": \"100m\", \"marca_limite\": 11.5}\n```";
        let intent = parse_intent_payload(payload).unwrap();

        assert_eq!(intent.action, Action::CountByMark);
        assert_eq!(intent.mark_limit, Some(11.5));
    }

    #[test]
    fn test_unknown_action_falls_back() {
        let intent = parse_intent_payload(r#"{"accion": "resumir"}"#).unwrap();
        assert_eq!(intent.action, Action::Unknown);
    }

    #[test]
    fn test_missing_action_defaults_to_search() {
        let intent = parse_intent_payload(r#"{"atleta": "Jose"}"#).unwrap();
        assert_eq!(intent.action, Action::Search);
    }

    #[test]
    fn test_year_accepts_string_or_number() {
        let intent = parse_intent_payload(r#"{"ano": "2024"}"#).unwrap();
        assert_eq!(intent.year, Some(serde_json::json!("2024")));

        let intent = parse_intent_payload(r#"{"ano": 2024}"#).unwrap();
        assert_eq!(intent.year, Some(serde_json::json!(2024)));
    }

    #[test]
    fn test_malformed_payload_is_error() {
        let err = parse_intent_payload("this is not json").unwrap_err();
        assert!(err.to_string().contains("Malformed intent payload"));
    }

    #[test]
    fn test_strip_code_fences_variants() {
        assert_eq!(strip_code_fences("{\"a\": 1}"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("```\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("  ```json\n{\"a\": 1}\n```  "), "{\"a\": 1}");
    }

    #[test]
    fn test_prompt_contains_schema_and_question() {
        let prompt = build_extraction_prompt("mejor marca de kevin viñuela en 200m");
        assert!(prompt.contains("\"accion\""));
        assert!(prompt.contains("mejor marca de kevin viñuela en 200m"));
    }
}
