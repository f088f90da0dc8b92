//! Final-answer composition.
//!
//! The second language-model call per question: the engine's filtered rows
//! (and distinct-athlete count, when present) are serialized into a compact
//! textual table and sent with the original question; the model's text is
//! returned verbatim. An empty outcome short-circuits to a canned message
//! without contacting the model — no round trip, and nothing for the model
//! to hallucinate over.

use anyhow::{Context, Result};

use crate::engine::EngineOutput;
use crate::llm::LanguageModel;

/// Canned reply for an empty outcome. Returned without any model call.
pub const NO_RESULTS_MESSAGE: &str =
    "Lo siento, no pude encontrar resultados para esa consulta. Por favor, reformula tu pregunta.";

const DATE_FORMAT: &str = "%d/%m/%Y";

/// Serialize the engine output into the compact context the model receives.
///
/// One semicolon-delimited line per row, mirroring the dataset's own format,
/// with the distinct-athlete count appended for the count actions.
pub fn format_context(output: &EngineOutput) -> String {
    let mut context = String::from("Atleta;Equipo;Prueba;Marca;Ano;Fecha;Puesto;Viento\n");

    for row in &output.rows {
        let placement = row
            .placement
            .map(|p| p.to_string())
            .unwrap_or_default();
        let wind = row.wind.map(|w| w.to_string()).unwrap_or_default();
        context.push_str(&format!(
            "{};{};{};{};{};{};{};{}\n",
            row.athlete,
            row.team,
            row.event,
            row.mark,
            row.year,
            row.date.format(DATE_FORMAT),
            placement,
            wind,
        ));
    }

    if let Some(count) = output.distinct_athletes {
        context.push_str(&format!("Atletas distintos: {}\n", count));
    }

    context
}

fn build_answer_prompt(context: &str, original_question: &str) -> String {
    format!(
        "Basado en los siguientes datos de un ranking de atletismo, genera una respuesta amigable en lenguaje natural para el usuario.\n\nDatos:\n{context}\n\nPregunta original del usuario: \"{original_question}\""
    )
}

/// Compose the final answer for one question.
///
/// Empty outcomes return [`NO_RESULTS_MESSAGE`] directly; otherwise the
/// model's generated text is returned verbatim. Nothing here mutates shared
/// state.
pub async fn compose(
    model: &dyn LanguageModel,
    output: &EngineOutput<'_>,
    original_question: &str,
) -> Result<String> {
    if output.is_empty() {
        return Ok(NO_RESULTS_MESSAGE.to_string());
    }

    let context = format_context(output);
    let prompt = build_answer_prompt(&context, original_question);
    model
        .generate(&prompt)
        .await
        .context("Answer composition call failed")
}
