//! Prompt/response adapter: the four content-generation operations.
//!
//! Each operation builds its prompt from [`crate::prompts`], sends it
//! through the [`TextModel`] seam, and post-processes the response. Only
//! concept extraction parses the response as JSON; the other three return
//! the model's markdown as-is (explanations deliberately keep their
//! embedded ```mermaid``` blocks unvalidated — the frontend renders them,
//! and a broken diagram is a cosmetic problem, not a request failure).

use crate::error::LearnForgeError;
use crate::gemini::TextModel;
use crate::prompts;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, instrument};

// Models wrap JSON answers in ```json fences despite being told not to.
// Same quirk and same fix as stripping ```markdown fences from prose.
static RE_OUTER_FENCES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```(?:json)?\s*\n?(.*?)\n?```\s*$").unwrap());

/// Strip an outer ```json fence if the whole response is wrapped in one.
pub(crate) fn strip_json_fences(input: &str) -> &str {
    match RE_OUTER_FENCES.captures(input.trim()) {
        Some(caps) => caps.get(1).map(|m| m.as_str()).unwrap_or(input),
        None => input.trim(),
    }
}

/// Ask the model for the document's key concepts.
///
/// Expects a JSON array of strings back (possibly fence-wrapped); anything
/// else is a [`LearnForgeError::ConceptParseFailed`].
#[instrument(skip_all)]
pub async fn extract_key_concepts(
    model: &dyn TextModel,
    document_text: &str,
) -> Result<Vec<String>, LearnForgeError> {
    let response = model.generate(&prompts::concepts_prompt(document_text)).await?;
    let cleaned = strip_json_fences(&response);

    let concepts: Vec<String> =
        serde_json::from_str(cleaned).map_err(|e| LearnForgeError::ConceptParseFailed {
            detail: format!("expected a JSON array of strings: {e}"),
        })?;

    if concepts.is_empty() {
        return Err(LearnForgeError::ConceptParseFailed {
            detail: "model returned an empty concept list".into(),
        });
    }

    debug!("Extracted {} concepts", concepts.len());
    Ok(concepts)
}

/// Ask the model for a markdown explanation of `concept`, grounded in the
/// document text, with embedded Mermaid flowcharts.
///
/// Raw text is returned untouched; diagram syntax is not validated.
#[instrument(skip_all, fields(concept = %concept))]
pub async fn generate_explanation(
    model: &dyn TextModel,
    document_text: &str,
    concept: &str,
) -> Result<String, LearnForgeError> {
    model
        .generate(&prompts::explanation_prompt(document_text, concept))
        .await
}

/// Ask the model for a short practice scenario ending in a question.
#[instrument(skip_all, fields(concept = %concept))]
pub async fn generate_scenario(
    model: &dyn TextModel,
    concept: &str,
    explanation: &str,
) -> Result<String, LearnForgeError> {
    let response = model
        .generate(&prompts::scenario_prompt(concept, explanation))
        .await?;
    Ok(response.trim().to_string())
}

/// Ask the model to evaluate a student's answer against the explanation.
#[instrument(skip_all)]
pub async fn evaluate_answer(
    model: &dyn TextModel,
    scenario: &str,
    user_answer: &str,
    explanation: &str,
) -> Result<String, LearnForgeError> {
    let response = model
        .generate(&prompts::feedback_prompt(scenario, user_answer, explanation))
        .await?;
    Ok(response.trim().to_string())
}
