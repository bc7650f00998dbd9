//! Quiz adapter: explanation text → structured quiz questions.
//!
//! Same prompt-and-parse pattern as concept extraction, but the question
//! objects themselves are passed through to the client unvalidated: the
//! model defines their shape (`question` / `options` / `answer` /
//! `explanation` keys are requested in the prompt), and the frontend is the
//! consumer of that contract, not this service. Validating here would only
//! reject usable content over a missing optional key.

use crate::error::LearnForgeError;
use crate::gemini::TextModel;
use crate::generator::strip_json_fences;
use crate::prompts;
use serde_json::Value;
use tracing::{debug, instrument};

/// Ask the model for quiz questions based on an explanation.
///
/// Accepts either the contracted `{"questions": [...]}` envelope or a bare
/// JSON array (models alternate between the two). Anything else is a
/// [`LearnForgeError::QuizParseFailed`].
#[instrument(skip_all)]
pub async fn generate_quiz_questions(
    model: &dyn TextModel,
    explanation: &str,
) -> Result<Vec<Value>, LearnForgeError> {
    let response = model.generate(&prompts::quiz_prompt(explanation)).await?;
    let cleaned = strip_json_fences(&response);

    let parsed: Value =
        serde_json::from_str(cleaned).map_err(|e| LearnForgeError::QuizParseFailed {
            detail: format!("response was not valid JSON: {e}"),
        })?;

    let questions = match parsed {
        Value::Object(mut map) => match map.remove("questions") {
            Some(Value::Array(items)) => items,
            Some(_) => {
                return Err(LearnForgeError::QuizParseFailed {
                    detail: "\"questions\" was not an array".into(),
                })
            }
            None => {
                return Err(LearnForgeError::QuizParseFailed {
                    detail: "object had no \"questions\" key".into(),
                })
            }
        },
        Value::Array(items) => items,
        _ => {
            return Err(LearnForgeError::QuizParseFailed {
                detail: "expected a JSON object or array".into(),
            })
        }
    };

    if questions.is_empty() {
        return Err(LearnForgeError::QuizParseFailed {
            detail: "model returned no questions".into(),
        });
    }

    debug!("Generated {} quiz questions", questions.len());
    Ok(questions)
}
