//! Prompt templates for every model call the service makes.
//!
//! Centralising the prompts here serves two purposes:
//!
//! 1. **Single source of truth** — changing the pedagogy (tone, diagram
//!    count, target grade level) requires editing exactly one place.
//!
//! 2. **Testability** — unit tests can inspect the built prompts directly
//!    without calling a real model, so prompt regressions are cheap to catch.
//!
//! Each builder truncates its context to a per-operation character cap to
//! bound request size. The caps differ by operation because the operations
//! need different amounts of grounding: concept extraction reads the whole
//! chapter, a scenario only needs a sketch of it.

/// Context cap for concept extraction (whole-chapter read).
pub const CONCEPTS_CONTEXT_CAP: usize = 15_000;

/// Context cap for explanation generation.
pub const EXPLANATION_CONTEXT_CAP: usize = 12_000;

/// Context cap for scenario generation (a sketch is enough).
pub const SCENARIO_CONTEXT_CAP: usize = 2_000;

/// Context cap for answer evaluation.
pub const FEEDBACK_CONTEXT_CAP: usize = 4_000;

/// First `cap` characters of `text`, never splitting a UTF-8 code point.
///
/// The cap is in characters, not bytes, so multi-byte scripts are not
/// penalised relative to ASCII.
pub fn truncate_chars(text: &str, cap: usize) -> &str {
    match text.char_indices().nth(cap) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Prompt asking for the chapter's key concepts as a JSON array of strings.
pub fn concepts_prompt(document_text: &str) -> String {
    format!(
        "Read the following text and identify the main learning concepts. \
         Return as a JSON list of strings. Text: \"{}\"",
        truncate_chars(document_text, CONCEPTS_CONTEXT_CAP)
    )
}

/// Prompt asking for a markdown explanation with embedded Mermaid flowcharts.
pub fn explanation_prompt(document_text: &str, concept: &str) -> String {
    format!(
        r#"Act as an expert science teacher. For the concept "{concept}", write a detailed explanation.
- Use markdown for headings, bold text, and bullet points.
- Break the explanation into multiple paragraphs.
- Integrate 2-3 simple Mermaid.js flowcharts (`graph TD`) directly within the explanation.
  - Each diagram must be enclosed in ```mermaid ... ``` blocks.
  - Place them at logical points where a visual would be most helpful.

Context: "{context}""#,
        concept = concept,
        context = truncate_chars(document_text, EXPLANATION_CONTEXT_CAP),
    )
}

/// Prompt asking for a short real-world scenario that ends in a question.
pub fn scenario_prompt(concept: &str, explanation: &str) -> String {
    format!(
        r#"Based on the concept of "{concept}", create a short, practical, real-world scenario problem for a 10th-grade student.
The scenario should end with a question.
Return only the scenario and the question.

Context: "{context}""#,
        concept = concept,
        context = truncate_chars(explanation, SCENARIO_CONTEXT_CAP),
    )
}

/// Prompt asking for markdown feedback on a student's answer.
pub fn feedback_prompt(scenario: &str, user_answer: &str, explanation: &str) -> String {
    format!(
        r####"A student was given the scenario: "{scenario}"
The student answered: "{user_answer}"
Evaluate the student's answer based on the correct scientific principles from the context below.
- Start with "### Feedback:"
- State if their reasoning is correct, partially correct, or incorrect.
- Provide a simple, encouraging explanation of the correct answer.
- Use markdown for formatting.

Correct Context: "{context}""####,
        scenario = scenario,
        user_answer = user_answer,
        context = truncate_chars(explanation, FEEDBACK_CONTEXT_CAP),
    )
}

/// Prompt asking for multiple-choice quiz questions as a JSON object.
///
/// The response contract is `{"questions": [...]}` where each question is an
/// object with `question`, `options` (four strings), `answer`, and
/// `explanation` keys. The service passes the objects through to the client
/// unvalidated, so the exact shape remains a model-side contract.
pub fn quiz_prompt(explanation: &str) -> String {
    format!(
        r#"Based on the explanation below, create 3 multiple-choice quiz questions for a 10th-grade student.
Return ONLY a JSON object of the form:
{{"questions": [{{"question": "...", "options": ["...", "...", "...", "..."], "answer": "...", "explanation": "..."}}]}}
- "options" must contain exactly 4 choices.
- "answer" must be the exact text of the correct option.
- Do not include any text outside the JSON object.

Explanation: "{context}""#,
        context = truncate_chars(explanation, FEEDBACK_CONTEXT_CAP),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_char_boundaries() {
        // 'é' is two bytes; a byte-based slice at 3 would panic.
        let s = "ééééé";
        assert_eq!(truncate_chars(s, 3), "ééé");
        assert_eq!(truncate_chars(s, 10), s);
        assert_eq!(truncate_chars("", 5), "");
    }

    #[test]
    fn concepts_prompt_caps_context() {
        let long = "x".repeat(CONCEPTS_CONTEXT_CAP + 500);
        let prompt = concepts_prompt(&long);
        // Prompt scaffolding plus at most the cap of context.
        assert!(prompt.len() < CONCEPTS_CONTEXT_CAP + 200);
        assert!(prompt.contains("JSON list of strings"));
    }

    #[test]
    fn explanation_prompt_embeds_concept_and_asks_for_mermaid() {
        let p = explanation_prompt("the water cycle", "Newton's laws describe motion.");
        assert!(p.contains("the water cycle"));
        assert!(p.contains("```mermaid"));
        assert!(p.contains("graph TD"));
    }

    #[test]
    fn scenario_prompt_uses_smaller_cap() {
        let long = "y".repeat(SCENARIO_CONTEXT_CAP + 500);
        let p = scenario_prompt("gravity", &long);
        assert!(p.len() < SCENARIO_CONTEXT_CAP + 400);
        assert!(p.contains("end with a question"));
    }

    #[test]
    fn feedback_prompt_embeds_all_three_inputs() {
        let p = feedback_prompt("a ball rolls", "it accelerates", "context text");
        assert!(p.contains("a ball rolls"));
        assert!(p.contains("it accelerates"));
        assert!(p.contains("context text"));
        assert!(p.contains("### Feedback:"));
    }

    #[test]
    fn quiz_prompt_specifies_json_contract() {
        let p = quiz_prompt("Photosynthesis converts light to chemical energy.");
        assert!(p.contains(r#""questions""#));
        assert!(p.contains("4 choices"));
    }
}
