//! Error types for the learnforge service.
//!
//! One taxonomy covers the whole request path: upload problems, missing
//! state, and model-call failures. The upstream system this replaces used a
//! string sentinel (any payload starting with `"Error"` meant failure);
//! [`LearnForgeError`] makes the distinction a type instead, and the HTTP
//! layer decides per endpoint which variants are the client's fault (400)
//! and which are ours or the model's (500).

use thiserror::Error;

/// All errors surfaced by the learnforge library.
#[derive(Debug, Error)]
pub enum LearnForgeError {
    // ── Credential / config errors ────────────────────────────────────────
    /// No API key was found in the environment at startup.
    ///
    /// Startup still succeeds without a key; every generation call fails
    /// with this variant instead.
    #[error("GEMINI_API_KEY not found.\nSet it in the environment before calling the model.")]
    MissingApiKey,

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Upload / extraction errors ────────────────────────────────────────
    /// The multipart request did not contain the expected file field.
    #[error("No file field named '{expected}' in the upload request")]
    MissingFileField { expected: &'static str },

    /// The PDF library failed on the uploaded bytes.
    #[error("Could not extract text from PDF: {detail}")]
    ExtractionFailed { detail: String },

    /// Extraction succeeded but produced no text (scanned/image-only PDF).
    #[error("Could not extract text from PDF: document contains no extractable text")]
    EmptyDocument,

    /// A learning-module request arrived before any document was uploaded.
    #[error("Chapter content not found. Please upload a PDF first.")]
    NoDocumentCached,

    // ── Model-call errors ─────────────────────────────────────────────────
    /// Transport-level failure talking to the model API (DNS, TLS, socket).
    #[error("Model API request failed: {detail}")]
    ApiRequestFailed { detail: String },

    /// The model API returned a non-success status that is not retryable.
    #[error("Model API returned HTTP {status}: {body}")]
    ApiStatus { status: u16, body: String },

    /// The call did not complete within the configured per-call timeout.
    #[error("Model API call timed out after {secs}s")]
    ApiTimeout { secs: u64 },

    /// Retryable failures (429/5xx/timeout) persisted through every attempt.
    #[error("Model API still failing after {retries} retries: {detail}")]
    RetriesExhausted { retries: u32, detail: String },

    /// The response body did not have the expected `candidates` shape,
    /// or contained no text.
    #[error("Model returned an unusable response: {detail}")]
    EmptyResponse { detail: String },

    // ── Response-parse errors ─────────────────────────────────────────────
    /// Concept extraction expected a JSON array of strings.
    #[error("Error extracting concepts: {detail}")]
    ConceptParseFailed { detail: String },

    /// Quiz generation expected a JSON object with a `questions` array.
    #[error("Error generating quiz: {detail}")]
    QuizParseFailed { detail: String },
}

impl LearnForgeError {
    /// Whether another attempt against the model API could plausibly succeed.
    ///
    /// Transport errors, timeouts, and 429/5xx statuses are transient under
    /// load; everything else (bad key, malformed prompt, parse failures) is
    /// not worth retrying.
    pub fn is_retryable(&self) -> bool {
        match self {
            LearnForgeError::ApiRequestFailed { .. } | LearnForgeError::ApiTimeout { .. } => true,
            LearnForgeError::ApiStatus { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
