//! Gemini REST client and the [`TextModel`] seam.
//!
//! Every adapter in this crate talks to the model through the [`TextModel`]
//! trait, not through a concrete client. That keeps prompt/parse logic
//! testable with a scripted stub and leaves exactly one place — this module
//! — that knows the wire format of the Generative Language API.
//!
//! ## Retry Strategy
//!
//! HTTP 429 / 5xx from the API are transient and frequent under load.
//! Exponential backoff (`retry_backoff_ms * 2^attempt`) avoids the
//! thundering-herd problem: with 500 ms base and 3 retries the wait
//! sequence is 500 ms → 1 s → 2 s, under 4 s of back-off per call.
//! Non-retryable failures (missing key, other 4xx, unparseable body)
//! surface immediately.

use crate::config::ServiceConfig;
use crate::error::LearnForgeError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, warn};

/// A text-in, text-out generative model.
///
/// The single production implementation is [`GeminiModel`]; tests substitute
/// a stub that replays scripted responses.
#[async_trait]
pub trait TextModel: Send + Sync {
    /// Send one prompt and return the model's raw text response.
    async fn generate(&self, prompt: &str) -> Result<String, LearnForgeError>;
}

// ── Wire types (Generative Language API v1beta) ──────────────────────────────

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: usize,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

/// Pull the first candidate's text out of a decoded response.
///
/// The API can return zero candidates (safety block) or a candidate with no
/// parts (length stop before any text); both are unusable here.
fn extract_text(response: GenerateResponse) -> Result<String, LearnForgeError> {
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().next())
        .map(|p| p.text)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| LearnForgeError::EmptyResponse {
            detail: "no candidates with text parts".into(),
        })
}

// ── Client ───────────────────────────────────────────────────────────────────

/// Client for the Gemini `generateContent` endpoint.
pub struct GeminiModel {
    http: reqwest::Client,
    config: ServiceConfig,
}

impl GeminiModel {
    /// Build a client from the service configuration.
    ///
    /// A missing API key is not an error here: the service must start
    /// without credentials, and each call fails with
    /// [`LearnForgeError::MissingApiKey`] instead.
    pub fn new(config: ServiceConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.api_timeout_secs))
            .build()
            // Builder only fails for TLS backend misconfiguration, which is
            // a compile-time property of our feature set.
            .unwrap_or_default();
        Self { http, config }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.api_base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// One attempt: POST the prompt, classify the outcome.
    async fn call_once(&self, prompt: &str, api_key: &str) -> Result<String, LearnForgeError> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_output_tokens,
            },
        };

        let response = self
            .http
            .post(self.endpoint())
            // Key goes in a header, not the query string, so it can never
            // leak through URL logging.
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LearnForgeError::ApiTimeout {
                        secs: self.config.api_timeout_secs,
                    }
                } else {
                    LearnForgeError::ApiRequestFailed {
                        detail: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LearnForgeError::ApiStatus {
                status: status.as_u16(),
                body: body.chars().take(500).collect(),
            });
        }

        let decoded: GenerateResponse =
            response
                .json()
                .await
                .map_err(|e| LearnForgeError::EmptyResponse {
                    detail: format!("response body was not valid JSON: {e}"),
                })?;

        extract_text(decoded)
    }
}

#[async_trait]
impl TextModel for GeminiModel {
    async fn generate(&self, prompt: &str) -> Result<String, LearnForgeError> {
        let api_key = self
            .config
            .api_key
            .clone()
            .ok_or(LearnForgeError::MissingApiKey)?;

        let start = Instant::now();
        let mut last_err: Option<LearnForgeError> = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                // Saturating: a hand-built config with a huge retry count
                // must not overflow the doubling.
                let backoff = self
                    .config
                    .retry_backoff_ms
                    .saturating_mul(2u64.saturating_pow(attempt - 1));
                warn!(
                    "Model call: retry {}/{} after {}ms",
                    attempt, self.config.max_retries, backoff
                );
                sleep(Duration::from_millis(backoff)).await;
            }

            match self.call_once(prompt, &api_key).await {
                Ok(text) => {
                    debug!(
                        "Model call succeeded: {} prompt chars, {} response chars, {:?}",
                        prompt.chars().count(),
                        text.chars().count(),
                        start.elapsed()
                    );
                    return Ok(text);
                }
                Err(e) if e.is_retryable() => {
                    warn!("Model call attempt {} failed: {}", attempt + 1, e);
                    last_err = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(LearnForgeError::RetriesExhausted {
            retries: self.config.max_retries,
            detail: last_err
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown error".to_string()),
        })
    }
}
