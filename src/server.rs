//! HTTP endpoint layer: router, handlers, and error → response mapping.
//!
//! The handlers are pure sequencing: upload → extract → cache → concepts,
//! and concept → explanation → scenario → quiz. The one deliberate
//! asymmetry in the module endpoint is that a scenario failure degrades to
//! `"scenario": null` while an explanation or quiz failure aborts the
//! request — a module without a practice scenario is still useful, a module
//! without its explanation is not.
//!
//! Error payloads are always `{"detail": ...}` with a 400 for
//! client-state problems (bad upload, nothing cached yet) and a 500 for
//! model-side failures, matching what existing frontends expect.

use crate::error::LearnForgeError;
use crate::extract::DocumentExtractor;
use crate::gemini::TextModel;
use crate::session::{SessionStore, DEFAULT_SESSION};
use crate::{generator, quiz};
use axum::extract::{Multipart, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

/// Multipart field name the upload endpoint expects.
const UPLOAD_FIELD: &str = "file";

/// Header selecting the caller's session slot.
const SESSION_HEADER: &str = "x-session-id";

// ── State ────────────────────────────────────────────────────────────────────

/// Shared state handed to every handler.
pub struct AppState {
    pub sessions: SessionStore,
    pub model: Arc<dyn TextModel>,
    pub extractor: Arc<dyn DocumentExtractor>,
}

impl AppState {
    pub fn new(model: Arc<dyn TextModel>, extractor: Arc<dyn DocumentExtractor>) -> Self {
        Self {
            sessions: SessionStore::new(),
            model,
            extractor,
        }
    }
}

// ── Request / Response types ─────────────────────────────────────────────────

#[derive(Serialize)]
struct LivenessResponse {
    message: &'static str,
}

#[derive(Serialize)]
struct ConceptsResponse {
    concepts: Vec<String>,
}

#[derive(Deserialize)]
struct ModuleRequest {
    concept: String,
}

#[derive(Serialize)]
struct ModuleResponse {
    explanation: String,
    scenario: Option<String>,
    questions: Vec<Value>,
}

#[derive(Deserialize)]
struct EvaluateRequest {
    scenario: String,
    user_answer: String,
    explanation: String,
}

#[derive(Serialize)]
struct FeedbackResponse {
    feedback: String,
}

// ── Error mapping ────────────────────────────────────────────────────────────

/// An error response: HTTP status plus a `{"detail": ...}` body.
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl From<LearnForgeError> for ApiError {
    fn from(err: LearnForgeError) -> Self {
        let status = match err {
            // The caller can fix these: upload a (better) document first.
            LearnForgeError::MissingFileField { .. }
            | LearnForgeError::ExtractionFailed { .. }
            | LearnForgeError::EmptyDocument
            | LearnForgeError::NoDocumentCached => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            detail: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!("Request failed: {}", self.detail);
        }
        (self.status, Json(serde_json::json!({ "detail": self.detail }))).into_response()
    }
}

// ── Router ───────────────────────────────────────────────────────────────────

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(liveness))
        .route("/api/analyze-pdf", post(analyze_pdf))
        .route("/api/get-learning-module", post(get_learning_module))
        .route("/api/evaluate-answer", post(evaluate_answer))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn session_id(headers: &HeaderMap) -> String {
    headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_SESSION)
        .to_string()
}

// ── Handlers ─────────────────────────────────────────────────────────────────

async fn liveness() -> Json<LivenessResponse> {
    Json(LivenessResponse {
        message: "learnforge backend is running",
    })
}

/// Upload a PDF, cache its text for the session, and return key concepts.
async fn analyze_pdf(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<ConceptsResponse>, ApiError> {
    let session = session_id(&headers);

    // Find the file field; other fields are ignored.
    let mut pdf_bytes = None;
    while let Some(field) = multipart.next_field().await.map_err(|e| ApiError {
        status: StatusCode::BAD_REQUEST,
        detail: format!("Malformed multipart request: {e}"),
    })? {
        if field.name() == Some(UPLOAD_FIELD) {
            let bytes = field.bytes().await.map_err(|e| ApiError {
                status: StatusCode::BAD_REQUEST,
                detail: format!("Failed to read upload: {e}"),
            })?;
            pdf_bytes = Some(bytes);
            break;
        }
    }
    let pdf_bytes = pdf_bytes.ok_or(LearnForgeError::MissingFileField {
        expected: UPLOAD_FIELD,
    })?;

    // PDF parsing is CPU-bound; keep it off the async workers.
    let extractor = Arc::clone(&state.extractor);
    let full_text = tokio::task::spawn_blocking(move || extractor.extract(&pdf_bytes))
        .await
        .map_err(|e| ApiError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: format!("Extraction task failed: {e}"),
        })??;

    state.sessions.replace_document(&session, full_text.clone()).await;
    info!("Session '{}': document cached, extracting concepts", session);

    let concepts = generator::extract_key_concepts(state.model.as_ref(), &full_text).await?;
    Ok(Json(ConceptsResponse { concepts }))
}

/// Build a full learning module (explanation + scenario + quiz) for one concept.
async fn get_learning_module(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(req): Form<ModuleRequest>,
) -> Result<Json<ModuleResponse>, ApiError> {
    let session = session_id(&headers);
    let full_text = state
        .sessions
        .document(&session)
        .await
        .ok_or(LearnForgeError::NoDocumentCached)?;

    let explanation =
        generator::generate_explanation(state.model.as_ref(), &full_text, &req.concept).await?;

    // A failed scenario downgrades to absent rather than failing the module.
    let scenario =
        match generator::generate_scenario(state.model.as_ref(), &req.concept, &explanation).await
        {
            Ok(s) => Some(s),
            Err(e) => {
                info!("Scenario generation failed, continuing without one: {e}");
                None
            }
        };

    let questions = quiz::generate_quiz_questions(state.model.as_ref(), &explanation).await?;

    Ok(Json(ModuleResponse {
        explanation,
        scenario,
        questions,
    }))
}

/// Evaluate a student's answer to a scenario. Stateless.
async fn evaluate_answer(
    State(state): State<Arc<AppState>>,
    Form(req): Form<EvaluateRequest>,
) -> Result<Json<FeedbackResponse>, ApiError> {
    let feedback = generator::evaluate_answer(
        state.model.as_ref(),
        &req.scenario,
        &req.user_answer,
        &req.explanation,
    )
    .await?;
    Ok(Json(FeedbackResponse { feedback }))
}
