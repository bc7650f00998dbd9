//! # learnforge
//!
//! Backend service that turns an uploaded PDF chapter into learning content
//! — key concepts, markdown explanations with embedded Mermaid flowcharts,
//! practice scenarios, answer feedback, and multiple-choice quizzes — by
//! prompting the Gemini `generateContent` API.
//!
//! ## Request Flow
//!
//! ```text
//! POST /api/analyze-pdf
//!  │
//!  ├─ 1. Extract   PDF bytes → plain text (pdf-extract, spawn_blocking)
//!  ├─ 2. Cache     text stored per session (full replacement)
//!  └─ 3. Concepts  one model call → JSON list of concept names
//!
//! POST /api/get-learning-module (concept)
//!  │
//!  ├─ 1. Explanation  markdown + mermaid diagrams   (failure → 500)
//!  ├─ 2. Scenario     practice problem              (failure → null)
//!  └─ 3. Quiz         JSON multiple-choice questions (failure → 500)
//!
//! POST /api/evaluate-answer — stateless feedback on a student's answer
//! ```
//!
//! ## Model boundary
//!
//! All prompt/parse logic talks to the model through the
//! [`gemini::TextModel`] trait; [`gemini::GeminiModel`] is the production
//! implementation with per-call timeout and retry-with-backoff. Tests stub
//! the trait and never touch the network.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use learnforge::{AppState, GeminiModel, PdfExtractor, ServiceConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServiceConfig::from_env();
//!     let state = Arc::new(AppState::new(
//!         Arc::new(GeminiModel::new(config)),
//!         Arc::new(PdfExtractor),
//!     ));
//!     let app = learnforge::router(state);
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod extract;
pub mod gemini;
pub mod generator;
pub mod prompts;
pub mod quiz;
pub mod server;
pub mod session;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::ServiceConfig;
pub use error::LearnForgeError;
pub use extract::{DocumentExtractor, PdfExtractor};
pub use gemini::{GeminiModel, TextModel};
pub use server::{router, AppState};
pub use session::SessionStore;
