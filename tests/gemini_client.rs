//! Retry behaviour of the Gemini client against a local scripted server.
//!
//! `ServiceConfig.api_base_url` exists so the client can be pointed at a
//! stub; these tests bind a listener on an ephemeral port, script its
//! status sequence, and count how many calls the client actually makes.
//! Backoff is set to 1 ms so the full retry budget runs in milliseconds.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use learnforge::error::LearnForgeError;
use learnforge::gemini::{GeminiModel, TextModel};
use learnforge::ServiceConfig;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// ── Scripted upstream ────────────────────────────────────────────────────────

#[derive(Clone)]
struct StubState {
    calls: Arc<AtomicUsize>,
    statuses: Arc<Vec<u16>>,
}

/// Reply with the scripted status for this call number; the last status
/// repeats once the script runs out. A 200 carries a valid candidates body.
async fn scripted(State(s): State<StubState>) -> Response {
    let i = s.calls.fetch_add(1, Ordering::SeqCst);
    let status = *s
        .statuses
        .get(i)
        .unwrap_or_else(|| s.statuses.last().expect("script must not be empty"));

    if status == 200 {
        Json(json!({
            "candidates": [{"content": {"parts": [{"text": "pong"}]}}]
        }))
        .into_response()
    } else {
        (StatusCode::from_u16(status).unwrap(), "busy").into_response()
    }
}

/// Start the stub on an ephemeral port. Returns its base URL and call counter.
async fn spawn_stub(statuses: &[u16]) -> (String, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let state = StubState {
        calls: Arc::clone(&calls),
        statuses: Arc::new(statuses.to_vec()),
    };
    let app = Router::new().fallback(scripted).with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), calls)
}

fn client_for(base_url: &str, max_retries: u32) -> GeminiModel {
    let config = ServiceConfig::builder()
        .api_base_url(base_url)
        .api_key("test-key")
        .max_retries(max_retries)
        .retry_backoff_ms(1)
        .api_timeout_secs(5)
        .build()
        .unwrap();
    GeminiModel::new(config)
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn transient_503s_are_retried_until_success() {
    let (base, calls) = spawn_stub(&[503, 503, 200]).await;
    let model = client_for(&base, 2);

    let text = model.generate("ping").await.unwrap();
    assert_eq!(text, "pong");
    assert_eq!(calls.load(Ordering::SeqCst), 3); // initial try + 2 retries
}

#[tokio::test]
async fn rate_limit_is_retried() {
    let (base, calls) = spawn_stub(&[429, 200]).await;
    let model = client_for(&base, 3);

    assert_eq!(model.generate("ping").await.unwrap(), "pong");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn persistent_failure_exhausts_the_retry_budget() {
    let (base, calls) = spawn_stub(&[503]).await;
    let model = client_for(&base, 2);

    let err = model.generate("ping").await.unwrap_err();
    assert!(
        matches!(err, LearnForgeError::RetriesExhausted { retries: 2, .. }),
        "got: {err}"
    );
    assert_eq!(calls.load(Ordering::SeqCst), 3); // budget fully spent
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    let (base, calls) = spawn_stub(&[400]).await;
    let model = client_for(&base, 3);

    let err = model.generate("ping").await.unwrap_err();
    assert!(
        matches!(err, LearnForgeError::ApiStatus { status: 400, .. }),
        "got: {err}"
    );
    assert_eq!(calls.load(Ordering::SeqCst), 1); // surfaced immediately
}

#[tokio::test]
async fn success_on_first_attempt_makes_one_call() {
    let (base, calls) = spawn_stub(&[200]).await;
    let model = client_for(&base, 3);

    assert_eq!(model.generate("ping").await.unwrap(), "pong");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
