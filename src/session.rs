//! Per-session document cache.
//!
//! The service keeps the most recently uploaded document's text in process
//! memory, keyed by a session identifier. Callers pick their session with
//! the `x-session-id` header; requests without one share the
//! [`DEFAULT_SESSION`] slot, which preserves the single-slot behaviour
//! older clients rely on while isolating callers that do send an id.
//!
//! Uploads replace a session's text wholesale. There is no merge, no
//! eviction, and no persistence; the store lives exactly as long as the
//! process.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Session used when the client does not send an `x-session-id` header.
pub const DEFAULT_SESSION: &str = "default";

/// In-memory store of extracted document text, keyed by session id.
#[derive(Default)]
pub struct SessionStore {
    documents: RwLock<HashMap<String, Arc<str>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the session's cached document text in full.
    pub async fn replace_document(&self, session_id: &str, text: String) {
        debug!(
            "Caching {} chars for session '{}'",
            text.chars().count(),
            session_id
        );
        self.documents
            .write()
            .await
            .insert(session_id.to_string(), Arc::from(text));
    }

    /// The session's cached text, if a document has been uploaded.
    ///
    /// Returns a cheap `Arc` clone so a long generation sequence keeps
    /// working on the text it started with even if a concurrent upload
    /// replaces the slot mid-flight.
    pub async fn document(&self, session_id: &str) -> Option<Arc<str>> {
        self.documents.read().await.get(session_id).cloned()
    }
}
