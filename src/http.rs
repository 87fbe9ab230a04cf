//! HTTP surface — JSON API routes for the contact form.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use tracing::info;

use crate::classifier::Classifier;
use crate::pipeline::{SubmissionOutcome, SubmissionPipeline, SubmissionRequest};
use crate::store::ContactStore;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<SubmissionPipeline>,
    /// Classifier backing the standalone check endpoint.
    pub classifier: Arc<dyn Classifier>,
    /// Store handle for the health probe.
    pub store: Arc<dyn ContactStore>,
}

/// Build the Axum router with the contact API routes.
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/contact", post(submit_contact))
        .route("/api/check-disposable", post(check_disposable))
        .route("/health", get(health))
        .with_state(state)
}

// ── Handlers ────────────────────────────────────────────────────────

async fn submit_contact(
    State(state): State<AppState>,
    Json(request): Json<SubmissionRequest>,
) -> impl IntoResponse {
    let outcome = state.pipeline.handle(request).await;
    info!(outcome = outcome.label(), "Contact submission handled");

    let status = match &outcome {
        SubmissionOutcome::Delivered { .. } => StatusCode::OK,
        SubmissionOutcome::Rejected { .. } => StatusCode::BAD_REQUEST,
        // Partial success (saved, notify failed) still reports a server
        // error so the browser can tell the user — never a silent success.
        SubmissionOutcome::SaveFailed | SubmissionOutcome::NotifyFailed { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    (
        status,
        Json(serde_json::json!({ "message": outcome.user_message() })),
    )
}

/// Body of the standalone disposable-email check.
#[derive(Debug, Deserialize)]
struct CheckRequest {
    #[serde(default)]
    email: String,
}

async fn check_disposable(
    State(state): State<AppState>,
    Json(request): Json<CheckRequest>,
) -> impl IntoResponse {
    let email = request.email.trim();
    if email.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "is_disposable": false,
                "message": "Email is required.",
            })),
        );
    }

    let verdict = state.classifier.classify(email).await;
    let mut body = serde_json::json!({
        "is_disposable": verdict.is_disposable,
        "confidence": verdict.confidence,
    });
    if let Some(note) = verdict.note {
        body["note"] = serde_json::Value::String(note);
    }

    (StatusCode::OK, Json(body))
}

/// Readiness probe. Reports degraded (503) when the store is unreachable,
/// so a dead database at startup is observable before traffic arrives.
async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "status": "ok", "database": "ok" })),
        ),
        Err(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({ "status": "degraded", "database": "unavailable" })),
        ),
    }
}
