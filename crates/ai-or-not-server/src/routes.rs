//! HTTP handlers for the inference server.
//!
//! One decision endpoint (`POST /predict`) plus a health probe. Caller errors
//! (empty text, unknown mode) map to 400 with a terse `{"error": ...}` body;
//! configuration and scoring failures map to 500 and never leak artifact
//! paths.

use std::sync::Arc;

use ai_or_not::{Detector, EnsembleKind};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::error;

/// Shared application state: the immutable model registry.
pub struct AppState {
    pub detector: Detector,
}

/// Body of `POST /predict`.
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    /// Text to classify.
    #[serde(default)]
    pub text: String,
    /// Ensemble to run; unigram when absent.
    #[serde(default)]
    pub model: Option<String>,
}

/// Error body for 400/500 responses.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
        .into_response()
}

/// `POST /predict`: classify one text with the selected ensemble.
pub async fn predict_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PredictRequest>,
) -> Response {
    let mode = match request.model.as_deref() {
        None => EnsembleKind::default(),
        Some(raw) => match raw.parse::<EnsembleKind>() {
            Ok(mode) => mode,
            Err(e) => return error_response(StatusCode::BAD_REQUEST, &e.to_string()),
        },
    };

    match state.detector.infer(&request.text, mode) {
        Ok(report) => Json(report).into_response(),
        Err(e) if e.is_caller_error() => error_response(StatusCode::BAD_REQUEST, &e.to_string()),
        Err(e) => {
            error!(error = %e, %mode, "Inference failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
        }
    }
}

/// `GET /health`: liveness probe. The registry loads before the listener
/// binds, so a serving process is always ready.
pub async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Build the axum [`Router`] with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/predict", post(predict_handler))
        .with_state(state)
}
