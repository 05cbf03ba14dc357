//! Axum request handlers for the HTTP API.
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use std::any::Any;
use std::sync::Arc;

use crate::api::routes::AppState;
use crate::error::{AppError, AppResult};
use crate::generation::{GeneratedImage, GenerationOutcome, GenerationRequest};

pub async fn root() -> &'static str {
    "Picasso image generation proxy"
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "credential_configured": state.credential.is_some(),
    }))
}

/// `POST /api`: exactly one outcome per request, never a raw fault.
pub async fn generate(
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> GenerationOutcome {
    let result = match body {
        Ok(body) => generate_image(&state, &body).await,
        Err(rejection) => Err(AppError::Unexpected(format!("unreadable request body: {}", rejection))),
    };
    match result {
        Ok(image) => GenerationOutcome::Success(image),
        Err(err) => {
            match &err {
                AppError::Validation => tracing::warn!("Rejected generation request: {}", err),
                AppError::Upstream { .. } | AppError::UpstreamAuth { .. } => {
                    tracing::warn!("Upstream did not produce an image (status {})", err.status_code())
                }
                _ => tracing::error!("Generation request failed: {}", err),
            }
            err.into()
        }
    }
}

async fn generate_image(state: &AppState, body: &[u8]) -> AppResult<GeneratedImage> {
    let payload: Value = serde_json::from_slice(body)
        .map_err(|e| AppError::Unexpected(format!("invalid request body: {}", e)))?;
    let request = payload.get("prompt")
        .and_then(Value::as_str)
        .and_then(GenerationRequest::new)
        .ok_or(AppError::Validation)?;
    let credential = state.credential.as_ref().ok_or(AppError::Configuration)?;

    state.inference_client.generate_image(credential, &request.prompt).await
}

/// Panic responder for `CatchPanicLayer`.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    let err = AppError::Unexpected(detail);
    tracing::error!("Handler panicked: {}", err);
    GenerationOutcome::from(err).into_response()
}
