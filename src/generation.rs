//! Request/response contracts shared by the proxy and the client.
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Inbound body of `POST /api`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
}

impl GenerationRequest {
    /// Returns `None` when the prompt is empty after trimming.
    pub fn new(prompt: &str) -> Option<Self> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            None
        } else {
            Some(GenerationRequest { prompt: prompt.to_string() })
        }
    }
}

/// Body sent to the upstream inference endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamPayload {
    pub inputs: String,
}

/// JSON body of every failure response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    Success(GeneratedImage),
    Failure { status_code: u16, message: String },
}

impl GenerationOutcome {
    pub fn failure(status_code: u16, message: impl Into<String>) -> Self {
        GenerationOutcome::Failure { status_code, message: message.into() }
    }
}

impl IntoResponse for GenerationOutcome {
    fn into_response(self) -> Response {
        match self {
            GenerationOutcome::Success(image) => {
                let content_type = HeaderValue::from_str(&image.content_type)
                    .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
                (StatusCode::OK, [(header::CONTENT_TYPE, content_type)], image.bytes).into_response()
            }
            GenerationOutcome::Failure { status_code, message } => {
                let status = StatusCode::from_u16(status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                (status, Json(ErrorBody { error: message })).into_response()
            }
        }
    }
}
