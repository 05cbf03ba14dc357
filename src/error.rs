//! Common error type and alias for the proxy side.
//!
//! `Display` carries diagnostic detail for logs; `public_message` is the
//! only text that ever reaches a caller.
use thiserror::Error;

use crate::generation::GenerationOutcome;

pub const PROMPT_REQUIRED: &str = "Prompt is required";
pub const CONFIGURATION_ERROR: &str = "Server configuration error";
pub const AUTHENTICATION_FAILED: &str = "Authentication failed. Please check the API credential.";
pub const GENERATION_FAILED: &str = "Failed to generate image";
pub const INTERNAL_ERROR: &str = "Internal server error";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("prompt is missing or empty")]
    Validation,

    #[error("upstream credential HF_APIKEY is not configured")]
    Configuration,

    #[error("upstream rejected the credential: {body}")]
    UpstreamAuth { body: String },

    #[error("upstream returned status {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("unexpected error: {0}")]
    Unexpected(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::Validation => 400,
            AppError::UpstreamAuth { .. } => 403,
            AppError::Upstream { status, .. } => *status,
            AppError::Configuration | AppError::HttpClient(_) | AppError::Unexpected(_) => 500,
        }
    }

    pub fn public_message(&self) -> &'static str {
        match self {
            AppError::Validation => PROMPT_REQUIRED,
            AppError::Configuration => CONFIGURATION_ERROR,
            AppError::UpstreamAuth { .. } => AUTHENTICATION_FAILED,
            AppError::Upstream { .. } => GENERATION_FAILED,
            AppError::HttpClient(_) | AppError::Unexpected(_) => INTERNAL_ERROR,
        }
    }
}

impl From<AppError> for GenerationOutcome {
    fn from(err: AppError) -> Self {
        GenerationOutcome::failure(err.status_code(), err.public_message())
    }
}
