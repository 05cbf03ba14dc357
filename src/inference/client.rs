//! Thin HTTP client for the upstream inference endpoint.
//!
//! `generate_image` posts `{"inputs": <prompt>}` with a bearer credential and
//! returns the raw image bytes together with the declared content type.
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};

use crate::config::Credential;
use crate::error::{AppError, AppResult};
use crate::generation::{GeneratedImage, UpstreamPayload, DEFAULT_CONTENT_TYPE};

const MAX_LOGGED_BODY: usize = 512;

#[derive(Clone)]
pub struct InferenceClient {
    client: Client,
    endpoint: String,
}

impl InferenceClient {
    pub fn new(endpoint: String) -> Self {
        InferenceClient { client: Client::new(), endpoint }
    }

    /// Ask the upstream model for one image.
    ///
    /// Non-success statuses are read as text for the log and turned into
    /// `UpstreamAuth` (403) or `Upstream`; the body never leaves this process.
    pub async fn generate_image(&self, credential: &Credential, prompt: &str) -> AppResult<GeneratedImage> {
        tracing::info!("Sending prompt ({} chars) to {}", prompt.chars().count(), self.endpoint);

        let response = self.client.post(&self.endpoint)
            .bearer_auth(credential.expose())
            .json(&UpstreamPayload { inputs: prompt.to_string() })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "Unable to read error body".to_string());
            tracing::error!(
                "Upstream generation failed. Status: {}, Body: {}",
                status,
                truncate_text(&body, MAX_LOGGED_BODY)
            );
            return Err(if status == StatusCode::FORBIDDEN {
                AppError::UpstreamAuth { body }
            } else {
                AppError::Upstream { status: status.as_u16(), body }
            });
        }

        let content_type = response.headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());
        let bytes = response.bytes().await?.to_vec();
        tracing::info!("Received {} bytes of {} from upstream", bytes.len(), content_type);

        Ok(GeneratedImage { bytes, content_type })
    }
}

fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let head: String = text.chars().take(max_chars).collect();
        format!("{}...", head)
    }
}
