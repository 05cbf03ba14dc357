//! Client side of the `POST /api` contract.
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use thiserror::Error;

use crate::error::GENERATION_FAILED;
use crate::generation::{ErrorBody, GeneratedImage, GenerationOutcome, GenerationRequest, DEFAULT_CONTENT_TYPE};

/// No usable response came back from the proxy.
#[derive(Debug, Error)]
#[error("request to proxy failed: {0}")]
pub struct TransportError(#[from] reqwest::Error);

#[async_trait]
pub trait ProxyTransport: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationOutcome, TransportError>;
}

#[derive(Clone)]
pub struct HttpProxyTransport {
    client: Client,
    endpoint: String,
}

impl HttpProxyTransport {
    /// `proxy_url` is the server root; requests go to `<proxy_url>/api`.
    pub fn new(proxy_url: &str) -> Self {
        let endpoint = format!("{}/api", proxy_url.trim_end_matches('/'));
        HttpProxyTransport { client: Client::new(), endpoint }
    }
}

#[async_trait]
impl ProxyTransport for HttpProxyTransport {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationOutcome, TransportError> {
        let response = self.client.post(&self.endpoint)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let content_type = response.headers()
                .get(CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
                .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());
            let bytes = response.bytes().await?.to_vec();
            return Ok(GenerationOutcome::Success(GeneratedImage { bytes, content_type }));
        }

        // An unreadable error body still counts as a response from the proxy.
        let message = response.json::<ErrorBody>()
            .await
            .ok()
            .map(|body| body.error)
            .filter(|error| !error.trim().is_empty())
            .unwrap_or_else(|| GENERATION_FAILED.to_string());
        tracing::warn!("Proxy answered {}: {}", status, message);
        Ok(GenerationOutcome::failure(status.as_u16(), message))
    }
}
