//! Shared application state and router assembly.
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::handlers;
use crate::config::{Config, Credential};
use crate::inference::client::InferenceClient;

/// Read-only per-process state; every request borrows it through an `Arc`.
pub struct AppState {
    pub credential: Option<Credential>,
    pub inference_client: InferenceClient,
}

impl AppState {
    pub fn from_config(config: &Config) -> Self {
        AppState {
            credential: config.credential.clone(),
            inference_client: InferenceClient::new(config.upstream_url.clone()),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/api", post(handlers::generate))
        .layer(CatchPanicLayer::custom(handlers::handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
