//! Picasso image generation proxy library
//!
//! Modules:
//! - `api`: Axum HTTP handlers and router setup used by the server binary.
//! - `inference`: Thin client for the upstream inference endpoint.
//! - `client`: Client-side state machine, proxy transport and image stores.
//! - `generation`: Request/outcome types shared by both sides.
//! - `config`: Env-driven configuration loader.
//! - `error`: Common error type and alias.
//!
//! Re-exports are provided for common types: `Config`, `InferenceClient`,
//! `ClientController`, and `GenerationOutcome`.
pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod generation;
pub mod inference;

pub use client::controller::{ClientController, ClientState};
pub use config::Config;
pub use generation::{GenerationOutcome, GenerationRequest};
pub use inference::client::InferenceClient;

use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber; `RUST_LOG` overrides the `info` default.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
