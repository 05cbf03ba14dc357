//! Env-driven configuration for the proxy and the terminal client.
//!
//! Values are read from the process environment once at startup; `dotenv`
//! is loaded on demand by the binaries. The upstream credential is optional
//! here: a missing key fails each generation request, not the process.
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

pub const DEFAULT_UPSTREAM_URL: &str =
    "https://api-inference.huggingface.co/models/runwayml/stable-diffusion-v1-5";
pub const DEFAULT_API_HOST: &str = "127.0.0.1";
pub const DEFAULT_API_PORT: u16 = 3000;
pub const DEFAULT_PROXY_URL: &str = "http://127.0.0.1:3000";

/// Bearer token authenticating the proxy to the upstream endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Returns `None` for empty or whitespace-only values.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            None
        } else {
            Some(Credential(value.trim().to_string()))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub credential: Option<Credential>,
    pub upstream_url: String,
    pub api_host: String,
    pub api_port: String,
    pub proxy_url: String,
}

impl Config {
    pub fn dotenv_load() {
        dotenv::dotenv().ok();
    }

    pub fn new() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Config {
            credential: lookup("HF_APIKEY").and_then(Credential::new),
            upstream_url: lookup("UPSTREAM_URL").unwrap_or_else(|| DEFAULT_UPSTREAM_URL.to_string()),
            api_host: lookup("API_HOST").unwrap_or_else(|| DEFAULT_API_HOST.to_string()),
            api_port: lookup("API_PORT").unwrap_or_else(|| DEFAULT_API_PORT.to_string()),
            proxy_url: lookup("PROXY_URL").unwrap_or_else(|| DEFAULT_PROXY_URL.to_string()),
        }
    }

    /// Resolve the listen address, falling back to defaults on bad input.
    pub fn socket_address(&self) -> SocketAddr {
        let ip: IpAddr = self.api_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid API_HOST '{}', falling back to {}", self.api_host, DEFAULT_API_HOST);
            IpAddr::from([127, 0, 0, 1])
        });
        let port: u16 = self.api_port.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid API_PORT '{}', falling back to {}", self.api_port, DEFAULT_API_PORT);
            DEFAULT_API_PORT
        });
        SocketAddr::new(ip, port)
    }

    pub fn log_summary(&self) {
        let credential = if self.credential.is_some() { "<set>" } else { "<unset>" };
        tracing::info!("HF_APIKEY: {}", credential);
        tracing::info!("UPSTREAM_URL: {}", self.upstream_url);
        tracing::info!("API_HOST: {}", self.api_host);
        tracing::info!("API_PORT: {}", self.api_port);
        tracing::info!("PROXY_URL: {}", self.proxy_url);
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
