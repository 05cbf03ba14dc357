#![allow(dead_code)]

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use picasso_proxy::api::routes::{router, AppState};
use picasso_proxy::Config;
use serde_json::Value;
use std::net::{SocketAddr, TcpListener};
use std::sync::{Arc, Mutex};

/// One request as seen by the fake inference endpoint.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Debug, Clone)]
pub struct UpstreamReply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl UpstreamReply {
    pub fn png(len: usize) -> Self {
        UpstreamReply { status: 200, content_type: "image/png", body: vec![0x89; len] }
    }

    pub fn error(status: u16, body: &str) -> Self {
        UpstreamReply { status, content_type: "application/json", body: body.as_bytes().to_vec() }
    }
}

#[derive(Clone)]
struct FakeState {
    reply: UpstreamReply,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

pub struct FakeUpstream {
    pub url: String,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl FakeUpstream {
    pub async fn start(reply: UpstreamReply) -> Self {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new()
            .route("/models/test-model", post(respond))
            .with_state(FakeState { reply, calls: calls.clone() });
        let addr = serve(app);
        FakeUpstream { url: format!("http://{}/models/test-model", addr), calls }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

async fn respond(State(state): State<FakeState>, headers: HeaderMap, body: Bytes) -> Response {
    state.calls.lock().unwrap().push(RecordedCall {
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    });
    let status = StatusCode::from_u16(state.reply.status).unwrap();
    (status, [(header::CONTENT_TYPE, state.reply.content_type)], state.reply.body.clone()).into_response()
}

/// Serve `app` on an ephemeral local port. Must run inside a tokio runtime.
pub fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let server = axum::Server::from_tcp(listener)
        .unwrap()
        .serve(app.into_make_service());
    tokio::spawn(async move {
        server.await.ok();
    });
    addr
}

/// A local URL nothing is listening on.
pub fn closed_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

pub fn proxy_state(upstream_url: &str, api_key: Option<&str>) -> Arc<AppState> {
    let upstream_url = upstream_url.to_string();
    let api_key = api_key.map(str::to_string);
    let config = Config::from_lookup(|key| match key {
        "UPSTREAM_URL" => Some(upstream_url.clone()),
        "HF_APIKEY" => api_key.clone(),
        _ => None,
    });
    Arc::new(AppState::from_config(&config))
}

pub fn proxy_app(upstream_url: &str, api_key: Option<&str>) -> Router {
    router(proxy_state(upstream_url, api_key))
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    hyper::body::to_bytes(response.into_body()).await.unwrap().to_vec()
}

pub async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
