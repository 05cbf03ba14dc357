mod common;

use axum::http::StatusCode;
use axum::routing::post;
use axum::Router;
use common::{closed_url, proxy_app, serve, FakeUpstream, UpstreamReply};
use picasso_proxy::client::controller::{EMPTY_PROMPT, NETWORK_ERROR};
use picasso_proxy::client::store::MemoryImageStore;
use picasso_proxy::client::transport::HttpProxyTransport;
use picasso_proxy::{ClientController, ClientState};

type Controller = ClientController<HttpProxyTransport, MemoryImageStore>;

/// Fake upstream behind a real proxy, with a controller pointed at the proxy.
async fn stack(reply: UpstreamReply, api_key: Option<&str>) -> (FakeUpstream, Controller) {
    let upstream = FakeUpstream::start(reply).await;
    let proxy_addr = serve(proxy_app(&upstream.url, api_key));
    let transport = HttpProxyTransport::new(&format!("http://{}/", proxy_addr));
    (upstream, ClientController::new(transport, MemoryImageStore::new()))
}

#[tokio::test]
async fn red_fox_prompt_ends_in_success_with_all_bytes() {
    let (upstream, mut controller) = stack(UpstreamReply::png(12_345), Some("hf_key")).await;
    controller.set_prompt("a red fox in snow");

    let state = controller.submit().await.clone();

    let ClientState::Success(handle) = state else {
        panic!("expected success, got {:?}", state);
    };
    assert_eq!(handle.size, 12_345);
    assert_eq!(handle.content_type, "image/png");
    assert_eq!(controller.store().get(&handle).unwrap().bytes, vec![0x89; 12_345]);
    assert_eq!(upstream.calls().len(), 1);
}

#[tokio::test]
async fn whitespace_prompt_never_reaches_upstream() {
    let (upstream, mut controller) = stack(UpstreamReply::png(10), Some("hf_key")).await;
    controller.set_prompt("   ");

    let state = controller.submit().await.clone();

    assert_eq!(state, ClientState::Error(EMPTY_PROMPT.to_string()));
    assert!(upstream.calls().is_empty());
}

#[tokio::test]
async fn each_submit_makes_exactly_one_upstream_call() {
    let (upstream, mut controller) = stack(UpstreamReply::png(10), Some("hf_key")).await;
    controller.set_prompt("castle");

    for expected in 1..=3 {
        controller.submit().await;
        assert_eq!(upstream.calls().len(), expected);
        assert_eq!(controller.store().len(), 1);
    }

    assert!(controller.reset());
    assert_eq!(controller.state(), &ClientState::Idle);
    assert_eq!(controller.prompt(), "");
    assert!(controller.store().is_empty());
}

#[tokio::test]
async fn missing_credential_shows_configuration_error() {
    let (upstream, mut controller) = stack(UpstreamReply::png(10), None).await;
    controller.set_prompt("castle");

    let state = controller.submit().await.clone();

    assert_eq!(state, ClientState::Error("Server configuration error".to_string()));
    assert!(upstream.calls().is_empty());
}

#[tokio::test]
async fn upstream_forbidden_shows_authentication_message() {
    let (_upstream, mut controller) = stack(UpstreamReply::error(403, "{}"), Some("hf_key")).await;
    controller.set_prompt("castle");

    match controller.submit().await {
        ClientState::Error(message) => assert!(message.contains("Authentication"), "message: {}", message),
        other => panic!("expected error, got {:?}", other),
    }
}

#[tokio::test]
async fn unreachable_proxy_is_a_network_error() {
    let transport = HttpProxyTransport::new(&closed_url());
    let mut controller = ClientController::new(transport, MemoryImageStore::new());
    controller.set_prompt("castle");

    let state = controller.submit().await.clone();

    assert_eq!(state, ClientState::Error(NETWORK_ERROR.to_string()));
}

#[tokio::test]
async fn non_json_error_body_falls_back_to_generic_message() {
    let app = Router::new().route(
        "/api",
        post(|| async { (StatusCode::BAD_GATEWAY, "upstream exploded") }),
    );
    let addr = serve(app);
    let transport = HttpProxyTransport::new(&format!("http://{}", addr));
    let mut controller = ClientController::new(transport, MemoryImageStore::new());
    controller.set_prompt("castle");

    let state = controller.submit().await.clone();

    assert_eq!(state, ClientState::Error("Failed to generate image".to_string()));
}
