//! Server Startup Tests
//!
//! State construction from configuration, the health summary, and serving over a
//! real socket.

mod fixtures;

use std::net::SocketAddr;
use std::time::Duration;

use axum::http::StatusCode;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::time::timeout;

use fixtures::*;
use voice_relay::{ServerConfig, routes, state::AppState};

#[tokio::test]
async fn test_state_builds_without_any_credentials() {
    let state = AppState::new(ServerConfig::default()).expect("state builds");

    assert!(!state.pipeline.synthesizer().is_configured());
    assert!(!state.pipeline.normalizer().is_enabled());
    assert!(state.pipeline.store().is_none());
    assert!(!state.transcriber.is_configured());
}

#[tokio::test]
async fn test_with_object_store_requires_public_base_url() {
    let config = ServerConfig::default();
    let result = AppState::with_object_store(
        config,
        std::sync::Arc::new(object_store::memory::InMemory::new()),
    );
    assert!(result.is_err());
}

#[tokio::test]
async fn test_health_reports_capabilities() {
    let upstreams = Upstreams::start().await;

    let (app, _bucket) = build_app(relay_config(&upstreams));
    let (status, body) = get_json(app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "status": "OK",
            "tts": true,
            "ajusteTexto": false,
            "stt": false,
            "storage": true
        })
    );

    let mut config = relay_config(&upstreams);
    config.openai_api_key = Some("sk-test".to_string());
    let (app, _bucket) = build_app(config);
    let (_, body) = get_json(app, "/").await;
    assert_eq!(body["ajusteTexto"], true);
    assert_eq!(body["stt"], true);
}

#[tokio::test]
async fn test_health_with_rewrite_disabled() {
    let upstreams = Upstreams::start().await;

    let mut config = relay_config(&upstreams);
    config.openai_api_key = Some("sk-test".to_string());
    config.text_rewrite_enabled = false;
    let (app, _bucket) = build_app(config);

    let (_, body) = get_json(app, "/health").await;
    assert_eq!(body["ajusteTexto"], false);
    assert_eq!(body["stt"], true);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let upstreams = Upstreams::start().await;
    let (app, _bucket) = build_app(relay_config(&upstreams));

    let (status, _) = get_json(app, "/voices").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_server_serves_health_over_tcp() {
    let state = AppState::new(ServerConfig::default()).expect("state builds");
    let app = routes::api::create_app(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let response = timeout(
        Duration::from_secs(5),
        reqwest::get(format!("http://{addr}/health")),
    )
    .await
    .expect("server answers in time")
    .expect("request succeeds");

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "OK");
    assert_eq!(body["tts"], false);

    server.abort();
}
