//! Relay fixtures: fake upstream APIs, configuration, and request helpers.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use bytes::Bytes;
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use serde_json::Value;
use tower::util::ServiceExt;
use wiremock::MockServer;

use voice_relay::{ServerConfig, routes, state::AppState};

pub const PUBLIC_BASE_URL: &str = "https://cdn.example.com";
pub const VOICE_ID: &str = "test-voice";

/// Fake OpenAI, ElevenLabs and audio hosting servers
pub struct Upstreams {
    pub openai: MockServer,
    pub elevenlabs: MockServer,
    pub audio_host: MockServer,
}

impl Upstreams {
    pub async fn start() -> Self {
        Self {
            openai: MockServer::start().await,
            elevenlabs: MockServer::start().await,
            audio_host: MockServer::start().await,
        }
    }

    /// Path of the ElevenLabs synthesis endpoint for the test voice
    pub fn tts_path(&self) -> String {
        format!("/v1/text-to-speech/{VOICE_ID}")
    }

    pub fn audio_url(&self, path: &str) -> String {
        format!("{}{}", self.audio_host.uri(), path)
    }
}

/// Configuration pointing every provider at the fake upstreams.
///
/// ElevenLabs is configured, OpenAI is not, and storage uses the public base URL.
pub fn relay_config(upstreams: &Upstreams) -> ServerConfig {
    let mut config = ServerConfig::default();
    config.host = "127.0.0.1".to_string();
    config.openai_base_url = upstreams.openai.uri();
    config.elevenlabs_api_key = Some("xi-test-key".to_string());
    config.elevenlabs_base_url = upstreams.elevenlabs.uri();
    config.elevenlabs_voice_id = VOICE_ID.to_string();
    config.r2_public_base_url = Some(PUBLIC_BASE_URL.to_string());
    config.synthesis_timeout_seconds = 5;
    config.request_timeout_seconds = 5;
    config.allow_private_audio_urls = true;
    config
}

/// Build the router over an in-memory bucket.
pub fn build_app(config: ServerConfig) -> (Router, Arc<InMemory>) {
    let bucket = Arc::new(InMemory::new());
    let state = AppState::with_object_store(config, bucket.clone()).expect("state builds");
    (routes::api::create_app(state), bucket)
}

/// Build the router from configuration alone, as `main` does.
pub fn build_app_from_config(config: ServerConfig) -> Router {
    let state = AppState::new(config).expect("state builds");
    routes::api::create_app(state)
}

async fn read_json(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body");
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("JSON body")
    };
    (status, value)
}

pub async fn post_json(app: Router, path: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("valid request");
    read_json(app.oneshot(request).await.expect("infallible")).await
}

pub async fn post_raw(app: Router, path: &str, body: &'static str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .expect("valid request");
    read_json(app.oneshot(request).await.expect("infallible")).await
}

pub async fn get_json(app: Router, path: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(path)
        .body(Body::empty())
        .expect("valid request");
    read_json(app.oneshot(request).await.expect("infallible")).await
}

/// Fetch the object a returned `uri` points at.
pub async fn fetch_stored(bucket: &InMemory, uri: &str) -> Bytes {
    let key = uri
        .strip_prefix(&format!("{PUBLIC_BASE_URL}/"))
        .expect("uri under the public base URL");
    bucket
        .get(&ObjectPath::from(key))
        .await
        .expect("object exists")
        .bytes()
        .await
        .expect("object readable")
}
