use std::sync::Arc;

use axum::{Json, extract::State};
use serde::Serialize;

use crate::state::AppState;

/// Capability summary returned by the health check
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub tts: bool,
    #[serde(rename = "ajusteTexto")]
    pub text_rewrite: bool,
    pub stt: bool,
    pub storage: bool,
}

/// Health check handler
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let pipeline = &state.pipeline;
    Json(HealthResponse {
        status: "OK",
        tts: pipeline.synthesizer().is_configured(),
        text_rewrite: pipeline.normalizer().is_enabled(),
        stt: state.transcriber.is_configured(),
        storage: pipeline.store().is_some(),
    })
}
