use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::{AppError, AppResult};
use crate::state::AppState;

/// Body of `POST /stt`
#[derive(Debug, Default, Deserialize)]
pub struct SttRequest {
    #[serde(default, rename = "audioUrl")]
    pub audio_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SttResponse {
    pub texto: String,
}

/// Download the audio at `audioUrl` and return its transcript.
pub async fn stt_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SttRequest>, JsonRejection>,
) -> AppResult<Json<SttResponse>> {
    let Json(request) = payload.map_err(|e| AppError::Validation(e.body_text()))?;
    let audio_url = request
        .audio_url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| AppError::Validation("Campo \"audioUrl\" é obrigatório".to_string()))?;

    info!("Received /stt request");

    let texto = state.transcriber.transcribe(audio_url).await?;
    Ok(Json(SttResponse { texto }))
}
