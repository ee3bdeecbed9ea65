use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::core::storage::DEFAULT_USER_ID;
use crate::errors::{AppError, AppResult};
use crate::state::AppState;

/// Body of `POST /tts`
#[derive(Debug, Default, Deserialize)]
pub struct TtsRequest {
    #[serde(default)]
    pub texto: Option<String>,
    /// Any JSON scalar; numbers are common (phone numbers)
    #[serde(default, rename = "userId")]
    pub user_id: Option<Value>,
}

/// Body returned by `POST /tts`
#[derive(Debug, Serialize)]
pub struct TtsResponse {
    pub uri: String,
    #[serde(rename = "type")]
    pub content_type: String,
    pub size: u64,
    #[serde(rename = "textoProcessado", skip_serializing_if = "Option::is_none")]
    pub processed_text: Option<String>,
}

/// Stringify the caller's `userId`, defaulting when absent or blank.
///
/// Non-blank strings pass through untouched; key sanitization happens in storage.
fn resolve_user_id(user_id: Option<&Value>) -> String {
    let raw = match user_id {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };
    if raw.trim().is_empty() {
        DEFAULT_USER_ID.to_string()
    } else {
        raw
    }
}

/// Convert text to speech and return the public URL of the stored audio.
pub async fn tts_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TtsRequest>, JsonRejection>,
) -> AppResult<Json<TtsResponse>> {
    let Json(request) = payload.map_err(|e| AppError::Validation(e.body_text()))?;
    let text = request
        .texto
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Campo \"texto\" é obrigatório".to_string()))?;
    let user_id = resolve_user_id(request.user_id.as_ref());

    info!(chars = text.chars().count(), user_id = %user_id, "Received /tts request");

    let output = state.pipeline.run(text, &user_id).await?;

    Ok(Json(TtsResponse {
        uri: output.stored.uri,
        content_type: output.stored.content_type,
        size: output.stored.size,
        processed_text: state
            .config
            .tts_return_processed_text
            .then_some(output.processed_text),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::storage::sanitize_user_id;
    use serde_json::json;

    #[test]
    fn test_resolve_user_id() {
        assert_eq!(resolve_user_id(None), DEFAULT_USER_ID);
        assert_eq!(resolve_user_id(Some(&Value::Null)), DEFAULT_USER_ID);
        assert_eq!(resolve_user_id(Some(&json!("  "))), DEFAULT_USER_ID);
        assert_eq!(resolve_user_id(Some(&json!("ana@x.com"))), "ana@x.com");
        assert_eq!(resolve_user_id(Some(&json!(5511999999999u64))), "5511999999999");
    }

    #[test]
    fn test_resolve_user_id_keeps_surrounding_whitespace() {
        let resolved = resolve_user_id(Some(&json!(" bob ")));
        assert_eq!(resolved, " bob ");
        assert_eq!(sanitize_user_id(&resolved), "_bob_");
    }

    #[test]
    fn test_request_accepts_missing_fields() {
        let request: TtsRequest = serde_json::from_value(json!({})).unwrap();
        assert!(request.texto.is_none());
        assert!(request.user_id.is_none());
    }

    #[test]
    fn test_response_omits_processed_text_by_default() {
        let response = TtsResponse {
            uri: "https://cdn.example.com/a.mp3".to_string(),
            content_type: "audio/mpeg".to_string(),
            size: 3,
            processed_text: None,
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["type"], "audio/mpeg");
        assert!(value.get("textoProcessado").is_none());
    }
}
