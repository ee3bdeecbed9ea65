use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::core::pipeline::SpeechError;
use crate::core::storage::StorageError;
use crate::core::stt::STTError;
use crate::core::tts::TTSError;

/// Errors surfaced to HTTP callers
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Configuration(String),

    #[error(transparent)]
    Synthesis(#[from] TTSError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Transcription(#[from] STTError),

    #[error("{0}")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<SpeechError> for AppError {
    fn from(err: SpeechError) -> Self {
        match err {
            SpeechError::Synthesis(e) => Self::Synthesis(e),
            SpeechError::Storage(e) => Self::Storage(e),
        }
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Configuration(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Synthesis(e) => match e {
                TTSError::InvalidConfiguration(_) => StatusCode::SERVICE_UNAVAILABLE,
                TTSError::ProviderError { status, .. } => StatusCode::from_u16(*status)
                    .ok()
                    .filter(|s| s.is_client_error() || s.is_server_error())
                    .unwrap_or(StatusCode::BAD_GATEWAY),
                TTSError::NetworkError { .. } | TTSError::EmptyAudio(_) => StatusCode::BAD_GATEWAY,
            },
            Self::Storage(StorageError::NotConfigured) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Transcription(STTError::ConfigurationError(_)) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Transcription(STTError::InvalidUrl(_)) => StatusCode::BAD_REQUEST,
            Self::Transcription(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message placed in the `error` field of the response body. Never empty.
    pub fn client_message(&self) -> String {
        let message = match self {
            Self::Synthesis(e) => e.user_message(),
            Self::Transcription(e) => format!("STT: {e}"),
            other => other.to_string(),
        };
        if message.trim().is_empty() {
            "Internal error".to_string()
        } else {
            message
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "Request failed");
        }
        (status, Json(json!({ "error": self.client_message() }))).into_response()
    }
}
