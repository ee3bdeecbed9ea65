mod download;
pub mod openai;
mod transcriber;

use thiserror::Error;

use crate::utils::url_validation::UrlValidationError;

pub use download::MAX_REDIRECTS;
pub use openai::{OpenAISTT, OpenAISTTConfig, OpenAISTTModel};
pub use transcriber::{DownloadLimits, Transcriber};

/// Error types for transcription
#[derive(Debug, Error)]
pub enum STTError {
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Invalid audio URL: {0}")]
    InvalidUrl(#[from] UrlValidationError),

    #[error("Audio download failed: {0}")]
    DownloadError(String),

    #[error("Audio download returned HTTP {status}")]
    DownloadFailed { status: u16 },

    #[error("Audio exceeds the {max} byte limit")]
    AudioTooLarge { max: usize },

    #[error("Downloaded audio is empty")]
    EmptyAudio,

    #[error("Transcription provider returned HTTP {status}: {message}")]
    ProviderError { status: u16, message: String },

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Failed to parse transcription response: {0}")]
    ParseError(String),
}

/// Result type for transcription
pub type STTResult<T> = Result<T, STTError>;
