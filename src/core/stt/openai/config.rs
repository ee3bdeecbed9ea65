//! Configuration types for the OpenAI transcription API.

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

// =============================================================================
// OpenAI STT Models
// =============================================================================

/// Supported OpenAI transcription models.
///
/// - `whisper-1`: Original Whisper model
/// - `gpt-4o-transcribe`: Enhanced transcription with GPT-4o intelligence
/// - `gpt-4o-mini-transcribe`: Faster, cost-effective transcription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OpenAISTTModel {
    /// Original Whisper model - good balance of speed and accuracy
    #[default]
    #[serde(rename = "whisper-1")]
    Whisper1,
    /// GPT-4o enhanced transcription - best accuracy
    #[serde(rename = "gpt-4o-transcribe")]
    Gpt4oTranscribe,
    /// GPT-4o mini transcription - faster, cost-effective
    #[serde(rename = "gpt-4o-mini-transcribe")]
    Gpt4oMiniTranscribe,
}

impl OpenAISTTModel {
    /// Convert to the API parameter value.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Whisper1 => "whisper-1",
            Self::Gpt4oTranscribe => "gpt-4o-transcribe",
            Self::Gpt4oMiniTranscribe => "gpt-4o-mini-transcribe",
        }
    }
}

impl FromStr for OpenAISTTModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "whisper-1" | "whisper1" | "whisper" => Ok(Self::Whisper1),
            "gpt-4o-transcribe" | "gpt4o-transcribe" => Ok(Self::Gpt4oTranscribe),
            "gpt-4o-mini-transcribe" | "gpt4o-mini-transcribe" => Ok(Self::Gpt4oMiniTranscribe),
            other => Err(format!("unknown transcription model '{other}'")),
        }
    }
}

impl std::fmt::Display for OpenAISTTModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Provider configuration
// =============================================================================

/// Settings for the OpenAI transcription endpoint.
#[derive(Debug, Clone)]
pub struct OpenAISTTConfig {
    pub api_key: String,
    pub model: OpenAISTTModel,
    /// ISO-639-1 language hint; omitted from the request when empty
    pub language: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl OpenAISTTConfig {
    /// Transcription endpoint under the configured base URL.
    pub fn api_url(&self) -> String {
        format!(
            "{}/audio/transcriptions",
            self.base_url.trim_end_matches('/')
        )
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.api_key.trim().is_empty() {
            return Err("OpenAI API key is required".to_string());
        }
        if self.timeout.is_zero() {
            return Err("Transcription timeout must be greater than zero".to_string());
        }
        Ok(())
    }
}

impl Drop for OpenAISTTConfig {
    fn drop(&mut self) {
        use zeroize::Zeroize;
        self.api_key.zeroize();
    }
}
