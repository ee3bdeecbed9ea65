//! OpenAI transcription client.
//!
//! Sends a complete audio file as multipart form data and returns the transcript.

use bytes::Bytes;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use tracing::{debug, error, info};

use super::config::OpenAISTTConfig;
use super::messages::{OpenAIErrorResponse, TranscriptionResponse};
use crate::core::audio::SniffedFormat;
use crate::core::stt::{STTError, STTResult};
use crate::utils::text::{ERROR_BODY_LOG_LIMIT, truncate_for_log};

/// Batch transcription over `POST {base}/audio/transcriptions`.
pub struct OpenAISTT {
    client: Client,
    config: OpenAISTTConfig,
}

impl OpenAISTT {
    pub fn new(client: Client, config: OpenAISTTConfig) -> STTResult<Self> {
        config.validate().map_err(STTError::ConfigurationError)?;
        Ok(Self { client, config })
    }

    fn build_form(&self, audio: Bytes, format: SniffedFormat) -> STTResult<Form> {
        let length = audio.len() as u64;
        let file_part = Part::stream_with_length(audio, length)
            .file_name(format!("audio.{}", format.extension))
            .mime_str(format.mime_type)
            .map_err(|e| STTError::ConfigurationError(format!("Invalid MIME type: {e}")))?;

        let mut form = Form::new()
            .part("file", file_part)
            .text("model", self.config.model.as_str())
            .text("response_format", "json");

        if !self.config.language.is_empty() {
            form = form.text("language", self.config.language.clone());
        }

        Ok(form)
    }

    /// Transcribe a complete audio file.
    pub async fn transcribe(&self, audio: Bytes, format: SniffedFormat) -> STTResult<String> {
        info!(
            bytes = audio.len(),
            format = format.extension,
            model = %self.config.model,
            "Sending audio for transcription"
        );

        let form = self.build_form(audio, format)?;
        let response = self
            .client
            .post(self.config.api_url())
            .bearer_auth(&self.config.api_key)
            .timeout(self.config.timeout)
            .multipart(form)
            .send()
            .await
            .map_err(|e| STTError::NetworkError(format!("Request failed: {e}")))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| STTError::NetworkError(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            let message = match serde_json::from_str::<OpenAIErrorResponse>(&response_text) {
                Ok(error_response) => error_response.error.to_string(),
                Err(_) => truncate_for_log(&response_text, ERROR_BODY_LOG_LIMIT).into_owned(),
            };
            error!(
                status = status.as_u16(),
                body = %truncate_for_log(&response_text, ERROR_BODY_LOG_LIMIT),
                "Transcription provider returned an error"
            );
            return Err(STTError::ProviderError {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: TranscriptionResponse = serde_json::from_str(&response_text)
            .map_err(|e| STTError::ParseError(format!("Invalid transcription response: {e}")))?;

        debug!(chars = parsed.text.chars().count(), "Transcription complete");
        Ok(parsed.text)
    }
}
