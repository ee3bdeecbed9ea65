//! ElevenLabs synthesis provider.
//!
//! - Endpoint: `POST {base}/v1/text-to-speech/{voice_id}`
//! - Auth: `xi-api-key` header
//! - Query: `output_format`, `optimize_streaming_latency=0`

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use super::config::{ElevenLabsConfig, VoiceSettings};
use crate::core::audio::{AudioEncoding, SynthesizedAudio};
use crate::core::tts::base::{
    SynthesisProvider, TTSError, TTSResult, network_error, read_audio_response,
};

const PROVIDER: &str = "elevenlabs";

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    language_code: Option<&'a str>,
    voice_settings: VoiceSettings,
    apply_text_normalization: &'static str,
    apply_language_text_normalization: bool,
}

/// One ElevenLabs voice/model/output-format combination.
pub struct ElevenLabsTTS {
    client: Client,
    config: ElevenLabsConfig,
    encoding: AudioEncoding,
}

impl ElevenLabsTTS {
    pub fn new(client: Client, config: ElevenLabsConfig) -> TTSResult<Self> {
        let encoding = config
            .validate()
            .map_err(TTSError::InvalidConfiguration)?;
        Ok(Self {
            client,
            config,
            encoding,
        })
    }

    fn build_request(&self, text: &str) -> reqwest::RequestBuilder {
        let body = SpeechRequest {
            text,
            model_id: &self.config.model_id,
            language_code: self.config.language_code.as_deref(),
            voice_settings: self.config.voice_settings,
            apply_text_normalization: "auto",
            apply_language_text_normalization: true,
        };

        self.client
            .post(self.config.endpoint())
            .query(&[
                ("output_format", self.config.output_format.as_str()),
                ("optimize_streaming_latency", "0"),
            ])
            .header("xi-api-key", &self.config.api_key)
            .header("Accept", self.encoding.mime_type())
            .timeout(self.config.timeout)
            .json(&body)
    }
}

#[async_trait]
impl SynthesisProvider for ElevenLabsTTS {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn encoding(&self) -> AudioEncoding {
        self.encoding
    }

    async fn synthesize(&self, text: &str) -> TTSResult<SynthesizedAudio> {
        debug!(
            model = %self.config.model_id,
            output_format = %self.config.output_format,
            chars = text.chars().count(),
            "Requesting ElevenLabs synthesis"
        );

        let response = self
            .build_request(text)
            .send()
            .await
            .map_err(|e| network_error(PROVIDER, e))?;

        read_audio_response(PROVIDER, response, self.encoding).await
    }
}
