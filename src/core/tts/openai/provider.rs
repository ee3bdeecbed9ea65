//! OpenAI TTS provider implementation.
//!
//! # API Reference
//!
//! - Endpoint: `POST {base}/audio/speech`
//! - Models: tts-1, tts-1-hd, gpt-4o-mini-tts
//! - Voices: alloy, ash, ballad, coral, echo, fable, onyx, nova, sage, shimmer, verse
//! - Output: mp3, opus, aac, flac, wav, pcm (24kHz)

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::debug;

use super::config::OpenAITTSConfig;
use crate::core::audio::{AudioEncoding, SynthesizedAudio};
use crate::core::tts::base::{
    SynthesisProvider, TTSError, TTSResult, network_error, read_audio_response,
};

const PROVIDER: &str = "openai";

/// OpenAI speech synthesis over the Audio Speech API.
pub struct OpenAITTS {
    client: Client,
    config: OpenAITTSConfig,
}

impl OpenAITTS {
    pub fn new(client: Client, config: OpenAITTSConfig) -> TTSResult<Self> {
        config.validate().map_err(TTSError::InvalidConfiguration)?;
        Ok(Self { client, config })
    }

    fn build_request(&self, text: &str) -> reqwest::RequestBuilder {
        let body = json!({
            "model": self.config.model.as_str(),
            "input": text,
            "voice": self.config.voice.as_str(),
            "response_format": self.config.response_format.as_str(),
        });

        self.client
            .post(self.config.endpoint())
            .bearer_auth(&self.config.api_key)
            .timeout(self.config.timeout)
            .json(&body)
    }
}

#[async_trait]
impl SynthesisProvider for OpenAITTS {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn encoding(&self) -> AudioEncoding {
        self.config.response_format.encoding()
    }

    async fn synthesize(&self, text: &str) -> TTSResult<SynthesizedAudio> {
        debug!(
            model = %self.config.model,
            voice = %self.config.voice,
            format = %self.config.response_format,
            "Requesting OpenAI synthesis"
        );

        let response = self
            .build_request(text)
            .send()
            .await
            .map_err(|e| network_error(PROVIDER, e))?;

        read_audio_response(PROVIDER, response, self.encoding()).await
    }
}
