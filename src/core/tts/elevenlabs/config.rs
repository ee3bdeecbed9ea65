//! Configuration types for the ElevenLabs text-to-speech API.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::audio::AudioEncoding;

/// Default ElevenLabs API base URL
pub const ELEVENLABS_BASE_URL: &str = "https://api.elevenlabs.io";

/// Voice quality parameters sent with every synthesis request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoiceSettings {
    pub stability: f32,
    pub similarity_boost: f32,
    pub style: f32,
    pub speed: f32,
    pub use_speaker_boost: bool,
}

impl VoiceSettings {
    /// Expressive settings used for the primary attempt.
    pub const fn expressive() -> Self {
        Self {
            stability: 0.7,
            similarity_boost: 0.9,
            style: 0.3,
            speed: 0.95,
            use_speaker_boost: true,
        }
    }

    /// Conservative settings used when retrying after a primary failure.
    pub const fn conservative() -> Self {
        Self {
            stability: 0.85,
            similarity_boost: 0.75,
            style: 0.0,
            speed: 1.0,
            use_speaker_boost: true,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("stability", self.stability),
            ("similarity_boost", self.similarity_boost),
            ("style", self.style),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("{name} must be between 0.0 and 1.0, got {value}"));
            }
        }
        if !(0.5..=2.0).contains(&self.speed) {
            return Err(format!(
                "speed must be between 0.5 and 2.0, got {}",
                self.speed
            ));
        }
        Ok(())
    }
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self::expressive()
    }
}

/// Map an ElevenLabs `output_format` value (`mp3_44100_128`, `pcm_16000`, ...) to the
/// encoding of the returned bytes.
pub fn encoding_for_output_format(output_format: &str) -> Option<AudioEncoding> {
    let (codec, rest) = output_format.split_once('_')?;
    match codec {
        "mp3" => Some(AudioEncoding::Mp3),
        "opus" => Some(AudioEncoding::Opus),
        "pcm" => {
            let sample_rate: u32 = rest.parse().ok()?;
            (sample_rate > 0).then_some(AudioEncoding::Pcm { sample_rate })
        }
        _ => None,
    }
}

/// Everything needed to call one ElevenLabs voice/model combination.
#[derive(Debug, Clone)]
pub struct ElevenLabsConfig {
    pub api_key: String,
    pub voice_id: String,
    pub model_id: String,
    /// ISO language hint, omitted from the request when `None`
    pub language_code: Option<String>,
    pub output_format: String,
    pub voice_settings: VoiceSettings,
    pub base_url: String,
    pub timeout: Duration,
}

impl ElevenLabsConfig {
    /// Validate the configuration and resolve the output encoding.
    pub fn validate(&self) -> Result<AudioEncoding, String> {
        if self.api_key.trim().is_empty() {
            return Err("ElevenLabs API key is required".to_string());
        }
        if self.voice_id.trim().is_empty() {
            return Err("ElevenLabs voice id is required".to_string());
        }
        if self.model_id.trim().is_empty() {
            return Err("ElevenLabs model id is required".to_string());
        }
        self.voice_settings.validate()?;
        encoding_for_output_format(&self.output_format).ok_or_else(|| {
            format!(
                "Unsupported ElevenLabs output format: {}",
                self.output_format
            )
        })
    }

    /// Full synthesis endpoint for the configured voice.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1/text-to-speech/{}",
            self.base_url.trim_end_matches('/'),
            self.voice_id
        )
    }
}

impl Drop for ElevenLabsConfig {
    fn drop(&mut self) {
        use zeroize::Zeroize;
        self.api_key.zeroize();
    }
}
