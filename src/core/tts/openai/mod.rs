//! OpenAI TTS provider module.
//!
//! Text-to-speech over OpenAI's Audio Speech API, selectable as the fallback
//! provider.
//!
//! # Supported Models
//!
//! - `tts-1` - Standard quality, lower latency
//! - `tts-1-hd` - High definition quality, higher latency
//! - `gpt-4o-mini-tts` - Latest model with improved quality
//!
//! # Audio Formats
//!
//! mp3, opus, aac, flac, wav, pcm (24kHz 16-bit mono little-endian)
//!
//! # Example
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use voice_relay::core::tts::{OpenAITTS, SynthesisProvider};
//! use voice_relay::core::tts::openai::{AudioOutputFormat, OpenAITTSConfig, OpenAITTSModel, OpenAIVoice};
//!
//! let tts = OpenAITTS::new(reqwest::Client::new(), OpenAITTSConfig {
//!     api_key: "sk-...".to_string(),
//!     model: OpenAITTSModel::Tts1,
//!     voice: OpenAIVoice::Alloy,
//!     response_format: AudioOutputFormat::Mp3,
//!     base_url: "https://api.openai.com/v1".to_string(),
//!     timeout: Duration::from_secs(30),
//! })?;
//! let audio = tts.synthesize("Olá!").await?;
//! ```

mod config;
mod provider;

pub use config::{
    AudioOutputFormat, OPENAI_BASE_URL, OPENAI_PCM_SAMPLE_RATE, OpenAITTSConfig, OpenAITTSModel,
    OpenAIVoice,
};
pub use provider::OpenAITTS;
