//! ElevenLabs text-to-speech.
//!
//! Returns a complete audio file per request in the configured `output_format`.
//! `mp3_*` and `opus_*` formats are stored as is; `pcm_<rate>` output goes through
//! silence padding and WAV wrapping before upload.

mod config;
mod provider;

pub use config::{ELEVENLABS_BASE_URL, ElevenLabsConfig, VoiceSettings, encoding_for_output_format};
pub use provider::ElevenLabsTTS;
