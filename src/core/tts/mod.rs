mod base;
pub mod elevenlabs;
pub mod openai;
mod synthesizer;

pub use base::{SynthesisProvider, TTSError, TTSResult, extract_provider_message};
pub use elevenlabs::{ElevenLabsConfig, ElevenLabsTTS, VoiceSettings};
pub use openai::{AudioOutputFormat, OpenAITTS, OpenAITTSConfig, OpenAITTSModel, OpenAIVoice};
pub use synthesizer::{MAX_SYNTHESIS_ATTEMPTS, VoiceSynthesizer};

