//! Configuration types for OpenAI TTS API.
//!
//! This module contains configuration types for OpenAI's text-to-speech API:
//! - Model selection (tts-1, tts-1-hd, gpt-4o-mini-tts)
//! - Voice selection (11 available voices)
//! - Audio output format
//! - Connection settings for the speech endpoint

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::audio::AudioEncoding;

/// Default OpenAI API base URL
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Sample rate of OpenAI `pcm` output
pub const OPENAI_PCM_SAMPLE_RATE: u32 = 24000;

// =============================================================================
// OpenAI TTS Models
// =============================================================================

/// Supported OpenAI TTS models.
///
/// OpenAI offers several TTS models:
/// - `tts-1`: Standard quality, lower latency
/// - `tts-1-hd`: High definition quality, higher latency
/// - `gpt-4o-mini-tts`: Latest model with improved quality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OpenAITTSModel {
    /// Standard quality TTS model - good balance of quality and latency
    #[default]
    #[serde(rename = "tts-1")]
    Tts1,
    /// High definition TTS model - best quality, higher latency
    #[serde(rename = "tts-1-hd")]
    Tts1Hd,
    /// GPT-4o mini TTS model - latest improvements
    #[serde(rename = "gpt-4o-mini-tts")]
    Gpt4oMiniTts,
}

impl OpenAITTSModel {
    /// Convert to the API parameter value.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tts1 => "tts-1",
            Self::Tts1Hd => "tts-1-hd",
            Self::Gpt4oMiniTts => "gpt-4o-mini-tts",
        }
    }
}

impl FromStr for OpenAITTSModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tts-1" | "tts1" => Ok(Self::Tts1),
            "tts-1-hd" | "tts1-hd" | "tts1hd" => Ok(Self::Tts1Hd),
            "gpt-4o-mini-tts" | "gpt4o-mini-tts" => Ok(Self::Gpt4oMiniTts),
            other => Err(format!("unknown OpenAI TTS model '{other}'")),
        }
    }
}

impl std::fmt::Display for OpenAITTSModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// OpenAI TTS Voices
// =============================================================================

/// Available voices for OpenAI TTS.
///
/// OpenAI provides 11 distinct voices with different characteristics:
/// - Alloy, Echo, Fable, Onyx, Nova, Shimmer: Original voices
/// - Ash, Ballad, Coral, Sage, Verse: Additional voices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpenAIVoice {
    /// Alloy voice
    #[default]
    Alloy,
    /// Ash voice
    Ash,
    /// Ballad voice
    Ballad,
    /// Coral voice
    Coral,
    /// Echo voice
    Echo,
    /// Fable voice
    Fable,
    /// Onyx voice
    Onyx,
    /// Nova voice
    Nova,
    /// Sage voice
    Sage,
    /// Shimmer voice
    Shimmer,
    /// Verse voice
    Verse,
}

impl OpenAIVoice {
    /// Convert to the API parameter value.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alloy => "alloy",
            Self::Ash => "ash",
            Self::Ballad => "ballad",
            Self::Coral => "coral",
            Self::Echo => "echo",
            Self::Fable => "fable",
            Self::Onyx => "onyx",
            Self::Nova => "nova",
            Self::Sage => "sage",
            Self::Shimmer => "shimmer",
            Self::Verse => "verse",
        }
    }
}

impl FromStr for OpenAIVoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "alloy" => Ok(Self::Alloy),
            "ash" => Ok(Self::Ash),
            "ballad" => Ok(Self::Ballad),
            "coral" => Ok(Self::Coral),
            "echo" => Ok(Self::Echo),
            "fable" => Ok(Self::Fable),
            "onyx" => Ok(Self::Onyx),
            "nova" => Ok(Self::Nova),
            "sage" => Ok(Self::Sage),
            "shimmer" => Ok(Self::Shimmer),
            "verse" => Ok(Self::Verse),
            other => Err(format!("unknown OpenAI voice '{other}'")),
        }
    }
}

impl std::fmt::Display for OpenAIVoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Audio Output Format
// =============================================================================

/// Supported audio output formats for OpenAI TTS.
///
/// The default response format is mp3. PCM output is 24kHz mono.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioOutputFormat {
    /// MP3 format (default)
    #[default]
    Mp3,
    /// Opus format
    Opus,
    /// AAC format
    Aac,
    /// FLAC format
    Flac,
    /// WAV format
    Wav,
    /// Raw PCM format (24kHz 16-bit mono little-endian)
    Pcm,
}

impl AudioOutputFormat {
    /// Convert to the API parameter value.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Opus => "opus",
            Self::Aac => "aac",
            Self::Flac => "flac",
            Self::Wav => "wav",
            Self::Pcm => "pcm",
        }
    }

    /// Encoding of the bytes returned for this format.
    ///
    /// OpenAI PCM output is 24kHz 16-bit mono little-endian.
    #[inline]
    pub fn encoding(&self) -> AudioEncoding {
        match self {
            Self::Mp3 => AudioEncoding::Mp3,
            Self::Opus => AudioEncoding::Opus,
            Self::Aac => AudioEncoding::Aac,
            Self::Flac => AudioEncoding::Flac,
            Self::Wav => AudioEncoding::Wav,
            Self::Pcm => AudioEncoding::Pcm {
                sample_rate: OPENAI_PCM_SAMPLE_RATE,
            },
        }
    }
}

impl FromStr for AudioOutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mp3" | "mpeg" => Ok(Self::Mp3),
            "opus" => Ok(Self::Opus),
            "aac" => Ok(Self::Aac),
            "flac" => Ok(Self::Flac),
            "wav" => Ok(Self::Wav),
            "pcm" | "linear16" | "raw" => Ok(Self::Pcm),
            other => Err(format!("unknown OpenAI audio format '{other}'")),
        }
    }
}

impl std::fmt::Display for AudioOutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Provider configuration
// =============================================================================

/// Settings for the OpenAI speech endpoint.
#[derive(Debug, Clone)]
pub struct OpenAITTSConfig {
    pub api_key: String,
    pub model: OpenAITTSModel,
    pub voice: OpenAIVoice,
    pub response_format: AudioOutputFormat,
    pub base_url: String,
    pub timeout: Duration,
}

impl OpenAITTSConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.api_key.trim().is_empty() {
            return Err("OpenAI API key is required".to_string());
        }
        Ok(())
    }

    /// Speech endpoint under the configured base URL.
    pub fn endpoint(&self) -> String {
        format!("{}/audio/speech", self.base_url.trim_end_matches('/'))
    }
}

impl Drop for OpenAITTSConfig {
    fn drop(&mut self) {
        use zeroize::Zeroize;
        self.api_key.zeroize();
    }
}
