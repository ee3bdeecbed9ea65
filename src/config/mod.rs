//! Configuration module for the voice relay
//!
//! This module handles server configuration from various sources: .env files, YAML files,
//! and environment variables. Priority: YAML > ENV vars > .env values > defaults.
//!
//! # Modules
//! - `yaml`: YAML configuration file loading
//! - `env`: Environment variable loading
//! - `merge`: Merging YAML and environment configurations
//! - `validation`: Configuration validation logic
//! - `utils`: Utility functions for configuration parsing
//!
//! # Example
//! ```rust,no_run
//! use voice_relay::config::ServerConfig;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load from environment variables only
//! let config = ServerConfig::from_env()?;
//!
//! // Load from a YAML file layered over environment variables
//! let config_path = PathBuf::from("config.yaml");
//! let config = ServerConfig::from_file(&config_path)?;
//!
//! println!("Server listening on {}", config.address());
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::core::rewrite::RewriteSettings;
use crate::core::storage::S3Settings;
use crate::core::stt::{OpenAISTTConfig, OpenAISTTModel};
use crate::core::tts::elevenlabs::{ELEVENLABS_BASE_URL, ElevenLabsConfig, VoiceSettings};
use crate::core::tts::openai::{
    AudioOutputFormat, OPENAI_BASE_URL, OpenAITTSConfig, OpenAITTSModel, OpenAIVoice,
};

mod env;
mod merge;
mod utils;
mod validation;
mod yaml;

pub use yaml::YamlConfig;

/// ElevenLabs voice used when none is configured.
pub const DEFAULT_ELEVENLABS_VOICE_ID: &str = "RGymW84CSmfVugnA5tvA";

/// 25 MiB, the transcription API's own upload limit.
pub const DEFAULT_MAX_AUDIO_BYTES: usize = 25 * 1024 * 1024;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Which provider serves the single synthesis retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackProvider {
    /// Same ElevenLabs voice with a different model, settings and output format
    #[default]
    ElevenLabs,
    /// OpenAI speech API (requires `OPENAI_API_KEY`)
    OpenAI,
    None,
}

impl FromStr for FallbackProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "elevenlabs" | "eleven_labs" | "eleven-labs" => Ok(Self::ElevenLabs),
            "openai" => Ok(Self::OpenAI),
            "none" | "off" | "disabled" | "" => Ok(Self::None),
            other => Err(format!(
                "unknown fallback provider '{other}', expected elevenlabs, openai or none"
            )),
        }
    }
}

/// Server configuration
///
/// Built once at startup and read-only afterwards. Secrets are zeroized on drop.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    // Server
    pub host: String,
    pub port: u16,

    // Text rewriting (OpenAI chat completions)
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub openai_text_model: String,
    pub text_rewrite_enabled: bool,

    // Primary synthesis (ElevenLabs)
    pub elevenlabs_api_key: Option<String>,
    pub elevenlabs_base_url: String,
    pub elevenlabs_voice_id: String,
    pub elevenlabs_model_id: String,
    /// Language hint sent to ElevenLabs; empty disables it
    pub elevenlabs_language_code: String,
    pub elevenlabs_output_format: String,
    pub voice_settings: VoiceSettings,

    // Synthesis fallback
    pub tts_fallback: FallbackProvider,
    pub elevenlabs_fallback_model_id: String,
    pub elevenlabs_fallback_output_format: String,
    pub fallback_voice_settings: VoiceSettings,
    pub openai_tts_model: OpenAITTSModel,
    pub openai_tts_voice: OpenAIVoice,
    pub openai_tts_format: AudioOutputFormat,

    // Post-processing and response shaping
    pub silence_pad_ms: u32,
    pub tts_return_processed_text: bool,

    // Storage (Cloudflare R2 / S3)
    pub r2_account_id: Option<String>,
    pub r2_access_key_id: Option<String>,
    pub r2_secret_access_key: Option<String>,
    pub r2_bucket: Option<String>,
    pub r2_public_base_url: Option<String>,
    /// Explicit endpoint; derived from the account id when unset
    pub r2_endpoint: Option<String>,
    pub r2_region: String,

    // Transcription
    pub stt_model: OpenAISTTModel,
    pub stt_language: String,

    // Limits
    pub request_timeout_seconds: u64,
    pub synthesis_timeout_seconds: u64,
    pub max_audio_bytes: usize,
    pub allow_private_audio_urls: bool,

    // Security
    /// Comma separated origins, or `*`
    pub cors_allowed_origins: Option<String>,
    pub rate_limit_requests_per_second: u32,
    pub rate_limit_burst_size: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,

            openai_api_key: None,
            openai_base_url: OPENAI_BASE_URL.to_string(),
            openai_text_model: "gpt-4o-mini".to_string(),
            text_rewrite_enabled: true,

            elevenlabs_api_key: None,
            elevenlabs_base_url: ELEVENLABS_BASE_URL.to_string(),
            elevenlabs_voice_id: DEFAULT_ELEVENLABS_VOICE_ID.to_string(),
            elevenlabs_model_id: "eleven_turbo_v2_5".to_string(),
            elevenlabs_language_code: "pt-BR".to_string(),
            elevenlabs_output_format: "mp3_44100_128".to_string(),
            voice_settings: VoiceSettings::expressive(),

            tts_fallback: FallbackProvider::ElevenLabs,
            elevenlabs_fallback_model_id: "eleven_multilingual_v2".to_string(),
            elevenlabs_fallback_output_format: "pcm_16000".to_string(),
            fallback_voice_settings: VoiceSettings::conservative(),
            openai_tts_model: OpenAITTSModel::Tts1,
            openai_tts_voice: OpenAIVoice::Alloy,
            openai_tts_format: AudioOutputFormat::Mp3,

            silence_pad_ms: 800,
            tts_return_processed_text: false,

            r2_account_id: None,
            r2_access_key_id: None,
            r2_secret_access_key: None,
            r2_bucket: None,
            r2_public_base_url: None,
            r2_endpoint: None,
            r2_region: "auto".to_string(),

            stt_model: OpenAISTTModel::Whisper1,
            stt_language: "pt".to_string(),

            request_timeout_seconds: 30,
            synthesis_timeout_seconds: 30,
            max_audio_bytes: DEFAULT_MAX_AUDIO_BYTES,
            allow_private_audio_urls: false,

            cors_allowed_origins: None,
            rate_limit_requests_per_second: 60,
            rate_limit_burst_size: 10,
        }
    }
}

/// Implement Drop to zeroize all secret fields when ServerConfig is dropped.
impl Drop for ServerConfig {
    fn drop(&mut self) {
        use zeroize::Zeroize;

        for secret in [
            &mut self.openai_api_key,
            &mut self.elevenlabs_api_key,
            &mut self.r2_access_key_id,
            &mut self.r2_secret_access_key,
        ]
        .into_iter()
        .flatten()
        {
            secret.zeroize();
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// `.env` values are loaded into the environment by `main` before this runs.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = merge::merge_config(None)?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a YAML file, with environment variables as the base.
    ///
    /// Priority order (highest to lowest):
    /// 1. YAML file values
    /// 2. Environment variables (actual ENV vars override .env values)
    /// 3. .env file values
    /// 4. Default values
    pub fn from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let yaml_config = yaml::YamlConfig::from_file(path)?;
        let config = merge::merge_config(Some(yaml_config))?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Get the server address as a string
    ///
    /// Returns the address in the format "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn synthesis_timeout(&self) -> Duration {
        Duration::from_secs(self.synthesis_timeout_seconds)
    }

    /// Rewriting settings, or `None` when rewriting is disabled or has no key.
    pub fn rewrite_settings(&self) -> Option<RewriteSettings> {
        if !self.text_rewrite_enabled {
            return None;
        }
        Some(RewriteSettings {
            api_key: self.openai_api_key.clone()?,
            model: self.openai_text_model.clone(),
            base_url: self.openai_base_url.clone(),
            timeout: self.request_timeout(),
        })
    }

    fn elevenlabs_language(&self) -> Option<String> {
        Some(self.elevenlabs_language_code.clone()).filter(|code| !code.is_empty())
    }

    /// Primary ElevenLabs configuration, `None` without an API key.
    pub fn elevenlabs_config(&self) -> Option<ElevenLabsConfig> {
        Some(ElevenLabsConfig {
            api_key: self.elevenlabs_api_key.clone()?,
            voice_id: self.elevenlabs_voice_id.clone(),
            model_id: self.elevenlabs_model_id.clone(),
            language_code: self.elevenlabs_language(),
            output_format: self.elevenlabs_output_format.clone(),
            voice_settings: self.voice_settings,
            base_url: self.elevenlabs_base_url.clone(),
            timeout: self.synthesis_timeout(),
        })
    }

    /// ElevenLabs retry configuration: same voice, fallback model and settings.
    pub fn elevenlabs_fallback_config(&self) -> Option<ElevenLabsConfig> {
        Some(ElevenLabsConfig {
            api_key: self.elevenlabs_api_key.clone()?,
            voice_id: self.elevenlabs_voice_id.clone(),
            model_id: self.elevenlabs_fallback_model_id.clone(),
            language_code: self.elevenlabs_language(),
            output_format: self.elevenlabs_fallback_output_format.clone(),
            voice_settings: self.fallback_voice_settings,
            base_url: self.elevenlabs_base_url.clone(),
            timeout: self.synthesis_timeout(),
        })
    }

    /// OpenAI speech configuration, `None` without an API key.
    pub fn openai_tts_config(&self) -> Option<OpenAITTSConfig> {
        Some(OpenAITTSConfig {
            api_key: self.openai_api_key.clone()?,
            model: self.openai_tts_model,
            voice: self.openai_tts_voice,
            response_format: self.openai_tts_format,
            base_url: self.openai_base_url.clone(),
            timeout: self.synthesis_timeout(),
        })
    }

    /// OpenAI transcription configuration, `None` without an API key.
    pub fn openai_stt_config(&self) -> Option<OpenAISTTConfig> {
        Some(OpenAISTTConfig {
            api_key: self.openai_api_key.clone()?,
            model: self.stt_model,
            language: self.stt_language.clone(),
            base_url: self.openai_base_url.clone(),
            timeout: self.request_timeout(),
        })
    }

    /// Storage endpoint: explicit `R2_ENDPOINT`, else derived from the account id.
    pub fn r2_endpoint_url(&self) -> Option<String> {
        self.r2_endpoint.clone().or_else(|| {
            self.r2_account_id
                .as_ref()
                .map(|account| format!("https://{account}.r2.cloudflarestorage.com"))
        })
    }

    /// Bucket connection settings, `None` unless bucket, endpoint and keys are all set.
    pub fn s3_settings(&self) -> Option<S3Settings> {
        Some(S3Settings {
            bucket: self.r2_bucket.clone()?,
            endpoint: self.r2_endpoint_url()?,
            region: self.r2_region.clone(),
            access_key_id: self.r2_access_key_id.clone()?,
            secret_access_key: self.r2_secret_access_key.clone()?,
            timeout: self.request_timeout(),
        })
    }
}
