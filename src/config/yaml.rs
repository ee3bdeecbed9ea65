use serde::Deserialize;
use std::path::PathBuf;

use super::ConfigError;

/// Complete YAML configuration structure
///
/// All fields are optional to allow partial configuration. Values present here take
/// precedence over environment variables.
///
/// # Example YAML structure
/// ```yaml
/// server:
///   host: "0.0.0.0"
///   port: 3000
///
/// providers:
///   openai_api_key: "sk-..."
///   elevenlabs_api_key: "your-elevenlabs-key"
///
/// rewrite:
///   enabled: true
///   model: "gpt-4o-mini"
///
/// tts:
///   voice_id: "RGymW84CSmfVugnA5tvA"
///   model_id: "eleven_turbo_v2_5"
///   language_code: "pt-BR"
///   output_format: "mp3_44100_128"
///   voice_settings:
///     stability: 0.7
///     similarity_boost: 0.9
///     style: 0.3
///     speed: 0.95
///   silence_pad_ms: 800
///   return_processed_text: false
///   fallback:
///     provider: "elevenlabs"
///     model_id: "eleven_multilingual_v2"
///     output_format: "pcm_16000"
///
/// storage:
///   account_id: "cloudflare-account"
///   access_key_id: "key"
///   secret_access_key: "secret"
///   bucket: "audios"
///   public_base_url: "https://cdn.example.com"
///
/// stt:
///   model: "whisper-1"
///   language: "pt"
///
/// limits:
///   request_timeout_seconds: 30
///   max_audio_bytes: 26214400
///
/// security:
///   cors_allowed_origins: "https://app.example.com"
///   rate_limit_requests_per_second: 60
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub server: Option<ServerYaml>,
    pub providers: Option<ProvidersYaml>,
    pub rewrite: Option<RewriteYaml>,
    pub tts: Option<TtsYaml>,
    pub storage: Option<StorageYaml>,
    pub stt: Option<SttYaml>,
    pub limits: Option<LimitsYaml>,
    pub security: Option<SecurityYaml>,
}

/// Server configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ServerYaml {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Provider API keys from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ProvidersYaml {
    pub openai_api_key: Option<String>,
    pub openai_base_url: Option<String>,
    pub elevenlabs_api_key: Option<String>,
    pub elevenlabs_base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RewriteYaml {
    pub enabled: Option<bool>,
    pub model: Option<String>,
}

/// Partial voice settings; unset fields keep the current value
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct VoiceSettingsYaml {
    pub stability: Option<f32>,
    pub similarity_boost: Option<f32>,
    pub style: Option<f32>,
    pub speed: Option<f32>,
    pub use_speaker_boost: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TtsYaml {
    pub voice_id: Option<String>,
    pub model_id: Option<String>,
    pub language_code: Option<String>,
    pub output_format: Option<String>,
    pub voice_settings: Option<VoiceSettingsYaml>,
    pub silence_pad_ms: Option<u32>,
    pub return_processed_text: Option<bool>,
    pub timeout_seconds: Option<u64>,
    pub fallback: Option<TtsFallbackYaml>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TtsFallbackYaml {
    /// `elevenlabs`, `openai` or `none`
    pub provider: Option<String>,
    pub model_id: Option<String>,
    pub output_format: Option<String>,
    pub voice_settings: Option<VoiceSettingsYaml>,
    pub openai_model: Option<String>,
    pub openai_voice: Option<String>,
    pub openai_format: Option<String>,
}

/// Object storage (Cloudflare R2) configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct StorageYaml {
    pub account_id: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub bucket: Option<String>,
    pub public_base_url: Option<String>,
    pub endpoint: Option<String>,
    pub region: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SttYaml {
    pub model: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LimitsYaml {
    pub request_timeout_seconds: Option<u64>,
    pub max_audio_bytes: Option<usize>,
    pub allow_private_audio_urls: Option<bool>,
}

/// Security configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SecurityYaml {
    pub cors_allowed_origins: Option<String>,
    pub rate_limit_requests_per_second: Option<u32>,
    pub rate_limit_burst_size: Option<u32>,
}

impl YamlConfig {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    /// Returns an error if:
    /// - The file cannot be read
    /// - The YAML is malformed
    /// - Fields have invalid types
    pub fn from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let config: YamlConfig = serde_yaml::from_str(&contents)?;

        Ok(config)
    }
}
