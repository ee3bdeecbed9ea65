use std::time::Duration;

use reqwest::Client;
use tracing::{info, warn};

use super::download::{build_download_client, download_audio};
use super::openai::OpenAISTT;
use super::{STTError, STTResult};
use crate::config::ServerConfig;
use crate::core::audio::{DEFAULT_SNIFFED_FORMAT, sniff_audio_format};
use crate::utils::url_validation::validate_audio_url;

/// Bounds applied to caller-supplied audio downloads.
#[derive(Debug, Clone, Copy)]
pub struct DownloadLimits {
    pub max_bytes: usize,
    pub timeout: Duration,
    /// Skip the private-address screen (local development and tests)
    pub allow_private_urls: bool,
}

/// Downloads audio from a URL and returns its transcript.
///
/// No retries and no partial results: the first failure is returned.
pub struct Transcriber {
    provider: Option<OpenAISTT>,
    download_client: Client,
    limits: DownloadLimits,
}

impl Transcriber {
    pub fn new(provider: Option<OpenAISTT>, limits: DownloadLimits) -> STTResult<Self> {
        Ok(Self {
            provider,
            download_client: build_download_client(limits.timeout, limits.allow_private_urls)?,
            limits,
        })
    }

    /// Build from server configuration. Missing credentials leave transcription
    /// disabled rather than failing startup.
    pub fn from_config(config: &ServerConfig, api_client: &Client) -> STTResult<Self> {
        let provider = match config.openai_stt_config() {
            Some(stt_config) => Some(OpenAISTT::new(api_client.clone(), stt_config)?),
            None => {
                warn!("OPENAI_API_KEY not set, speech-to-text is disabled");
                None
            }
        };

        Self::new(
            provider,
            DownloadLimits {
                max_bytes: config.max_audio_bytes,
                timeout: Duration::from_secs(config.request_timeout_seconds),
                allow_private_urls: config.allow_private_audio_urls,
            },
        )
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    pub async fn transcribe(&self, audio_url: &str) -> STTResult<String> {
        let provider = self.provider.as_ref().ok_or_else(|| {
            STTError::ConfigurationError("OPENAI_API_KEY is not configured".to_string())
        })?;

        let url = validate_audio_url(audio_url, self.limits.allow_private_urls).await?;
        let audio = download_audio(&self.download_client, url, self.limits.max_bytes).await?;

        let format = sniff_audio_format(&audio).unwrap_or(DEFAULT_SNIFFED_FORMAT);
        info!(
            bytes = audio.len(),
            format = format.extension,
            "Audio fetched for transcription"
        );

        provider.transcribe(audio, format).await
    }
}
