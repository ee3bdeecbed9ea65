use std::sync::Arc;

use object_store::ObjectStore;
use reqwest::Client;
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::core::audio::AudioPostProcessor;
use crate::core::pipeline::SpeechPipeline;
use crate::core::rewrite::TextNormalizer;
use crate::core::storage::AudioStore;
use crate::core::stt::Transcriber;
use crate::core::tts::VoiceSynthesizer;
use crate::errors::{AppError, AppResult};

/// Application state shared by all handlers. Read-only after construction.
pub struct AppState {
    pub config: ServerConfig,
    pub pipeline: SpeechPipeline,
    pub transcriber: Transcriber,
}

impl AppState {
    /// Build state with the R2/S3 bucket described by `config`.
    pub fn new(config: ServerConfig) -> AppResult<Arc<Self>> {
        let store = AudioStore::from_config(&config)?;
        if store.is_none() {
            warn!("R2 storage is not fully configured, /tts will return 503");
        }
        Self::build(config, store)
    }

    /// Build state over an arbitrary object store (tests, local runs).
    pub fn with_object_store(
        config: ServerConfig,
        store: Arc<dyn ObjectStore>,
    ) -> AppResult<Arc<Self>> {
        let public_base_url = config.r2_public_base_url.clone().ok_or_else(|| {
            AppError::Configuration("R2_PUBLIC_BASE_URL is not configured".to_string())
        })?;
        let store = AudioStore::new(store, public_base_url, config.max_audio_bytes);
        Self::build(config, Some(store))
    }

    fn build(config: ServerConfig, store: Option<AudioStore>) -> AppResult<Arc<Self>> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {e}")))?;

        let normalizer = TextNormalizer::new(client.clone(), config.rewrite_settings());
        let synthesizer = VoiceSynthesizer::from_config(&config, &client);
        let post_processor = AudioPostProcessor::new(config.silence_pad_ms);
        let transcriber = Transcriber::from_config(&config, &client)?;

        info!(
            rewrite = normalizer.is_enabled(),
            tts = synthesizer.is_configured(),
            stt = transcriber.is_configured(),
            storage = store.is_some(),
            "Application state ready"
        );

        Ok(Arc::new(Self {
            pipeline: SpeechPipeline::new(normalizer, synthesizer, post_processor, store),
            transcriber,
            config,
        }))
    }
}
