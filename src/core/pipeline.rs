//! Text-to-speech pipeline: rewrite, synthesize, post-process, upload.

use thiserror::Error;
use tracing::{debug, info};

use crate::core::audio::AudioPostProcessor;
use crate::core::rewrite::TextNormalizer;
use crate::core::storage::{AudioStore, StorageError, StoredAudioRef};
use crate::core::tts::{TTSError, VoiceSynthesizer};

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error(transparent)]
    Synthesis(#[from] TTSError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Result of a successful pipeline run.
#[derive(Debug, Clone)]
pub struct SpeechOutput {
    pub stored: StoredAudioRef,
    /// Text actually sent to the synthesis provider
    pub processed_text: String,
}

/// Sequential text-to-speech pipeline.
///
/// Each step consumes the previous step's output; nothing runs concurrently within
/// one request. Missing synthesis or storage configuration is reported before any
/// outbound call is made.
pub struct SpeechPipeline {
    normalizer: TextNormalizer,
    synthesizer: VoiceSynthesizer,
    post_processor: AudioPostProcessor,
    store: Option<AudioStore>,
}

impl SpeechPipeline {
    pub fn new(
        normalizer: TextNormalizer,
        synthesizer: VoiceSynthesizer,
        post_processor: AudioPostProcessor,
        store: Option<AudioStore>,
    ) -> Self {
        Self {
            normalizer,
            synthesizer,
            post_processor,
            store,
        }
    }

    pub fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }

    pub fn synthesizer(&self) -> &VoiceSynthesizer {
        &self.synthesizer
    }

    pub fn store(&self) -> Option<&AudioStore> {
        self.store.as_ref()
    }

    pub async fn run(&self, text: &str, user_id: &str) -> Result<SpeechOutput, SpeechError> {
        let store = self.store.as_ref().ok_or(StorageError::NotConfigured)?;
        self.synthesizer.ensure_configured()?;

        let processed_text = self.normalizer.normalize(text).await;
        debug!(original = %text, processed = %processed_text, "Text ready for synthesis");

        let audio = self.synthesizer.synthesize(&processed_text).await?;
        let audio = self.post_processor.process(audio);

        let stored = store
            .store(
                audio.bytes.clone(),
                user_id,
                audio.extension(),
                audio.content_type(),
            )
            .await?;

        info!(
            provider = audio.provider,
            uri = %stored.uri,
            size = stored.size,
            "Speech stored"
        );

        Ok(SpeechOutput {
            stored,
            processed_text,
        })
    }
}
