use std::sync::Arc;

use reqwest::Client;
use tracing::{error, info, warn};

use super::base::{SynthesisProvider, TTSError, TTSResult};
use super::elevenlabs::ElevenLabsTTS;
use super::openai::OpenAITTS;
use crate::config::{FallbackProvider, ServerConfig};
use crate::core::audio::SynthesizedAudio;

/// Upper bound on provider calls per synthesis: the primary plus one fallback.
pub const MAX_SYNTHESIS_ATTEMPTS: usize = 2;

/// Ordered provider chain with a single-fallback policy.
///
/// The primary is always tried first. The next provider is tried only when the
/// previous failure [allows fallback](TTSError::allows_fallback), and never more than
/// [`MAX_SYNTHESIS_ATTEMPTS`] calls are made in total.
pub struct VoiceSynthesizer {
    chain: Vec<Arc<dyn SynthesisProvider>>,
    unconfigured_reason: String,
}

impl VoiceSynthesizer {
    pub fn new(
        primary: Arc<dyn SynthesisProvider>,
        fallback: Option<Arc<dyn SynthesisProvider>>,
    ) -> Self {
        let mut chain = vec![primary];
        chain.extend(fallback);
        Self {
            chain,
            unconfigured_reason: String::new(),
        }
    }

    /// A synthesizer that fails every call with a configuration error.
    pub fn unconfigured(reason: impl Into<String>) -> Self {
        Self {
            chain: Vec::new(),
            unconfigured_reason: reason.into(),
        }
    }

    /// Build the provider chain from server configuration.
    ///
    /// A missing or invalid primary leaves the synthesizer unconfigured; the fallback
    /// never stands in for it. A fallback that cannot be built is logged and skipped.
    pub fn from_config(config: &ServerConfig, client: &Client) -> Self {
        let Some(primary_config) = config.elevenlabs_config() else {
            warn!("ELEVENLABS_API_KEY not set, text-to-speech is disabled");
            return Self::unconfigured("ELEVENLABS_API_KEY is not configured");
        };

        let primary = match ElevenLabsTTS::new(client.clone(), primary_config) {
            Ok(tts) => Arc::new(tts) as Arc<dyn SynthesisProvider>,
            Err(e) => {
                error!(error = %e, "Primary synthesis provider is misconfigured");
                return Self::unconfigured(e.to_string());
            }
        };

        let fallback: Option<Arc<dyn SynthesisProvider>> = match config.tts_fallback {
            FallbackProvider::None => None,
            FallbackProvider::ElevenLabs => config
                .elevenlabs_fallback_config()
                .and_then(|cfg| match ElevenLabsTTS::new(client.clone(), cfg) {
                    Ok(tts) => Some(Arc::new(tts) as Arc<dyn SynthesisProvider>),
                    Err(e) => {
                        warn!(error = %e, "ElevenLabs fallback disabled");
                        None
                    }
                }),
            FallbackProvider::OpenAI => match config.openai_tts_config() {
                Some(cfg) => match OpenAITTS::new(client.clone(), cfg) {
                    Ok(tts) => Some(Arc::new(tts) as Arc<dyn SynthesisProvider>),
                    Err(e) => {
                        warn!(error = %e, "OpenAI fallback disabled");
                        None
                    }
                },
                None => {
                    warn!("TTS_FALLBACK_PROVIDER=openai but OPENAI_API_KEY is not set");
                    None
                }
            },
        };

        let synthesizer = Self::new(primary, fallback);
        info!(providers = ?synthesizer.provider_names(), "Voice synthesizer ready");
        synthesizer
    }

    pub fn is_configured(&self) -> bool {
        !self.chain.is_empty()
    }

    /// Fail fast with the configuration error a call would produce.
    pub fn ensure_configured(&self) -> TTSResult<()> {
        if self.is_configured() {
            Ok(())
        } else {
            Err(TTSError::InvalidConfiguration(
                self.unconfigured_reason.clone(),
            ))
        }
    }

    pub fn provider_names(&self) -> Vec<&'static str> {
        self.chain.iter().map(|p| p.name()).collect()
    }

    /// Synthesize `text`, falling back once on an eligible primary failure.
    pub async fn synthesize(&self, text: &str) -> TTSResult<SynthesizedAudio> {
        let mut providers = self.chain.iter().take(MAX_SYNTHESIS_ATTEMPTS);

        let Some(primary) = providers.next() else {
            return Err(TTSError::InvalidConfiguration(
                self.unconfigured_reason.clone(),
            ));
        };

        let mut last_error = match primary.synthesize(text).await {
            Ok(audio) => {
                info!(provider = primary.name(), bytes = audio.len(), "Synthesis succeeded");
                return Ok(audio);
            }
            Err(e) => e,
        };

        for fallback in providers {
            if !last_error.allows_fallback() {
                break;
            }
            warn!(
                failed = %last_error,
                fallback = fallback.name(),
                "Primary synthesis failed, trying fallback"
            );

            last_error = match fallback.synthesize(text).await {
                Ok(audio) => {
                    info!(
                        provider = fallback.name(),
                        bytes = audio.len(),
                        "Fallback synthesis succeeded"
                    );
                    return Ok(audio);
                }
                Err(e) => e,
            };
        }

        error!(error = %last_error, "Synthesis failed");
        Err(last_error)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use bytes::Bytes;

    use super::*;
    use crate::core::audio::AudioEncoding;

    /// Provider that replays a fixed list of outcomes and counts calls.
    struct ScriptedProvider {
        name: &'static str,
        outcomes: Mutex<Vec<TTSResult<&'static str>>>,
        calls: AtomicUsize,
    }

    impl ScriptedProvider {
        fn new(name: &'static str, outcomes: Vec<TTSResult<&'static str>>) -> Arc<Self> {
            Arc::new(Self {
                name,
                outcomes: Mutex::new(outcomes),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SynthesisProvider for ScriptedProvider {
        fn name(&self) -> &'static str {
            self.name
        }

        fn encoding(&self) -> AudioEncoding {
            AudioEncoding::Mp3
        }

        async fn synthesize(&self, _text: &str) -> TTSResult<SynthesizedAudio> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let outcome = self.outcomes.lock().unwrap().remove(0);
            outcome.map(|body| {
                SynthesizedAudio::new(
                    Bytes::from_static(body.as_bytes()),
                    AudioEncoding::Mp3,
                    self.name,
                )
            })
        }
    }

    fn status(status: u16) -> TTSError {
        TTSError::ProviderError {
            provider: "scripted",
            status,
            body: String::new(),
        }
    }

    #[tokio::test]
    async fn test_primary_success_skips_fallback() {
        let primary = ScriptedProvider::new("primary", vec![Ok("abc")]);
        let fallback = ScriptedProvider::new("fallback", vec![]);
        let synth = VoiceSynthesizer::new(primary.clone(), Some(fallback.clone()));

        let audio = synth.synthesize("hi").await.unwrap();
        assert_eq!(audio.provider, "primary");
        assert_eq!(primary.calls(), 1);
        assert_eq!(fallback.calls(), 0);
    }

    #[tokio::test]
    async fn test_validation_failure_uses_fallback_once() {
        let primary = ScriptedProvider::new("primary", vec![Err(status(422))]);
        let fallback = ScriptedProvider::new("fallback", vec![Ok("xyz")]);
        let synth = VoiceSynthesizer::new(primary.clone(), Some(fallback.clone()));

        let audio = synth.synthesize("hi").await.unwrap();
        assert_eq!(audio.provider, "fallback");
        assert_eq!(primary.calls(), 1);
        assert_eq!(fallback.calls(), 1);
    }

    #[tokio::test]
    async fn test_both_fail_returns_last_error() {
        let primary = ScriptedProvider::new("primary", vec![Err(status(500))]);
        let fallback = ScriptedProvider::new("fallback", vec![Err(status(503))]);
        let synth = VoiceSynthesizer::new(primary.clone(), Some(fallback.clone()));

        let err = synth.synthesize("hi").await.unwrap_err();
        assert_eq!(err.upstream_status(), Some(503));
        assert_eq!(primary.calls() + fallback.calls(), 2);
    }

    #[tokio::test]
    async fn test_auth_failure_does_not_fall_back() {
        let primary = ScriptedProvider::new("primary", vec![Err(status(401))]);
        let fallback = ScriptedProvider::new("fallback", vec![Ok("never")]);
        let synth = VoiceSynthesizer::new(primary.clone(), Some(fallback.clone()));

        let err = synth.synthesize("hi").await.unwrap_err();
        assert_eq!(err.upstream_status(), Some(401));
        assert_eq!(fallback.calls(), 0);
    }

    #[tokio::test]
    async fn test_no_fallback_configured() {
        let primary = ScriptedProvider::new("primary", vec![Err(TTSError::EmptyAudio("primary"))]);
        let synth = VoiceSynthesizer::new(primary.clone(), None);

        let err = synth.synthesize("hi").await.unwrap_err();
        assert!(matches!(err, TTSError::EmptyAudio(_)));
        assert_eq!(primary.calls(), 1);
    }

    #[tokio::test]
    async fn test_unconfigured_synthesizer() {
        let synth = VoiceSynthesizer::unconfigured("ELEVENLABS_API_KEY is not configured");
        assert!(!synth.is_configured());
        let err = synth.synthesize("hi").await.unwrap_err();
        assert!(matches!(err, TTSError::InvalidConfiguration(msg) if msg.contains("ELEVENLABS")));
    }
}
