use async_trait::async_trait;
use thiserror::Error;
use tracing::{error, warn};

use crate::core::audio::{AudioEncoding, SynthesizedAudio};
use crate::utils::text::{ERROR_BODY_LOG_LIMIT, truncate_for_log};

/// Error types for synthesis operations
#[derive(Debug, Error)]
pub enum TTSError {
    #[error("Invalid TTS configuration: {0}")]
    InvalidConfiguration(String),

    /// Non-2xx response. `body` is already truncated for logging.
    #[error("{provider} returned HTTP {status}: {body}")]
    ProviderError {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("{provider} request failed: {message}")]
    NetworkError {
        provider: &'static str,
        message: String,
        timeout: bool,
    },

    #[error("{0} returned an empty audio body")]
    EmptyAudio(&'static str),
}

impl TTSError {
    /// Upstream HTTP status, when the provider answered.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::ProviderError { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether a failure of the primary provider may be retried on the fallback.
    ///
    /// Validation and availability failures qualify. Credential, permission and
    /// not-found failures would fail the same way again.
    pub fn allows_fallback(&self) -> bool {
        match self {
            Self::InvalidConfiguration(_) => false,
            Self::ProviderError { status, .. } => {
                matches!(status, 400 | 408 | 422 | 429) || *status >= 500
            }
            Self::NetworkError { .. } | Self::EmptyAudio(_) => true,
        }
    }

    /// Message returned to HTTP callers, prefixed with `TTS: `.
    pub fn user_message(&self) -> String {
        let detail = match self {
            Self::ProviderError { body, status, .. } => extract_provider_message(body)
                .unwrap_or_else(|| format!("Request failed with status code {status}")),
            other => other.to_string(),
        };
        format!("TTS: {detail}")
    }
}

/// Pull a human readable message out of a provider's JSON error body.
///
/// Understands `{"error":{"message":..}}`, `{"detail":{"message":..}}`,
/// `{"detail":".."}` and `{"message":..}`.
pub fn extract_provider_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;

    ["/error/message", "/detail/message", "/detail", "/message"]
        .iter()
        .find_map(|pointer| value.pointer(pointer).and_then(|v| v.as_str()))
        .filter(|msg| !msg.trim().is_empty())
        .map(str::to_string)
}

/// Result type for synthesis operations
pub type TTSResult<T> = Result<T, TTSError>;

/// A hosted voice API that turns text into a complete audio buffer.
#[async_trait]
pub trait SynthesisProvider: Send + Sync {
    /// Short provider name used in logs and errors
    fn name(&self) -> &'static str;

    /// Encoding of the audio this provider returns
    fn encoding(&self) -> AudioEncoding;

    async fn synthesize(&self, text: &str) -> TTSResult<SynthesizedAudio>;
}

/// Convert a transport error into a [`TTSError::NetworkError`], logging it.
pub(crate) fn network_error(provider: &'static str, err: reqwest::Error) -> TTSError {
    let timeout = err.is_timeout();
    warn!(provider, timeout, error = %err, "Synthesis request failed");
    TTSError::NetworkError {
        provider,
        message: err.to_string(),
        timeout,
    }
}

/// Read a synthesis response into a [`SynthesizedAudio`].
///
/// Non-2xx statuses are logged with a truncated body and returned as
/// [`TTSError::ProviderError`]. An empty 2xx body is [`TTSError::EmptyAudio`].
pub(crate) async fn read_audio_response(
    provider: &'static str,
    response: reqwest::Response,
    encoding: AudioEncoding,
) -> TTSResult<SynthesizedAudio> {
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let body = truncate_for_log(&body, ERROR_BODY_LOG_LIMIT).into_owned();
        error!(
            provider,
            status = status.as_u16(),
            body = %body,
            "Synthesis provider returned an error"
        );
        return Err(TTSError::ProviderError {
            provider,
            status: status.as_u16(),
            body,
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| network_error(provider, e))?;

    if bytes.is_empty() {
        warn!(provider, "Synthesis provider returned an empty body");
        return Err(TTSError::EmptyAudio(provider));
    }

    Ok(SynthesizedAudio::new(bytes, encoding, provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider_error(status: u16, body: &str) -> TTSError {
        TTSError::ProviderError {
            provider: "elevenlabs",
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn test_fallback_eligibility() {
        for status in [400, 408, 422, 429, 500, 502, 503] {
            assert!(provider_error(status, "").allows_fallback(), "{status}");
        }
        for status in [401, 403, 404] {
            assert!(!provider_error(status, "").allows_fallback(), "{status}");
        }
        assert!(TTSError::EmptyAudio("openai").allows_fallback());
        assert!(
            TTSError::NetworkError {
                provider: "elevenlabs",
                message: "timed out".into(),
                timeout: true,
            }
            .allows_fallback()
        );
        assert!(!TTSError::InvalidConfiguration("missing key".into()).allows_fallback());
    }

    #[test]
    fn test_user_message_extracts_provider_detail() {
        let err = provider_error(
            422,
            r#"{"detail":{"status":"invalid","message":"Text is too long"}}"#,
        );
        assert_eq!(err.user_message(), "TTS: Text is too long");

        let err = provider_error(400, r#"{"error":{"message":"Bad voice","type":"invalid"}}"#);
        assert_eq!(err.user_message(), "TTS: Bad voice");

        let err = provider_error(404, r#"{"detail":"voice_not_found"}"#);
        assert_eq!(err.user_message(), "TTS: voice_not_found");
    }

    #[test]
    fn test_user_message_without_json_body() {
        let err = provider_error(502, "<html>bad gateway</html>");
        assert_eq!(
            err.user_message(),
            "TTS: Request failed with status code 502"
        );
        assert_eq!(err.upstream_status(), Some(502));
    }

    #[test]
    fn test_extract_provider_message_ignores_blank() {
        assert_eq!(extract_provider_message(r#"{"message":"  "}"#), None);
        assert_eq!(extract_provider_message("not json"), None);
    }
}
