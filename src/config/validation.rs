use url::Url;

use crate::core::audio::MAX_SILENCE_PAD_MS;

use super::{ConfigError, ServerConfig};

/// Reject configurations that would fail on every request.
///
/// Missing credentials are not errors here: the affected endpoint reports itself as
/// unconfigured at request time.
pub(super) fn validate(config: &ServerConfig) -> Result<(), ConfigError> {
    if config.port == 0 {
        return Err(ConfigError::Invalid("port must be non-zero".to_string()));
    }

    config
        .voice_settings
        .validate()
        .map_err(|e| ConfigError::Invalid(format!("voice settings: {e}")))?;
    config
        .fallback_voice_settings
        .validate()
        .map_err(|e| ConfigError::Invalid(format!("fallback voice settings: {e}")))?;

    if config.silence_pad_ms > MAX_SILENCE_PAD_MS {
        return Err(ConfigError::Invalid(format!(
            "SILENCE_PAD_MS must be at most {MAX_SILENCE_PAD_MS}, got {}",
            config.silence_pad_ms
        )));
    }

    if config.max_audio_bytes == 0 {
        return Err(ConfigError::Invalid(
            "MAX_AUDIO_BYTES must be greater than zero".to_string(),
        ));
    }

    if config.request_timeout_seconds == 0 || config.synthesis_timeout_seconds == 0 {
        return Err(ConfigError::Invalid(
            "timeouts must be greater than zero".to_string(),
        ));
    }

    if config.rate_limit_requests_per_second == 0 || config.rate_limit_burst_size == 0 {
        return Err(ConfigError::Invalid(
            "rate limit values must be greater than zero".to_string(),
        ));
    }

    if let Some(base) = &config.r2_public_base_url {
        let parsed = Url::parse(base).map_err(|e| ConfigError::InvalidValue {
            key: "R2_PUBLIC_BASE_URL".to_string(),
            value: base.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidValue {
                key: "R2_PUBLIC_BASE_URL".to_string(),
                value: base.clone(),
                reason: "must be an http(s) URL".to_string(),
            });
        }
    }

    Ok(())
}
