//! Environment variable overlay.
//!
//! Every variable is optional; unset or blank values keep the current field.

use crate::core::tts::elevenlabs::VoiceSettings;

use super::utils::{env_bool, env_parse, env_var, env_var_any, parse_value};
use super::{ConfigError, FallbackProvider, ServerConfig};

/// Apply environment variables on top of `config`.
pub(super) fn apply_env(config: &mut ServerConfig) -> Result<(), ConfigError> {
    // Server
    if let Some(host) = env_var("HOST") {
        config.host = host;
    }
    if let Some(port) = env_parse("PORT")? {
        config.port = port;
    }

    // Providers
    if let Some(key) = env_var("OPENAI_API_KEY") {
        config.openai_api_key = Some(key);
    }
    if let Some(url) = env_var("OPENAI_BASE_URL") {
        config.openai_base_url = url;
    }
    if let Some(key) = env_var("ELEVENLABS_API_KEY") {
        config.elevenlabs_api_key = Some(key);
    }
    if let Some(url) = env_var("ELEVENLABS_BASE_URL") {
        config.elevenlabs_base_url = url;
    }

    // Rewriting
    if let Some(model) = env_var("OPENAI_TEXT_MODEL") {
        config.openai_text_model = model;
    }
    if let Some(enabled) = env_bool("TEXT_REWRITE_ENABLED")? {
        config.text_rewrite_enabled = enabled;
    }

    // Primary synthesis
    if let Some(voice) = env_var_any(&["ELEVENLABS_VOICE_ID_ROBERTA", "ELEVENLABS_VOICE_ID"]) {
        config.elevenlabs_voice_id = voice;
    }
    if let Some(model) = env_var("ELEVENLABS_MODEL_ID") {
        config.elevenlabs_model_id = model;
    }
    if let Ok(code) = std::env::var("ELEVENLABS_LANGUAGE_CODE") {
        // Blank disables the language hint
        config.elevenlabs_language_code = code.trim().to_string();
    }
    if let Some(format) = env_var("ELEVENLABS_OUTPUT_FORMAT") {
        config.elevenlabs_output_format = format;
    }
    apply_voice_settings(&mut config.voice_settings, "ELEVENLABS")?;

    // Fallback
    if let Some(provider) = env_var("TTS_FALLBACK_PROVIDER") {
        config.tts_fallback = parse_value::<FallbackProvider>("TTS_FALLBACK_PROVIDER", &provider)?;
    }
    if let Some(model) = env_var("ELEVENLABS_FALLBACK_MODEL_ID") {
        config.elevenlabs_fallback_model_id = model;
    }
    if let Some(format) = env_var("ELEVENLABS_FALLBACK_OUTPUT_FORMAT") {
        config.elevenlabs_fallback_output_format = format;
    }
    apply_voice_settings(&mut config.fallback_voice_settings, "ELEVENLABS_FALLBACK")?;
    if let Some(model) = env_parse("OPENAI_TTS_MODEL")? {
        config.openai_tts_model = model;
    }
    if let Some(voice) = env_parse("OPENAI_TTS_VOICE")? {
        config.openai_tts_voice = voice;
    }
    if let Some(format) = env_parse("OPENAI_TTS_FORMAT")? {
        config.openai_tts_format = format;
    }

    // Post-processing and response
    if let Some(pad) = env_parse("SILENCE_PAD_MS")? {
        config.silence_pad_ms = pad;
    }
    if let Some(enabled) = env_bool("TTS_RETURN_PROCESSED_TEXT")? {
        config.tts_return_processed_text = enabled;
    }

    // Storage
    if let Some(v) = env_var("R2_ACCOUNT_ID") {
        config.r2_account_id = Some(v);
    }
    if let Some(v) = env_var("R2_ACCESS_KEY_ID") {
        config.r2_access_key_id = Some(v);
    }
    if let Some(v) = env_var("R2_SECRET_ACCESS_KEY") {
        config.r2_secret_access_key = Some(v);
    }
    if let Some(v) = env_var("R2_BUCKET") {
        config.r2_bucket = Some(v);
    }
    if let Some(v) = env_var("R2_PUBLIC_BASE_URL") {
        config.r2_public_base_url = Some(v);
    }
    if let Some(v) = env_var("R2_ENDPOINT") {
        config.r2_endpoint = Some(v);
    }
    if let Some(v) = env_var("R2_REGION") {
        config.r2_region = v;
    }

    // Transcription
    if let Some(model) = env_parse("STT_MODEL")? {
        config.stt_model = model;
    }
    if let Some(language) = env_var("STT_LANGUAGE") {
        config.stt_language = language;
    }

    // Limits
    if let Some(secs) = env_parse("REQUEST_TIMEOUT_SECONDS")? {
        config.request_timeout_seconds = secs;
    }
    if let Some(secs) = env_parse("SYNTHESIS_TIMEOUT_SECONDS")? {
        config.synthesis_timeout_seconds = secs;
    }
    if let Some(max) = env_parse("MAX_AUDIO_BYTES")? {
        config.max_audio_bytes = max;
    }
    if let Some(allow) = env_bool("ALLOW_PRIVATE_AUDIO_URLS")? {
        config.allow_private_audio_urls = allow;
    }

    // Security
    if let Some(origins) = env_var("CORS_ALLOWED_ORIGINS") {
        config.cors_allowed_origins = Some(origins);
    }
    if let Some(rps) = env_parse("RATE_LIMIT_REQUESTS_PER_SECOND")? {
        config.rate_limit_requests_per_second = rps;
    }
    if let Some(burst) = env_parse("RATE_LIMIT_BURST_SIZE")? {
        config.rate_limit_burst_size = burst;
    }

    Ok(())
}

/// Read `{prefix}_STABILITY`, `{prefix}_SIMILARITY_BOOST`, `{prefix}_STYLE`,
/// `{prefix}_SPEED` and `{prefix}_SPEAKER_BOOST`.
fn apply_voice_settings(settings: &mut VoiceSettings, prefix: &str) -> Result<(), ConfigError> {
    if let Some(v) = env_parse(&format!("{prefix}_STABILITY"))? {
        settings.stability = v;
    }
    if let Some(v) = env_parse(&format!("{prefix}_SIMILARITY_BOOST"))? {
        settings.similarity_boost = v;
    }
    if let Some(v) = env_parse(&format!("{prefix}_STYLE"))? {
        settings.style = v;
    }
    if let Some(v) = env_parse(&format!("{prefix}_SPEED"))? {
        settings.speed = v;
    }
    if let Some(v) = env_bool(&format!("{prefix}_SPEAKER_BOOST"))? {
        settings.use_speaker_boost = v;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::stt::OpenAISTTModel;
    use crate::core::tts::openai::{AudioOutputFormat, OpenAIVoice};
    use serial_test::serial;
    use std::env;

    #[test]
    #[serial]
    fn test_fallback_voice_settings_use_their_own_prefix() {
        unsafe {
            env::set_var("ELEVENLABS_FALLBACK_STABILITY", "0.9");
            env::remove_var("ELEVENLABS_STABILITY");
        }

        let mut config = ServerConfig::default();
        apply_env(&mut config).unwrap();
        assert_eq!(config.fallback_voice_settings.stability, 0.9);
        assert_eq!(config.voice_settings.stability, 0.7);

        unsafe {
            env::remove_var("ELEVENLABS_FALLBACK_STABILITY");
        }
    }

    #[test]
    #[serial]
    fn test_blank_language_code_disables_hint() {
        unsafe {
            env::set_var("ELEVENLABS_LANGUAGE_CODE", "");
        }

        let mut config = ServerConfig::default();
        apply_env(&mut config).unwrap();
        assert!(config.elevenlabs_language_code.is_empty());

        unsafe {
            env::remove_var("ELEVENLABS_LANGUAGE_CODE");
        }
    }

    #[test]
    #[serial]
    fn test_invalid_fallback_provider() {
        unsafe {
            env::set_var("TTS_FALLBACK_PROVIDER", "azure");
        }

        let mut config = ServerConfig::default();
        let err = apply_env(&mut config).unwrap_err();
        assert!(err.to_string().contains("TTS_FALLBACK_PROVIDER"));

        unsafe {
            env::remove_var("TTS_FALLBACK_PROVIDER");
        }
    }

    #[test]
    #[serial]
    fn test_openai_model_keys_are_parsed() {
        unsafe {
            env::set_var("OPENAI_TTS_VOICE", "nova");
            env::set_var("OPENAI_TTS_FORMAT", "pcm");
            env::set_var("STT_MODEL", "gpt-4o-mini-transcribe");
        }

        let mut config = ServerConfig::default();
        let result = apply_env(&mut config);

        unsafe {
            env::remove_var("OPENAI_TTS_VOICE");
            env::remove_var("OPENAI_TTS_FORMAT");
            env::remove_var("STT_MODEL");
        }

        result.unwrap();
        assert_eq!(config.openai_tts_voice, OpenAIVoice::Nova);
        assert_eq!(config.openai_tts_format, AudioOutputFormat::Pcm);
        assert_eq!(config.stt_model, OpenAISTTModel::Gpt4oMiniTranscribe);
    }

    #[test]
    #[serial]
    fn test_unknown_openai_model_keys_are_rejected() {
        for (key, value) in [
            ("STT_MODEL", "whisper-2"),
            ("OPENAI_TTS_MODEL", "tts-2"),
            ("OPENAI_TTS_VOICE", "robot"),
            ("OPENAI_TTS_FORMAT", "mp4"),
        ] {
            unsafe {
                env::set_var(key, value);
            }

            let mut config = ServerConfig::default();
            let result = apply_env(&mut config);

            unsafe {
                env::remove_var(key);
            }

            let err = result.unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue { .. }), "{key}");
            assert!(err.to_string().contains(key), "{err}");
        }
    }
}
