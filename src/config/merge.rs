use std::fmt::Display;
use std::str::FromStr;

use crate::core::tts::elevenlabs::VoiceSettings;

use super::utils::parse_value;
use super::yaml::{VoiceSettingsYaml, YamlConfig};
use super::{ConfigError, FallbackProvider, ServerConfig, env};

/// Build the final configuration: defaults, then environment, then YAML.
pub(super) fn merge_config(yaml: Option<YamlConfig>) -> Result<ServerConfig, ConfigError> {
    let mut config = ServerConfig::default();
    env::apply_env(&mut config)?;

    if let Some(yaml) = yaml {
        apply_yaml(&mut config, yaml)?;
    }

    Ok(config)
}

fn set<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

/// Parse an optional YAML string into `target`, naming the key on failure.
fn set_parsed<T>(target: &mut T, key: &str, value: Option<String>) -> Result<(), ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    if let Some(value) = value {
        *target = parse_value(key, &value)?;
    }
    Ok(())
}

fn set_some<T>(target: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *target = value;
    }
}

fn apply_voice_settings(settings: &mut VoiceSettings, yaml: Option<VoiceSettingsYaml>) {
    let Some(yaml) = yaml else {
        return;
    };
    set(&mut settings.stability, yaml.stability);
    set(&mut settings.similarity_boost, yaml.similarity_boost);
    set(&mut settings.style, yaml.style);
    set(&mut settings.speed, yaml.speed);
    set(&mut settings.use_speaker_boost, yaml.use_speaker_boost);
}

fn apply_yaml(config: &mut ServerConfig, yaml: YamlConfig) -> Result<(), ConfigError> {
    if let Some(server) = yaml.server {
        set(&mut config.host, server.host);
        set(&mut config.port, server.port);
    }

    if let Some(providers) = yaml.providers {
        set_some(&mut config.openai_api_key, providers.openai_api_key);
        set(&mut config.openai_base_url, providers.openai_base_url);
        set_some(&mut config.elevenlabs_api_key, providers.elevenlabs_api_key);
        set(&mut config.elevenlabs_base_url, providers.elevenlabs_base_url);
    }

    if let Some(rewrite) = yaml.rewrite {
        set(&mut config.text_rewrite_enabled, rewrite.enabled);
        set(&mut config.openai_text_model, rewrite.model);
    }

    if let Some(tts) = yaml.tts {
        set(&mut config.elevenlabs_voice_id, tts.voice_id);
        set(&mut config.elevenlabs_model_id, tts.model_id);
        set(&mut config.elevenlabs_language_code, tts.language_code);
        set(&mut config.elevenlabs_output_format, tts.output_format);
        apply_voice_settings(&mut config.voice_settings, tts.voice_settings);
        set(&mut config.silence_pad_ms, tts.silence_pad_ms);
        set(&mut config.tts_return_processed_text, tts.return_processed_text);
        set(&mut config.synthesis_timeout_seconds, tts.timeout_seconds);

        if let Some(fallback) = tts.fallback {
            if let Some(provider) = fallback.provider {
                config.tts_fallback =
                    parse_value::<FallbackProvider>("tts.fallback.provider", &provider)?;
            }
            set(&mut config.elevenlabs_fallback_model_id, fallback.model_id);
            set(
                &mut config.elevenlabs_fallback_output_format,
                fallback.output_format,
            );
            apply_voice_settings(&mut config.fallback_voice_settings, fallback.voice_settings);
            set_parsed(
                &mut config.openai_tts_model,
                "tts.fallback.openai_model",
                fallback.openai_model,
            )?;
            set_parsed(
                &mut config.openai_tts_voice,
                "tts.fallback.openai_voice",
                fallback.openai_voice,
            )?;
            set_parsed(
                &mut config.openai_tts_format,
                "tts.fallback.openai_format",
                fallback.openai_format,
            )?;
        }
    }

    if let Some(storage) = yaml.storage {
        set_some(&mut config.r2_account_id, storage.account_id);
        set_some(&mut config.r2_access_key_id, storage.access_key_id);
        set_some(&mut config.r2_secret_access_key, storage.secret_access_key);
        set_some(&mut config.r2_bucket, storage.bucket);
        set_some(&mut config.r2_public_base_url, storage.public_base_url);
        set_some(&mut config.r2_endpoint, storage.endpoint);
        set(&mut config.r2_region, storage.region);
    }

    if let Some(stt) = yaml.stt {
        set_parsed(&mut config.stt_model, "stt.model", stt.model)?;
        set(&mut config.stt_language, stt.language);
    }

    if let Some(limits) = yaml.limits {
        set(
            &mut config.request_timeout_seconds,
            limits.request_timeout_seconds,
        );
        set(&mut config.max_audio_bytes, limits.max_audio_bytes);
        set(
            &mut config.allow_private_audio_urls,
            limits.allow_private_audio_urls,
        );
    }

    if let Some(security) = yaml.security {
        set_some(
            &mut config.cors_allowed_origins,
            security.cors_allowed_origins,
        );
        set(
            &mut config.rate_limit_requests_per_second,
            security.rate_limit_requests_per_second,
        );
        set(
            &mut config.rate_limit_burst_size,
            security.rate_limit_burst_size,
        );
    }

    Ok(())
}
