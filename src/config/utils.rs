use std::env;
use std::fmt::Display;
use std::str::FromStr;

use super::ConfigError;

/// Read an environment variable, treating unset and blank values alike.
pub(super) fn env_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// First non-blank variable among `keys`.
pub(super) fn env_var_any(keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| env_var(key))
}

/// Parse a value, naming the key on failure.
pub(super) fn parse_value<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    value.parse::<T>().map_err(|e| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// Read and parse an environment variable if it is set.
pub(super) fn env_parse<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    env_var(key).map(|v| parse_value(key, &v)).transpose()
}

/// Parse booleans the way operators write them in `.env` files.
pub(super) fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: "expected true/false".to_string(),
        }),
    }
}

pub(super) fn env_bool(key: &str) -> Result<Option<bool>, ConfigError> {
    env_var(key).map(|v| parse_bool(key, &v)).transpose()
}
