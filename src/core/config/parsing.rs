use std::env;
use std::str::FromStr;

use super::types::ConfigError;

pub(super) fn env_optional(key: &str) -> Option<String> {
    env::var(key).ok().map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}

pub(super) fn env_or_default(key: &str, default: &str) -> String {
    env_optional(key).unwrap_or_else(|| default.to_string())
}

/// Unset reads as `false`.
pub(super) fn env_flag(key: &str) -> bool {
    env_optional(key).is_some_and(|value| parse_bool(&value))
}

pub(super) fn env_number<T: FromStr>(key: &'static str, default: &str) -> Result<T, ConfigError> {
    let value = env_or_default(key, default);
    value.parse::<T>().map_err(|_| ConfigError::InvalidValue { field: key, value })
}

/// An empty result means "allow any origin".
pub(super) fn parse_cors_origins(value: Option<String>) -> Result<Vec<String>, ConfigError> {
    let Some(raw) = value.filter(|raw| !raw.trim().is_empty()) else {
        return Ok(Vec::new());
    };

    if raw.trim_start().starts_with('[') {
        return serde_json::from_str(&raw).map_err(|_| ConfigError::InvalidCors(raw.clone()));
    }

    Ok(raw.split(',').map(str::trim).filter(|item| !item.is_empty()).map(String::from).collect())
}

pub(super) fn parse_bool(value: &str) -> bool {
    ["1", "true", "yes", "on"].iter().any(|truthy| value.eq_ignore_ascii_case(truthy))
}
