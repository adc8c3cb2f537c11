//! Provider configuration parsed from a loose option bag.
//!
//! Options arrive as a JSON object (from the CLI, a settings file or a
//! caller). They are validated once into an immutable [`ProviderConfig`];
//! every problem is reported together.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::adapters::live::chat::DEFAULT_MAX_RETRIES;

/// Environment variable consulted when no `api_key` option is given.
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Loose key/value options accepted by handler constructors.
pub type ConfigOptions = Map<String, Value>;

/// Configuration rejected during parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// One or more options are missing or malformed.
    #[error("invalid provider configuration: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

impl ConfigError {
    /// Individual problems, one per offending option.
    #[must_use]
    pub fn issues(&self) -> &[String] {
        match self {
            Self::Invalid(issues) => issues,
        }
    }
}

/// Validated provider settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Credential; `None` leaves authentication to the provider's answer.
    pub api_key: Option<String>,
    /// Requested model, lowercased.
    pub model_id: String,
    /// Retries the transport may perform after the first attempt.
    pub max_retries: u32,
}

impl ProviderConfig {
    /// Parses `options`, falling back to the process environment for the key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] listing every rejected option.
    pub fn parse(options: &ConfigOptions) -> Result<Self, ConfigError> {
        Self::parse_with(options, |key| std::env::var(key).ok())
    }

    /// Parses `options`, resolving environment variables through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] listing every rejected option.
    pub fn parse_with<F>(options: &ConfigOptions, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut issues = Vec::new();

        let api_key = match present(options, "api_key") {
            None => lookup(OPENAI_API_KEY_ENV).filter(|key| !key.is_empty()),
            Some(Value::String(key)) if key.trim().is_empty() => {
                issues.push("api_key: must not be empty".to_string());
                None
            }
            Some(Value::String(key)) => Some(key.clone()),
            Some(_) => {
                issues.push("api_key: expected a string".to_string());
                None
            }
        };

        let model_id = match present(options, "model_id") {
            None => {
                issues.push("model_id: field required".to_string());
                String::new()
            }
            Some(Value::String(id)) if id.trim().is_empty() => {
                issues.push("model_id: must not be empty".to_string());
                String::new()
            }
            Some(Value::String(id)) => id.to_lowercase(),
            Some(_) => {
                issues.push("model_id: expected a string".to_string());
                String::new()
            }
        };

        let max_retries = match present(options, "max_retries") {
            None => DEFAULT_MAX_RETRIES,
            Some(value) => match value.as_u64().and_then(|n| u32::try_from(n).ok()) {
                Some(n) => n,
                None => {
                    issues.push("max_retries: expected a non-negative integer".to_string());
                    DEFAULT_MAX_RETRIES
                }
            },
        };

        if issues.is_empty() {
            Ok(Self { api_key, model_id, max_retries })
        } else {
            Err(ConfigError::Invalid(issues))
        }
    }
}

/// Option value, treating explicit `null` as absent.
fn present<'a>(options: &'a ConfigOptions, key: &str) -> Option<&'a Value> {
    options.get(key).filter(|value| !value.is_null())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn options(value: Value) -> ConfigOptions {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn explicit_values_win() {
        let config = ProviderConfig::parse_with(
            &options(json!({"api_key": "sk-explicit", "model_id": "GPT-4o", "max_retries": 5})),
            |_| Some("sk-env".into()),
        )
        .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("sk-explicit"));
        assert_eq!(config.model_id, "gpt-4o");
        assert_eq!(config.max_retries, 5);
    }

    #[test]
    fn api_key_falls_back_to_environment() {
        let config = ProviderConfig::parse_with(&options(json!({"model_id": "gpt-4o"})), |key| {
            (key == OPENAI_API_KEY_ENV).then(|| "sk-env".to_string())
        })
        .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("sk-env"));
        assert_eq!(config.max_retries, DEFAULT_MAX_RETRIES);
    }

    #[test]
    fn null_api_key_also_falls_back() {
        let config = ProviderConfig::parse_with(
            &options(json!({"api_key": null, "model_id": "gpt-4o"})),
            |_| Some("sk-env".into()),
        )
        .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("sk-env"));
    }

    #[test]
    fn missing_key_everywhere_is_absent_not_an_error() {
        let config = ProviderConfig::parse_with(&options(json!({"model_id": "gpt-4o"})), |_| {
            Some(String::new())
        })
        .unwrap();
        assert_eq!(config.api_key, None);
    }

    #[test]
    fn all_problems_are_reported_together() {
        let err = ProviderConfig::parse_with(
            &options(json!({"api_key": "  ", "max_retries": -1})),
            no_env,
        )
        .unwrap_err();
        let issues = err.issues();
        assert_eq!(issues.len(), 3);
        assert!(issues.iter().any(|i| i.starts_with("api_key")));
        assert!(issues.iter().any(|i| i.starts_with("model_id")));
        assert!(issues.iter().any(|i| i.starts_with("max_retries")));
        assert!(err.to_string().starts_with("invalid provider configuration"));
    }

    #[test]
    fn blank_or_mistyped_model_id_is_rejected() {
        for bad in [json!({"model_id": "   "}), json!({"model_id": 4})] {
            let err = ProviderConfig::parse_with(&options(bad), no_env).unwrap_err();
            assert_eq!(err.issues().len(), 1);
            assert!(err.issues()[0].starts_with("model_id"));
        }
    }

    #[test]
    fn unknown_options_are_ignored() {
        let config = ProviderConfig::parse_with(
            &options(json!({"model_id": "gpt-4o-mini", "temperature": 0.3})),
            no_env,
        )
        .unwrap();
        assert_eq!(config.model_id, "gpt-4o-mini");
    }
}
