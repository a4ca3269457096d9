//! YAML runtime configuration.
//!
//! Every field is optional; an empty file yields [`RuntimeConfig::default`].
//!
//! ```yaml
//! provider: openai
//! model: gpt-4o-mini
//! timeout: 45s
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

use crate::providers::{CompletionConfig, ProviderRegistry};

/// Errors from loading or validating a [`RuntimeConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Runtime settings for building an LLM-backed workflow.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Registry name of the provider (`anthropic`, `openai`).
    pub provider: String,

    /// Model name. `None` uses the provider's default model.
    pub model: Option<String>,

    pub max_tokens: u32,

    pub temperature: f32,

    /// Upper bound on one judge call, e.g. `30s` or `1m 30s`.
    #[serde(with = "humantime_duration")]
    pub timeout: Duration,

    /// Endpoint override (proxies, OpenAI-compatible servers).
    pub base_url: Option<String>,

    /// Inline API key. Prefer the provider's environment variable.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Assert JSON Schema `format` keywords. Off by default.
    pub validate_formats: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        let completion = CompletionConfig::default();
        Self {
            provider: "anthropic".to_string(),
            model: None,
            max_tokens: completion.max_tokens,
            temperature: completion.temperature,
            timeout: completion.timeout,
            base_url: None,
            api_key: None,
            validate_formats: false,
        }
    }
}

impl std::fmt::Debug for RuntimeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuntimeConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("validate_formats", &self.validate_formats)
            .finish()
    }
}

impl RuntimeConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        // serde_yaml reads an empty document as unit, not as an empty map
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&yaml)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.provider.trim().is_empty() {
            return Err(ConfigError::Invalid("provider must not be empty".into()));
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::Invalid("timeout must be greater than zero".into()));
        }
        if self.max_tokens == 0 {
            return Err(ConfigError::Invalid("max_tokens must be greater than zero".into()));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::Invalid(format!(
                "temperature must be within 0.0..=2.0, got {}",
                self.temperature
            )));
        }
        Ok(())
    }

    /// [`validate`](Self::validate), plus check the provider is registered.
    pub fn validate_against(&self, registry: &ProviderRegistry) -> Result<(), ConfigError> {
        self.validate()?;
        if !registry.has_provider(&self.provider) {
            return Err(ConfigError::Invalid(format!(
                "unknown provider '{}', available: {}",
                self.provider,
                registry.available_types().join(", ")
            )));
        }
        Ok(())
    }

    /// Completion settings for the judge call.
    pub fn completion_config(&self, default_model: &str) -> CompletionConfig {
        CompletionConfig {
            model: self
                .model
                .clone()
                .unwrap_or_else(|| default_model.to_string()),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            timeout: self.timeout,
            ..CompletionConfig::default()
        }
    }

    /// JSON config handed to the provider factory.
    pub fn provider_config(&self) -> JsonValue {
        let mut config = serde_json::Map::new();
        if let Some(url) = &self.base_url {
            config.insert("base_url".into(), JsonValue::String(url.clone()));
        }
        if let Some(key) = &self.api_key {
            config.insert("api_key".into(), JsonValue::String(key.clone()));
        }
        JsonValue::Object(config)
    }
}

mod humantime_duration {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&humantime::format_duration(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(deserializer)?;
        humantime::parse_duration(&raw).map_err(serde::de::Error::custom)
    }
}
