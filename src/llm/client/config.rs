//! Completion client configuration.
//!
//! File values are loaded by [`crate::config::Config`]; env vars win over
//! the file:
//! - `LLM_ENDPOINT`: base URL of an OpenAI-compatible API
//! - `LLM_MODEL`: model name
//! - `LLM_TEMPERATURE`: generation temperature (0.0 - 2.0)
//! - `LLM_MAX_TOKENS`: maximum tokens in the reply
//! - `LLM_TIMEOUT_SECS`: request timeout

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::InsightError;

/// Configuration for the completion client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    /// API base URL (OpenAI, Groq, Together.ai, a local proxy...)
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Model to use for analysis
    #[serde(default = "default_model")]
    pub model: String,
    /// Temperature for generation
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Maximum tokens in response
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    "https://api.openai.com".to_string()
}

fn default_model() -> String {
    "gpt-4.1-mini".to_string()
}

fn default_temperature() -> f32 {
    0.2
}

fn default_max_tokens() -> u32 {
    800
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl LlmConfig {
    /// Check if the config equals the default (for skip_serializing_if).
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Apply overrides from an arbitrary lookup. Unparseable numbers are ignored.
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(val) = lookup("LLM_ENDPOINT") {
            self.endpoint = val;
        }
        if let Some(val) = lookup("LLM_MODEL") {
            self.model = val;
        }
        if let Some(t) = lookup("LLM_TEMPERATURE").and_then(|v| v.parse().ok()) {
            self.temperature = t;
        }
        if let Some(n) = lookup("LLM_MAX_TOKENS").and_then(|v| v.parse().ok()) {
            self.max_tokens = n;
        }
        if let Some(n) = lookup("LLM_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.timeout_secs = n;
        }
        self
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    /// Resolve an API path (e.g. `v1/models`) against the endpoint.
    pub fn url(&self, path: &str) -> Result<Url, InsightError> {
        let mut base = self.endpoint.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        Url::parse(&base)
            .and_then(|u| u.join(path.trim_start_matches('/')))
            .map_err(|e| InsightError::CallFailed(format!("invalid endpoint {}: {}", self.endpoint, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = LlmConfig::default();
        assert_eq!(config.model, "gpt-4.1-mini");
        assert!((config.temperature - 0.2).abs() < f32::EPSILON);
        assert!(config.is_default());
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("LLM_ENDPOINT", "https://api.groq.com/openai"),
            ("LLM_MODEL", "llama-3.1-70b-versatile"),
            ("LLM_TEMPERATURE", "0.5"),
            ("LLM_MAX_TOKENS", "not-a-number"),
            ("LLM_TIMEOUT_SECS", ""),
        ]
        .into_iter()
        .collect();

        let config = LlmConfig::default()
            .with_overrides_from(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.endpoint, "https://api.groq.com/openai");
        assert_eq!(config.model, "llama-3.1-70b-versatile");
        assert!((config.temperature - 0.5).abs() < f32::EPSILON);
        assert_eq!(config.max_tokens, 800);
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn test_url_join() {
        let config = LlmConfig::default();
        assert_eq!(
            config.url("v1/chat/completions").unwrap().as_str(),
            "https://api.openai.com/v1/chat/completions"
        );

        let groq = LlmConfig::default().with_endpoint("https://api.groq.com/openai/");
        assert_eq!(
            groq.url("/v1/models").unwrap().as_str(),
            "https://api.groq.com/openai/v1/models"
        );

        let bad = LlmConfig::default().with_endpoint("not a url");
        assert!(matches!(bad.url("v1/models"), Err(InsightError::CallFailed(_))));
    }

    #[test]
    fn test_partial_toml() {
        let config: LlmConfig = toml::from_str("model = \"gpt-4o-mini\"").unwrap();
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.endpoint, "https://api.openai.com");
    }
}
