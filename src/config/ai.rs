//! LLM provider configuration (C10, backing C7).

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Configuration for the Anthropic chat-completion adapter.
///
/// Only one provider is modeled, matching the spec's single `AIProvider`
/// port — unlike the teacher's multi-provider failover setup, this crate
/// has no fallback provider to configure.
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// Anthropic API key. Absent in local/test configurations that inject a
    /// mock provider instead.
    pub anthropic_api_key: Option<Secret<String>>,

    /// Model id, e.g. `claude-sonnet-4-20250514`.
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL for the API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries on transient failures.
    #[serde(default = "default_retries")]
    pub max_retries: u32,
}

impl AiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn has_credential(&self) -> bool {
        self.anthropic_api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().is_empty())
    }

    /// Validates that a credential is present and the model name is non-empty.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.has_credential() {
            return Err(ValidationError::MissingRequired("ANTHROPIC_API_KEY"));
        }
        if self.model.trim().is_empty() {
            return Err(ValidationError::MissingRequired("AI_MODEL"));
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            anthropic_api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
        }
    }
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_base_url() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_timeout() -> u64 {
    120
}

fn default_retries() -> u32 {
    3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_expected_model_and_timeouts() {
        let config = AiConfig::default();
        assert_eq!(config.model, "claude-sonnet-4-20250514");
        assert_eq!(config.timeout_secs, 120);
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn timeout_converts_to_duration() {
        let config = AiConfig {
            timeout_secs: 60,
            ..Default::default()
        };
        assert_eq!(config.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn has_credential_is_false_without_a_key() {
        assert!(!AiConfig::default().has_credential());
    }

    #[test]
    fn has_credential_is_true_with_a_non_empty_key() {
        let config = AiConfig {
            anthropic_api_key: Some(Secret::new("sk-ant-xxx".to_string())),
            ..Default::default()
        };
        assert!(config.has_credential());
    }

    #[test]
    fn validate_fails_without_a_credential() {
        assert!(AiConfig::default().validate().is_err());
    }

    #[test]
    fn validate_passes_with_a_credential() {
        let config = AiConfig {
            anthropic_api_key: Some(Secret::new("sk-ant-xxx".to_string())),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
