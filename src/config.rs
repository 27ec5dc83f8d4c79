//! API credential and endpoint configuration.
//!
//! Keys come from the environment (a `.env` file is loaded in `main`);
//! nothing here is persisted. User preferences live in `settings`.

use std::env;

use anyhow::Result;

use crate::models::Provider;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";

/// Resolved provider credentials and endpoints.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub openai_base_url: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub anthropic_base_url: Option<String>,
}

impl Config {
    /// Read configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            openai_api_key: non_empty(env::var("OPENAI_API_KEY").ok()),
            openai_base_url: non_empty(env::var("OPENAI_BASE_URL").ok()),
            anthropic_api_key: non_empty(env::var("ANTHROPIC_API_KEY").ok()),
            anthropic_base_url: non_empty(env::var("ANTHROPIC_BASE_URL").ok()),
        }
    }

    /// API key for `provider`, with a remediation hint on failure.
    pub fn api_key(&self, provider: Provider) -> Result<String> {
        let (key, var) = match provider {
            Provider::OpenAi => (&self.openai_api_key, "OPENAI_API_KEY"),
            Provider::Anthropic => (&self.anthropic_api_key, "ANTHROPIC_API_KEY"),
        };
        key.clone().ok_or_else(|| {
            anyhow::anyhow!(
                "No API key found for {provider}. Set {var} in the environment or in a .env file."
            )
        })
    }

    /// Whether a key is configured for `provider` at all.
    #[must_use]
    pub fn has_api_key(&self, provider: Provider) -> bool {
        match provider {
            Provider::OpenAi => self.openai_api_key.is_some(),
            Provider::Anthropic => self.anthropic_api_key.is_some(),
        }
    }

    /// Base URL for `provider`, without a trailing slash.
    #[must_use]
    pub fn base_url(&self, provider: Provider) -> String {
        let base = match provider {
            Provider::OpenAi => self
                .openai_base_url
                .as_deref()
                .unwrap_or(DEFAULT_OPENAI_BASE_URL),
            Provider::Anthropic => self
                .anthropic_base_url
                .as_deref()
                .unwrap_or(DEFAULT_ANTHROPIC_BASE_URL),
        };
        base.trim_end_matches('/').to_string()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_keys() -> Config {
        Config {
            openai_api_key: Some("sk-test".to_string()),
            openai_base_url: None,
            anthropic_api_key: None,
            anthropic_base_url: Some("https://proxy.example/anthropic/".to_string()),
        }
    }

    #[test]
    fn api_key_errors_mention_the_env_var() {
        let config = config_with_keys();
        assert_eq!(config.api_key(Provider::OpenAi).unwrap(), "sk-test");

        let err = config.api_key(Provider::Anthropic).unwrap_err();
        assert!(err.to_string().contains("ANTHROPIC_API_KEY"));
    }

    #[test]
    fn base_url_defaults_and_trims_trailing_slash() {
        let config = config_with_keys();
        assert_eq!(config.base_url(Provider::OpenAi), DEFAULT_OPENAI_BASE_URL);
        assert_eq!(
            config.base_url(Provider::Anthropic),
            "https://proxy.example/anthropic"
        );
    }

    #[test]
    fn blank_env_values_count_as_missing() {
        assert_eq!(non_empty(Some("   ".to_string())), None);
        assert_eq!(non_empty(Some(String::new())), None);
        assert_eq!(non_empty(Some("x".to_string())), Some("x".to_string()));
    }
}
