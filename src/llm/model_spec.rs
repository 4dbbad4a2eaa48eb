//! Model identifier parsing and credential resolution.
//!
//! Stage models are configured as `provider:model` strings. Both supported
//! providers expose an OpenAI-compatible chat-completions endpoint, so a
//! parsed spec maps directly onto a [`ChatClient`].

use serde::{Deserialize, Serialize};

use super::chat::ChatClient;
use crate::config::ConfigError;

/// Supported LLM providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// OpenAI chat-completions API.
    OpenAi,
    /// Google Gemini via its OpenAI-compatible endpoint.
    Google,
}

impl ProviderKind {
    /// Base URL for the provider's OpenAI-compatible API.
    pub fn api_base(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "https://api.openai.com/v1",
            ProviderKind::Google => "https://generativelanguage.googleapis.com/v1beta/openai",
        }
    }

    /// Environment variable holding the provider's API key.
    pub fn env_var(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "OPENAI_API_KEY",
            ProviderKind::Google => "GOOGLE_API_KEY",
        }
    }

    /// Human-readable provider name as used in model identifiers.
    pub fn name(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Google => "google",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A parsed `provider:model` identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSpec {
    /// Provider the model belongs to.
    pub provider: ProviderKind,
    /// Provider-local model name.
    pub model: String,
}

impl ModelSpec {
    /// Parses a model identifier.
    ///
    /// A bare model name defaults to the `openai` provider; a leading
    /// `models/` prefix on the model name is stripped.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnsupportedProvider`] for unknown provider
    /// prefixes and [`ConfigError::ValidationFailed`] for empty model names.
    pub fn parse(identifier: &str) -> Result<Self, ConfigError> {
        let (provider_name, model) = match identifier.split_once(':') {
            Some((provider, model)) => (provider.to_ascii_lowercase(), model),
            None => ("openai".to_string(), identifier),
        };

        let provider = match provider_name.as_str() {
            "openai" => ProviderKind::OpenAi,
            "google" => ProviderKind::Google,
            other => return Err(ConfigError::UnsupportedProvider(other.to_string())),
        };

        let model = model.strip_prefix("models/").unwrap_or(model).trim();
        if model.is_empty() {
            return Err(ConfigError::ValidationFailed(format!(
                "model identifier '{}' has an empty model name",
                identifier
            )));
        }

        Ok(Self {
            provider,
            model: model.to_string(),
        })
    }

    /// Builds a [`ChatClient`] for this spec.
    ///
    /// `file_key` is the key from the configuration file, if any; the
    /// provider's environment variable takes precedence over it.
    pub fn client(&self, file_key: Option<&str>) -> Result<ChatClient, ConfigError> {
        let env_key = std::env::var(self.provider.env_var()).ok();
        let key = resolve_api_key(self.provider, env_key, file_key)?;
        Ok(ChatClient::new(
            self.provider.api_base(),
            key,
            self.model.clone(),
        ))
    }
}

impl std::fmt::Display for ModelSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.provider, self.model)
    }
}

/// Resolves the API key for a provider with explicit precedence:
/// environment override, then config-file value, then a fatal error.
///
/// Empty values at either level count as absent; there is no default
/// provider or key.
pub fn resolve_api_key(
    provider: ProviderKind,
    env_value: Option<String>,
    file_value: Option<&str>,
) -> Result<String, ConfigError> {
    if let Some(key) = env_value.filter(|k| !k.trim().is_empty()) {
        return Ok(key);
    }
    if let Some(key) = file_value.filter(|k| !k.trim().is_empty()) {
        return Ok(key.to_string());
    }
    Err(ConfigError::MissingApiKey {
        provider: provider.name().to_string(),
        env_var: provider.env_var().to_string(),
    })
}
