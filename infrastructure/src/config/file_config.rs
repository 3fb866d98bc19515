//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into runtime types.

use crate::providers::{AuthScheme, ProviderConfig};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("unknown provider preset: {0}")]
    UnknownPreset(String),

    #[error("provider.{0} is required for the custom preset")]
    MissingProviderField(&'static str),
}

/// Raw provider configuration from TOML (`[provider]` section)
///
/// A preset supplies the endpoint, model, and sampling defaults; every
/// field can be overridden individually.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Provider preset: "openai", "deepseek", or "custom".
    pub preset: String,
    /// Chat-completions endpoint URL (overrides the preset).
    pub endpoint: Option<String>,
    /// Model identifier (overrides the preset).
    pub model: Option<String>,
    /// Sampling temperature (overrides the preset).
    pub temperature: Option<f64>,
    /// Response token cap (overrides the preset).
    pub max_tokens: Option<u32>,
    /// Credential header name; default is `Authorization: Bearer`.
    pub auth_header: Option<String>,
    /// Append a timestamp query parameter to defeat response caching.
    pub cache_busting: Option<bool>,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            preset: "openai".to_string(),
            endpoint: None,
            model: None,
            temperature: None,
            max_tokens: None,
            auth_header: None,
            cache_busting: None,
        }
    }
}

impl FileProviderConfig {
    /// Resolve the preset and apply overrides.
    pub fn to_provider_config(&self) -> Result<ProviderConfig, ConfigValidationError> {
        let mut config = match self.preset.as_str() {
            "openai" => ProviderConfig::openai(),
            "deepseek" => ProviderConfig::deepseek(),
            "custom" => {
                let endpoint = self
                    .endpoint
                    .clone()
                    .ok_or(ConfigValidationError::MissingProviderField("endpoint"))?;
                let model = self
                    .model
                    .clone()
                    .ok_or(ConfigValidationError::MissingProviderField("model"))?;
                ProviderConfig::custom(endpoint, model)
            }
            other => return Err(ConfigValidationError::UnknownPreset(other.to_string())),
        };

        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(model) = &self.model {
            config.model = model.clone();
        }
        if let Some(temperature) = self.temperature {
            config.temperature = Some(temperature);
        }
        if let Some(max_tokens) = self.max_tokens {
            config.max_tokens = Some(max_tokens);
        }
        if self.auth_header.is_some() {
            config.auth_scheme = AuthScheme::from_header_name(self.auth_header.as_deref());
        }
        if let Some(cache_busting) = self.cache_busting {
            config.cache_busting = cache_busting;
        }

        Ok(config)
    }
}

/// Raw access configuration from TOML (`[access]` section)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAccessConfig {
    /// Environment variable consulted for the API key (default: "NEETCHAT_API_KEY").
    pub api_key_env: String,
    /// Direct API key; prefer the env var for anything shared.
    pub api_key: Option<String>,
    /// Path of the durable authentication flag file.
    pub auth_flag_path: Option<PathBuf>,
}

impl Default for FileAccessConfig {
    fn default() -> Self {
        Self {
            api_key_env: "NEETCHAT_API_KEY".to_string(),
            api_key: None,
            auth_flag_path: None,
        }
    }
}

impl FileAccessConfig {
    /// Resolve the configured API key: direct value first, then the env var.
    pub fn resolve_api_key(&self) -> Option<String> {
        if let Some(key) = &self.api_key {
            if !key.trim().is_empty() {
                return Some(key.clone());
            }
        }
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|v| !v.trim().is_empty())
    }
}

/// Raw verification configuration from TOML (`[verification]` section)
///
/// The email unlock route is available only when both endpoints are set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileVerificationConfig {
    /// Endpoint that emails a verification code.
    pub send_code_url: Option<String>,
    /// Endpoint that checks an entered code.
    pub verify_code_url: Option<String>,
}

impl FileVerificationConfig {
    /// Both endpoints, when the route is fully configured.
    pub fn endpoints(&self) -> Option<(String, String)> {
        match (&self.send_code_url, &self.verify_code_url) {
            (Some(send), Some(verify)) => Some((send.clone(), verify.clone())),
            _ => None,
        }
    }
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Completion provider settings
    pub provider: FileProviderConfig,
    /// API key and durable-flag settings
    pub access: FileAccessConfig,
    /// Email verification endpoints
    pub verification: FileVerificationConfig,
}
