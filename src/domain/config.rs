//! # Configuration
//!
//! YAML-backed application configuration: the gateway credentials and
//! registration scope, the OpenAI backend settings, and the context cache
//! capacity.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::domain::types::Scope;

/// Main application configuration structure.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub openai: OpenAiConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path.as_ref())
            .with_context(|| format!("failed to read {}", path.as_ref().display()))?;
        let config: AppConfig =
            serde_yaml::from_str(&raw).context("failed to parse configuration")?;
        Ok(config)
    }
}

/// Gateway credentials and command registration scope.
#[derive(Debug, Deserialize, Clone)]
pub struct GatewayConfig {
    pub token: String,
    /// Register commands for a single guild when set; globally otherwise.
    #[serde(default)]
    pub guild: Option<String>,
    /// Remove all remote commands at shutdown.
    #[serde(default)]
    pub remove_commands: bool,
}

impl GatewayConfig {
    pub fn scope(&self) -> Scope {
        match &self.guild {
            Some(id) if !id.is_empty() => Scope::Guild(id.clone()),
            _ => Scope::Global,
        }
    }
}

/// Settings for the OpenAI completion and image backends. Handlers that
/// need these are only registered when an API key is present.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct OpenAiConfig {
    #[serde(default)]
    pub api_key: String,
    /// Models offered as choices on the chat command; the first entry is
    /// the default.
    #[serde(default)]
    pub completion_models: Vec<String>,
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl OpenAiConfig {
    pub fn enabled(&self) -> bool {
        !self.api_key.is_empty()
    }
}

/// Context cache sizing.
#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    /// Maximum number of conversations tracked at once.
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
        }
    }
}

fn default_capacity() -> usize {
    256
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const FULL: &str = r#"
gateway:
  token: "secret"
  guild: "1234"
  remove_commands: true
openai:
  api_key: "sk-test"
  completion_models:
    - gpt-4
    - gpt-3.5-turbo
cache:
  capacity: 64
"#;

    #[test]
    fn parses_full_config() {
        let config: AppConfig = serde_yaml::from_str(FULL).unwrap();
        assert_eq!(config.gateway.token, "secret");
        assert!(config.gateway.remove_commands);
        assert_eq!(config.gateway.scope(), Scope::Guild("1234".to_string()));
        assert!(config.openai.enabled());
        assert_eq!(config.openai.completion_models.len(), 2);
        assert_eq!(config.cache.capacity, 64);
    }

    #[test]
    fn minimal_config_uses_defaults() {
        let config: AppConfig = serde_yaml::from_str("gateway:\n  token: t\n").unwrap();
        assert_eq!(config.gateway.scope(), Scope::Global);
        assert!(!config.gateway.remove_commands);
        assert!(!config.openai.enabled());
        assert_eq!(config.cache.capacity, 256);
    }

    #[test]
    fn empty_guild_means_global_scope() {
        let config: AppConfig =
            serde_yaml::from_str("gateway:\n  token: t\n  guild: \"\"\n").unwrap();
        assert_eq!(config.gateway.scope(), Scope::Global);
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FULL.as_bytes()).unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.gateway.token, "secret");
    }

    #[test]
    fn load_reports_missing_file() {
        let err = AppConfig::load("/nonexistent/config.yaml").unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
