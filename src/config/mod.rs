// Configuration module for the chat proxy

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ProxyError;

pub const API_KEY_VAR: &str = "AZURE_OPENAI_API_KEY";
pub const ENDPOINT_VAR: &str = "AZURE_OPENAI_ENDPOINT";
pub const DEFAULT_MODEL_VAR: &str = "DEFAULT_MODEL";

const CONFIG_PATH_VAR: &str = "PROXY_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Server-side settings. Read from an optional YAML file, then overridden by
/// `HOST`, `PORT` and `DEFAULT_MODEL` from the environment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct AppConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_model")]
    pub default_model: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            default_model: default_model(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

impl AppConfig {
    /// Load the config file named by `PROXY_CONFIG` (or `config.yaml`) and
    /// apply environment overrides. A missing file yields the defaults.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var(CONFIG_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));

        Self::load_from(&config_path, |key| std::env::var(key).ok())
    }

    fn load_from(config_path: &Path, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: AppConfig = serde_yaml::from_str(&content)?;
            tracing::info!("Config loaded from {:?}", config_path);
            config
        } else {
            AppConfig::default()
        };

        config.apply_overrides(lookup)?;
        Ok(config)
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(host) = lookup("HOST").filter(|v| !v.is_empty()) {
            self.host = host;
        }
        if let Some(port) = lookup("PORT").filter(|v| !v.is_empty()) {
            self.port = port
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid PORT {:?}: {}", port, e))?;
        }
        if let Some(model) = lookup(DEFAULT_MODEL_VAR).filter(|v| !v.is_empty()) {
            self.default_model = model;
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        let host = if self.host.is_empty() {
            "0.0.0.0"
        } else {
            &self.host
        };
        format!("{}:{}", host, self.port)
    }
}

/// Credential and endpoint for the Azure AI Inference service.
#[derive(Clone, PartialEq, Eq)]
pub struct AzureSettings {
    pub api_key: String,
    pub endpoint: String,
}

impl std::fmt::Debug for AzureSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureSettings")
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl AzureSettings {
    pub fn from_env() -> Result<Self, ProxyError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Both settings are required; an empty value counts as missing.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ProxyError> {
        let api_key = lookup(API_KEY_VAR).filter(|v| !v.is_empty());
        let endpoint = lookup(ENDPOINT_VAR).filter(|v| !v.is_empty());

        match (api_key, endpoint) {
            (Some(api_key), Some(endpoint)) => Ok(Self { api_key, endpoint }),
            (api_key, endpoint) => {
                let missing: Vec<&str> = [
                    (api_key.is_none(), API_KEY_VAR),
                    (endpoint.is_none(), ENDPOINT_VAR),
                ]
                .into_iter()
                .filter_map(|(absent, name)| absent.then_some(name))
                .collect();
                Err(ProxyError::Config(missing.join(", ")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_settings_require_key_and_endpoint() {
        let settings = AzureSettings::from_lookup(lookup(&[
            (API_KEY_VAR, "secret"),
            (ENDPOINT_VAR, "https://example.services.ai.azure.com/models"),
        ]))
        .unwrap();
        assert_eq!(settings.api_key, "secret");
        assert_eq!(settings.endpoint, "https://example.services.ai.azure.com/models");
    }

    #[test]
    fn test_missing_credential_is_config_error() {
        let err = AzureSettings::from_lookup(lookup(&[(ENDPOINT_VAR, "https://x")])).unwrap_err();
        match err {
            ProxyError::Config(missing) => assert_eq!(missing, API_KEY_VAR),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_empty_values_count_as_missing() {
        let err = AzureSettings::from_lookup(lookup(&[(API_KEY_VAR, ""), (ENDPOINT_VAR, "")]))
            .unwrap_err();
        assert!(err.to_string().contains(API_KEY_VAR));
        assert!(err.to_string().contains(ENDPOINT_VAR));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let settings = AzureSettings {
            api_key: "secret".to_string(),
            endpoint: "https://x".to_string(),
        };
        assert!(!format!("{:?}", settings).contains("secret"));
    }

    #[test]
    fn test_yaml_uses_kebab_case_and_defaults() {
        let config: AppConfig = serde_yaml::from_str("port: 9000\ndefault-model: phi-4\n").unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9000);
        assert_eq!(config.default_model, "phi-4");
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = AppConfig::default();
        config
            .apply_overrides(lookup(&[
                ("HOST", "127.0.0.1"),
                ("PORT", "8417"),
                (DEFAULT_MODEL_VAR, "Mistral-large"),
            ]))
            .unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:8417");
        assert_eq!(config.default_model, "Mistral-large");
    }

    #[test]
    fn test_load_reads_file_then_applies_env() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "host: 127.0.0.1\nport: 9100\ndefault-model: phi-4\n").unwrap();

        let config = AppConfig::load_from(&path, lookup(&[(DEFAULT_MODEL_VAR, "gpt-4o")])).unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:9100");
        assert_eq!(config.default_model, "gpt-4o");
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("missing.yaml"), lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "port: not-a-number\n").unwrap();
        assert!(AppConfig::load_from(&path, lookup(&[])).is_err());
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let mut config = AppConfig::default();
        assert!(config.apply_overrides(lookup(&[("PORT", "http")])).is_err());
    }
}
