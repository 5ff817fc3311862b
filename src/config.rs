//! Configuration management for Parley
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{ParleyError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Highest history limit accepted by validation
pub const MAX_HISTORY_LIMIT: u32 = 1000;

/// Main configuration structure for Parley
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Chat backend connection settings
    #[serde(default)]
    pub backend: BackendConfig,
    /// Conversation behavior settings
    #[serde(default)]
    pub chat: ChatConfig,
}

/// Chat backend connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the chatbot server
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout (seconds)
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

/// Conversation behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Number of exchanges fetched by an explicit history load
    #[serde(default = "default_history_limit")]
    pub history_limit: u32,

    /// Number of exchanges fetched when an interactive session starts
    #[serde(default = "default_startup_history_limit")]
    pub startup_history_limit: u32,

    /// Model hint sent with each chat message; the backend picks when unset
    #[serde(default = "default_model")]
    pub default_model: Option<String>,
}

fn default_history_limit() -> u32 {
    20
}

fn default_startup_history_limit() -> u32 {
    10
}

fn default_model() -> Option<String> {
    Some("gemini-2.5-flash".to_string())
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
            startup_history_limit: default_startup_history_limit(),
            default_model: default_model(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Returns
    ///
    /// Returns the loaded and merged configuration
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ParleyError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| ParleyError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(base_url) = std::env::var("PARLEY_API_URL") {
            self.backend.base_url = base_url;
        }

        if let Ok(timeout) = std::env::var("PARLEY_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.backend.timeout_seconds = value;
            } else {
                tracing::warn!("Invalid PARLEY_TIMEOUT_SECONDS: {}", timeout);
            }
        }

        if let Ok(limit) = std::env::var("PARLEY_HISTORY_LIMIT") {
            if let Ok(value) = limit.parse() {
                self.chat.history_limit = value;
            } else {
                tracing::warn!("Invalid PARLEY_HISTORY_LIMIT: {}", limit);
            }
        }

        if let Ok(model) = std::env::var("PARLEY_MODEL") {
            self.chat.default_model = if model.trim().is_empty() {
                None
            } else {
                Some(model)
            };
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        if let Some(api_url) = &cli.api_url {
            self.backend.base_url = api_url.clone();
        }

        if let Some(model) = &cli.model {
            self.chat.default_model = Some(model.clone());
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.backend.base_url).map_err(|e| {
            ParleyError::Config(format!(
                "Invalid backend.base_url '{}': {}",
                self.backend.base_url, e
            ))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ParleyError::Config(format!(
                "backend.base_url must use http or https, got: {}",
                url.scheme()
            ))
            .into());
        }

        if self.backend.timeout_seconds == 0 {
            return Err(ParleyError::Config(
                "backend.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        for (name, value) in [
            ("chat.history_limit", self.chat.history_limit),
            ("chat.startup_history_limit", self.chat.startup_history_limit),
        ] {
            if value == 0 || value > MAX_HISTORY_LIMIT {
                return Err(ParleyError::Config(format!(
                    "{} must be between 1 and {}",
                    name, MAX_HISTORY_LIMIT
                ))
                .into());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn cli_with(api_url: Option<&str>, model: Option<&str>) -> crate::cli::Cli {
        crate::cli::Cli {
            config: None,
            verbose: false,
            api_url: api_url.map(str::to_string),
            model: model.map(str::to_string),
            command: crate::cli::Commands::Stats { json: false },
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.backend.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.backend.timeout_seconds, 30);
        assert_eq!(config.chat.history_limit, 20);
        assert_eq!(config.chat.startup_history_limit, 10);
        assert_eq!(
            config.chat.default_model.as_deref(),
            Some("gemini-2.5-flash")
        );
    }

    #[test]
    fn test_config_validation_success() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation_bad_url() {
        let mut config = Config::default();
        config.backend.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        config.backend.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_timeout() {
        let mut config = Config::default();
        config.backend.timeout_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_history_limits() {
        let mut config = Config::default();
        config.chat.history_limit = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.chat.startup_history_limit = MAX_HISTORY_LIMIT + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_yaml() {
        let yaml = r#"
backend:
  base_url: https://chat.example.com
  timeout_seconds: 45
chat:
  history_limit: 50
  default_model: gemini-2.5-pro
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.backend.base_url, "https://chat.example.com");
        assert_eq!(config.backend.timeout_seconds, 45);
        assert_eq!(config.chat.history_limit, 50);
        assert_eq!(config.chat.startup_history_limit, 10);
        assert_eq!(config.chat.default_model.as_deref(), Some("gemini-2.5-pro"));
    }

    #[test]
    fn test_config_from_empty_yaml_uses_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.backend.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.chat.history_limit, 20);
    }

    #[test]
    #[serial]
    fn test_load_nonexistent_file_uses_defaults() {
        std::env::remove_var("PARLEY_API_URL");
        std::env::remove_var("PARLEY_MODEL");
        let config = Config::load("/nonexistent/parley.yaml", &cli_with(None, None)).unwrap();
        assert_eq!(config.backend.base_url, "http://127.0.0.1:8000");
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        std::env::set_var("PARLEY_API_URL", "http://10.0.0.5:9000");
        std::env::set_var("PARLEY_TIMEOUT_SECONDS", "not-a-number");
        std::env::set_var("PARLEY_MODEL", "");
        let config = Config::load("/nonexistent/parley.yaml", &cli_with(None, None)).unwrap();
        std::env::remove_var("PARLEY_API_URL");
        std::env::remove_var("PARLEY_TIMEOUT_SECONDS");
        std::env::remove_var("PARLEY_MODEL");

        assert_eq!(config.backend.base_url, "http://10.0.0.5:9000");
        assert_eq!(config.backend.timeout_seconds, 30);
        assert!(config.chat.default_model.is_none());
    }

    #[test]
    #[serial]
    fn test_cli_overrides_env() {
        std::env::set_var("PARLEY_API_URL", "http://10.0.0.5:9000");
        let cli = cli_with(Some("http://localhost:7000"), Some("gemini-1.5-pro"));
        let config = Config::load("/nonexistent/parley.yaml", &cli).unwrap();
        std::env::remove_var("PARLEY_API_URL");

        assert_eq!(config.backend.base_url, "http://localhost:7000");
        assert_eq!(config.chat.default_model.as_deref(), Some("gemini-1.5-pro"));
    }
}
