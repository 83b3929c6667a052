//! Configuration management for the onramp API
//!
//! This module provides a centralized configuration system that loads settings from:
//! 1. Environment variables (highest priority)
//! 2. Configuration file (TOML format)
//! 3. Default values (lowest priority)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration struct for the onramp service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OnrampConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Basic-auth credentials for the admin account
    pub auth: AuthConfig,
    /// Cluster connection settings
    pub openshift: OpenShiftConfig,
    /// Quota file configuration
    pub quota: QuotaConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
}

/// Basic-auth configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Admin username
    pub admin_username: String,
    /// Admin password (empty means unset)
    pub admin_password: String,
    /// Disable authentication entirely (development only)
    pub disabled: bool,
}

/// Cluster connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenShiftConfig {
    /// Path to a kubeconfig file; in-cluster configuration is tried first
    /// when unset
    pub kubeconfig: Option<PathBuf>,
    /// Kubeconfig context to use
    pub context: Option<String>,
    /// Identity provider name used to qualify identities
    pub identity_provider: String,
}

/// Quota file configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotaConfig {
    /// Path to the JSON quota definition file
    pub file: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            admin_username: "admin".to_string(),
            admin_password: String::new(),
            disabled: false,
        }
    }
}

impl Default for OpenShiftConfig {
    fn default() -> Self {
        Self {
            kubeconfig: None,
            context: None,
            identity_provider: "onramp".to_string(),
        }
    }
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("quotas.json"),
        }
    }
}

impl OnrampConfig {
    /// Load configuration from environment variables and optional config file
    pub fn load() -> Self {
        let mut config = Self::default();

        // Try to load from config file first
        if let Some(config_path) = Self::find_config_file() {
            if let Ok(file_config) = Self::load_from_file(&config_path) {
                config = file_config;
            }
        }

        // Override with environment variables
        config.apply_env_overrides();

        config
    }

    /// Load configuration from a specific file path
    pub fn load_from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.clone(), e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let paths = [
            // Environment variable override
            std::env::var("ONRAMP_CONFIG").ok().map(PathBuf::from),
            // Standard locations
            Some(PathBuf::from("/etc/onramp/config.toml")),
            Some(PathBuf::from("./config.toml")),
            Some(PathBuf::from("./onramp.toml")),
        ];

        paths.into_iter().flatten().find(|p| p.exists())
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        // Server
        if let Ok(host) = std::env::var("ONRAMP_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("ONRAMP_PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }

        // Auth
        if let Ok(username) = std::env::var("ONRAMP_ADMIN_USERNAME") {
            self.auth.admin_username = username;
        }
        if let Ok(password) = std::env::var("ONRAMP_ADMIN_PASSWORD") {
            self.auth.admin_password = password;
        }
        if let Ok(disabled) = std::env::var("ONRAMP_AUTH_DISABLED") {
            self.auth.disabled = disabled.to_lowercase() == "true";
        }

        // OpenShift
        if let Ok(path) = std::env::var("ONRAMP_KUBECONFIG") {
            self.openshift.kubeconfig = Some(PathBuf::from(path));
        }
        if let Ok(context) = std::env::var("ONRAMP_KUBE_CONTEXT") {
            self.openshift.context = Some(context);
        }
        if let Ok(provider) = std::env::var("ONRAMP_IDENTITY_PROVIDER") {
            self.openshift.identity_provider = provider;
        }

        // Quota
        if let Ok(path) = std::env::var("ONRAMP_QUOTA_FILE") {
            self.quota.file = PathBuf::from(path);
        }
    }

    /// Generate a sample configuration file
    pub fn generate_sample() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("Port cannot be 0".to_string()));
        }

        if self.openshift.identity_provider.is_empty() {
            return Err(ConfigError::Validation(
                "Identity provider cannot be empty".to_string(),
            ));
        }

        if !self.auth.disabled && self.auth.admin_password.is_empty() {
            return Err(ConfigError::Validation(
                "Admin password must be set unless auth is disabled \
                 (set ONRAMP_ADMIN_PASSWORD or auth.admin_password)"
                    .to_string(),
            ));
        }

        if self.quota.file.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "Quota file path cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Failed to read configuration file
    FileRead(PathBuf, String),
    /// Failed to parse configuration
    Parse(String),
    /// Configuration validation failed
    Validation(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::FileRead(path, err) => {
                write!(f, "Failed to read config file {:?}: {}", path, err)
            }
            ConfigError::Parse(err) => write!(f, "Failed to parse config: {}", err),
            ConfigError::Validation(err) => write!(f, "Config validation failed: {}", err),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OnrampConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.auth.admin_username, "admin");
        assert!(!config.auth.disabled);
        assert_eq!(config.quota.file, PathBuf::from("quotas.json"));
    }

    #[test]
    fn test_config_validation() {
        let mut config = OnrampConfig::default();
        config.auth.admin_password = "secret".to_string();
        assert!(config.validate().is_ok());

        let mut invalid_port = config.clone();
        invalid_port.server.port = 0;
        assert!(invalid_port.validate().is_err());

        let mut no_provider = config.clone();
        no_provider.openshift.identity_provider = String::new();
        assert!(no_provider.validate().is_err());
    }

    #[test]
    fn test_validation_requires_password_unless_disabled() {
        let mut config = OnrampConfig::default();
        assert!(config.validate().is_err());

        config.auth.disabled = true;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_generate_sample_config() {
        let sample = OnrampConfig::generate_sample();
        assert!(sample.contains("[server]"));
        assert!(sample.contains("[auth]"));
        assert!(sample.contains("[openshift]"));
        assert!(sample.contains("[quota]"));
    }

    #[test]
    fn test_parse_config_file() {
        let config: OnrampConfig = toml::from_str(
            r#"
            [server]
            host = "127.0.0.1"
            port = 9000

            [auth]
            admin_username = "operator"
            admin_password = "hunter2"
            disabled = false

            [openshift]
            identity_provider = "sso"

            [quota]
            file = "/etc/onramp/quotas.json"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.auth.admin_username, "operator");
        assert_eq!(config.openshift.identity_provider, "sso");
        assert_eq!(config.quota.file, PathBuf::from("/etc/onramp/quotas.json"));
    }
}
