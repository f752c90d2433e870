//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use application types where appropriate.

use relay_application::SettingsMode;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// File name of the token cache inside the system temp directory.
pub const DEFAULT_TOKEN_CACHE_FILE: &str = "copilot-relay.tokencache.json";

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("server.port cannot be 0")]
    InvalidPort,

    #[error("server.request_timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("server.cors_allow_origin cannot be empty")]
    EmptyCorsOrigin,
}

/// Raw HTTP server configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServerConfig {
    /// Interface to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Value of `Access-Control-Allow-Origin`; `*` allows any origin
    pub cors_allow_origin: String,
    /// Per-request timeout; unset means no timeout
    pub request_timeout_seconds: Option<u64>,
}

impl Default for FileServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            cors_allow_origin: "*".to_string(),
            request_timeout_seconds: None,
        }
    }
}

/// Raw token cache configuration from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTokenCacheConfig {
    /// Cache file location; defaults to the system temp directory
    pub path: Option<PathBuf>,
}

impl FileTokenCacheConfig {
    /// The configured path, or `<temp_dir>/copilot-relay.tokencache.json`.
    pub fn resolved_path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_TOKEN_CACHE_FILE))
    }
}

/// Raw relay behavior configuration from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRelayConfig {
    pub settings_mode: SettingsMode,
}

/// Raw logging configuration from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL turn transcript; disabled when unset
    pub conversation_log: Option<PathBuf>,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub server: FileServerConfig,
    pub token_cache: FileTokenCacheConfig,
    pub relay: FileRelayConfig,
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate values serde cannot reject on its own.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.server.port == 0 {
            return Err(ConfigValidationError::InvalidPort);
        }
        if self.server.request_timeout_seconds == Some(0) {
            return Err(ConfigValidationError::InvalidTimeout);
        }
        if self.server.cors_allow_origin.trim().is_empty() {
            return Err(ConfigValidationError::EmptyCorsOrigin);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FileConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.cors_allow_origin, "*");
        assert!(config.server.request_timeout_seconds.is_none());
        assert_eq!(config.relay.settings_mode, SettingsMode::PerRequest);
        assert!(config.logging.conversation_log.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_token_cache_path_is_in_temp_dir() {
        let path = FileTokenCacheConfig::default().resolved_path();
        assert_eq!(path, std::env::temp_dir().join(DEFAULT_TOKEN_CACHE_FILE));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: FileConfig = toml::from_str(
            r#"
            [server]
            port = 8080

            [relay]
            settings_mode = "cached"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.relay.settings_mode, SettingsMode::Cached);
    }

    #[test]
    fn test_validate_rejects_zero_values() {
        let mut config = FileConfig::default();
        config.server.port = 0;
        assert_eq!(config.validate(), Err(ConfigValidationError::InvalidPort));

        let mut config = FileConfig::default();
        config.server.request_timeout_seconds = Some(0);
        assert_eq!(config.validate(), Err(ConfigValidationError::InvalidTimeout));

        let mut config = FileConfig::default();
        config.server.cors_allow_origin = " ".to_string();
        assert_eq!(config.validate(), Err(ConfigValidationError::EmptyCorsOrigin));
    }
}
