//! Bootstrap configuration for MovieHub clients
//!
//! # Settings Sources Priority
//!
//! 1. Command-line arguments (--api-url, --token, --config)
//! 2. Environment variables (MOVIEHUB_API_URL, MOVIEHUB_TOKEN)
//! 3. TOML configuration file
//! 4. Built-in defaults (code constants)
//!
//! A missing or unreadable TOML file never stops the client: it logs a
//! warning and continues with defaults.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Environment variable overriding the API base URL
pub const ENV_API_URL: &str = "MOVIEHUB_API_URL";
/// Environment variable carrying a stored bearer token
pub const ENV_TOKEN: &str = "MOVIEHUB_TOKEN";

const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8080";
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_EVENT_CAPACITY: usize = 100;

/// Configuration loaded from the TOML bootstrap file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    /// MovieHub backend base URL
    #[serde(default)]
    pub api_base_url: Option<String>,

    /// Per-request timeout in milliseconds
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,

    /// EventBus channel capacity
    #[serde(default)]
    pub event_capacity: Option<usize>,

    /// Stored bearer token from a previous sign-in
    #[serde(default)]
    pub token: Option<String>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            api_base_url: None,
            request_timeout_ms: None,
            event_capacity: None,
            token: None,
            logging: LoggingConfig::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Parse a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load a TOML config file, falling back to defaults on any failure
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        if !path.exists() {
            warn!(path = %path.display(), "Config file not found, using defaults");
            return Self::default();
        }

        match Self::load(path) {
            Ok(config) => {
                info!(path = %path.display(), "Loaded config file");
                config
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Config file unreadable, using defaults");
                Self::default()
            }
        }
    }
}

/// Default TOML location: `<config dir>/moviehub/moviehub-ui.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("moviehub").join("moviehub-ui.toml"))
}

/// Fully resolved client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub event_capacity: usize,
    pub token: Option<String>,
    pub logging: LoggingConfig,
}

impl ClientConfig {
    /// Reject configurations the client cannot start with
    pub fn validate(&self) -> Result<()> {
        let url = self.api_base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(Error::Config(format!(
                "api_base_url must be an http(s) URL, got {:?}",
                self.api_base_url
            )));
        }
        if self.event_capacity == 0 {
            return Err(Error::Config("event_capacity must be positive".to_string()));
        }
        if self.request_timeout.is_zero() {
            return Err(Error::Config("request_timeout_ms must be positive".to_string()));
        }
        Ok(())
    }
}

/// Resolves [`ClientConfig`] from CLI arguments, environment, TOML and defaults
#[derive(Debug, Default, Clone)]
pub struct ConfigResolver {
    cli_api_url: Option<String>,
    cli_token: Option<String>,
    config_path: Option<PathBuf>,
}

impl ConfigResolver {
    pub fn new() -> Self {
        Self {
            cli_api_url: None,
            cli_token: None,
            config_path: default_config_path(),
        }
    }

    pub fn with_api_url(mut self, url: Option<String>) -> Self {
        self.cli_api_url = url;
        self
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.cli_token = token;
        self
    }

    /// Override the TOML file location (`None` keeps the platform default)
    pub fn with_config_path(mut self, path: Option<PathBuf>) -> Self {
        if path.is_some() {
            self.config_path = path;
        }
        self
    }

    pub fn resolve(&self) -> ClientConfig {
        let toml_config = TomlConfig::load_or_default(self.config_path.as_deref());

        let api_base_url = first_non_empty([
            self.cli_api_url.clone(),
            std::env::var(ENV_API_URL).ok(),
            toml_config.api_base_url.clone(),
        ])
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        let token = first_non_empty([
            self.cli_token.clone(),
            std::env::var(ENV_TOKEN).ok(),
            toml_config.token.clone(),
        ]);

        ClientConfig {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            request_timeout: Duration::from_millis(
                toml_config
                    .request_timeout_ms
                    .unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS),
            ),
            event_capacity: toml_config
                .event_capacity
                .unwrap_or(DEFAULT_EVENT_CAPACITY),
            token,
            logging: toml_config.logging,
        }
    }
}

fn first_non_empty<const N: usize>(candidates: [Option<String>; N]) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .map(|s| s.trim().to_string())
        .find(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_non_empty_skips_blank() {
        let picked = first_non_empty([Some("  ".to_string()), None, Some("b".to_string())]);
        assert_eq!(picked.as_deref(), Some("b"));
    }

    #[test]
    fn test_validate_rejects_non_http_url() {
        let config = ClientConfig {
            api_base_url: "ftp://example".to_string(),
            request_timeout: Duration::from_secs(1),
            event_capacity: 10,
            token: None,
            logging: LoggingConfig::default(),
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_zero_timeout_and_capacity() {
        let valid = ClientConfig {
            api_base_url: "http://localhost:8000".to_string(),
            request_timeout: Duration::from_millis(1),
            event_capacity: 1,
            token: None,
            logging: LoggingConfig::default(),
        };
        assert!(valid.validate().is_ok());

        let zero_timeout = ClientConfig {
            request_timeout: Duration::ZERO,
            ..valid.clone()
        };
        match zero_timeout.validate() {
            Err(Error::Config(msg)) => assert!(msg.contains("request_timeout_ms")),
            other => panic!("expected a config error, got {other:?}"),
        }

        let zero_capacity = ClientConfig {
            event_capacity: 0,
            ..valid
        };
        assert!(matches!(zero_capacity.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_logging_defaults() {
        let logging = LoggingConfig::default();
        assert_eq!(logging.level, "info");
        assert!(logging.file.is_none());
    }
}
