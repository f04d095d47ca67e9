//! Configuration management for rag-em-ingest
//!
//! Handles loading and validating configuration from TOML files, and
//! resolving the API token once at startup.

mod defaults;

pub use defaults::*;

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// RAG EM API endpoint (REDCap API URL)
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Environment variable name for the API token
    #[serde(default = "default_api_token_env")]
    pub api_token_env: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_token_env: default_api_token_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// A resolved REDCap API token.
///
/// `Debug` is redacted so the token never shows up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    pub(crate) fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiToken(***)")
    }
}

impl Config {
    /// Get the default config file path (<config dir>/rag-em-ingest/config.toml)
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("rag-em-ingest")
            .join("config.toml")
    }

    /// Load configuration from a specific file path
    pub fn load(config_path: &Path) -> Result<Self> {
        debug!("Loading config from {:?}", config_path);

        if !config_path.exists() {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                config_path.display()
            )));
        }

        let content = std::fs::read_to_string(config_path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from an explicit path, or from the default
    /// location when it exists, falling back to defaults otherwise
    pub fn load_from(config_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load(path);
        }

        let default_path = Self::default_config_path();
        if default_path.exists() {
            Self::load(&default_path)
        } else {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
    }

    /// Request timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Resolve the API token: the explicit value wins, then the configured
    /// environment variable. Empty values count as missing.
    pub fn resolve_token(&self, explicit: Option<String>) -> Result<ApiToken> {
        explicit
            .filter(|token| !token.is_empty())
            .or_else(|| {
                std::env::var(&self.api_token_env)
                    .ok()
                    .filter(|token| !token.is_empty())
            })
            .map(ApiToken)
            .ok_or_else(|| {
                Error::Config(format!(
                    "Missing {} in environment or parameters",
                    self.api_token_env
                ))
            })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.api_url).map_err(|e| {
            Error::Config(format!("api_url '{}' is invalid: {}", self.api_url, e))
        })?;

        if self.api_token_env.trim().is_empty() {
            return Err(Error::Config(
                "api_token_env must name an environment variable".to_string(),
            ));
        }

        if self.timeout_secs == 0 {
            return Err(Error::Config("timeout_secs must be positive".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const UNSET_ENV: &str = "RAG_EM_INGEST_TEST_TOKEN_NEVER_SET";

    fn config_without_env_token() -> Config {
        Config {
            api_token_env: UNSET_ENV.to_string(),
            ..Config::default()
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api_url, "http://localhost/api/");
        assert_eq!(config.api_token_env, "REDCAP_API_TOKEN");
        assert_eq!(config.timeout(), Duration::from_secs(120));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_load_partial_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "api_url = \"https://redcap.example.org/api/\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.api_url, "https://redcap.example.org/api/");
        assert_eq!(config.timeout_secs, 120);
        assert_eq!(config.api_token_env, "REDCAP_API_TOKEN");
    }

    #[test]
    fn test_malformed_config_is_toml_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "timeout_secs = \"soon\"\n").unwrap();

        assert!(matches!(Config::load(&path), Err(Error::TomlParse(_))));
    }

    #[test]
    fn test_explicit_missing_config_is_error() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope.toml");
        assert!(matches!(
            Config::load_from(Some(&missing)),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();

        config.timeout_secs = 0;
        assert!(config.validate().is_err());

        config.timeout_secs = 30;
        config.api_url = "not a url".to_string();
        assert!(config.validate().is_err());

        config.api_url = default_api_url();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_resolve_token_prefers_explicit() {
        let config = config_without_env_token();
        let token = config.resolve_token(Some("abc123".to_string())).unwrap();
        assert_eq!(token.as_str(), "abc123");
    }

    #[test]
    fn test_resolve_token_missing_everywhere() {
        let config = config_without_env_token();
        let err = config.resolve_token(None).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains(UNSET_ENV));

        // Empty explicit token does not count
        assert!(config.resolve_token(Some(String::new())).is_err());
    }

    #[test]
    fn test_resolve_token_from_environment() {
        let var = "RAG_EM_INGEST_TEST_TOKEN_FROM_ENV";
        std::env::set_var(var, "from-env");
        let config = Config {
            api_token_env: var.to_string(),
            ..Config::default()
        };
        let token = config.resolve_token(None).unwrap();
        assert_eq!(token.as_str(), "from-env");
        std::env::remove_var(var);
    }

    #[test]
    fn test_token_debug_is_redacted() {
        let token = config_without_env_token()
            .resolve_token(Some("secret".to_string()))
            .unwrap();
        assert!(!format!("{:?}", token).contains("secret"));
    }
}
