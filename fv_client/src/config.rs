//! Client configuration management.
//!
//! Consolidates all environment variable reads and provides validated
//! configuration.

use std::path::PathBuf;

use file_vault::store::DEFAULT_CACHE_CAP_BYTES;
use thiserror::Error;

/// Default base endpoint when neither the CLI nor the environment says
/// otherwise
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable held an unparseable value
    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: String, value: String },
}

/// Complete client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base endpoint of the file-storage API
    pub api_url: String,
    /// Explicit store location; platform data directory when unset
    pub data_dir: Option<PathBuf>,
    /// Blob cache size cap in bytes
    pub cache_cap_bytes: u64,
}

impl ClientConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `api_url_override` - Optional base URL override (from CLI args)
    ///
    /// # Errors
    ///
    /// Returns an error if a set variable holds an unparseable value
    pub fn from_env(api_url_override: Option<String>) -> Result<Self, ConfigError> {
        let api_url = api_url_override
            .or_else(|| std::env::var("FILE_VAULT_API_URL").ok())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let data_dir = std::env::var("FILE_VAULT_DATA_DIR").ok().map(PathBuf::from);

        let cache_cap_bytes = match std::env::var("FILE_VAULT_CACHE_CAP_BYTES") {
            Ok(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
                var: "FILE_VAULT_CACHE_CAP_BYTES".to_string(),
                value,
            })?,
            Err(_) => DEFAULT_CACHE_CAP_BYTES,
        };

        Ok(Self {
            api_url,
            data_dir,
            cache_cap_bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override_wins() {
        let config = ClientConfig::from_env(Some("http://example.com:9999".to_string())).unwrap();
        assert_eq!(config.api_url, "http://example.com:9999");
    }

    #[test]
    fn test_defaults_without_overrides() {
        // Environment-dependent keys are not exercised here to keep the
        // test hermetic; the override path covers precedence.
        let config = ClientConfig::from_env(Some(DEFAULT_API_URL.to_string())).unwrap();
        assert_eq!(config.cache_cap_bytes, DEFAULT_CACHE_CAP_BYTES);
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }
}
