//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `VITRINE_API_URL` - Base URL of the storefront API
//!   (default: `http://localhost:8000`)
//! - `VITRINE_DATA_DIR` - Directory for persisted local state
//!   (default: `.vitrine` in the current directory)

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_DATA_DIR: &str = ".vitrine";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Unsupported URL scheme in {0}: {1} (expected http or https)")]
    UnsupportedScheme(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the remote storefront API.
    pub api_base_url: Url,
    /// Directory holding the persisted cart, session, and snapshots.
    pub data_dir: PathBuf,
}

impl ClientConfig {
    /// Load configuration from environment variables, falling back to
    /// localhost defaults suitable for development.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `VITRINE_API_URL` is set but is not a
    /// valid http(s) URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw_url =
            std::env::var("VITRINE_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let api_base_url = Self::parse_api_url(&raw_url)?;

        let data_dir = std::env::var("VITRINE_DATA_DIR")
            .map_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from);

        Ok(Self {
            api_base_url,
            data_dir,
        })
    }

    /// Build a configuration pointing at an explicit API URL and data
    /// directory. Used by tests and embedding applications.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the URL is not a valid http(s) URL.
    pub fn for_endpoint(api_url: &str, data_dir: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        Ok(Self {
            api_base_url: Self::parse_api_url(api_url)?,
            data_dir: data_dir.into(),
        })
    }

    fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
        let url = Url::parse(raw)
            .map_err(|e| ConfigError::InvalidEnvVar("VITRINE_API_URL".into(), e.to_string()))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::UnsupportedScheme(
                "VITRINE_API_URL".into(),
                url.scheme().to_string(),
            ));
        }
        Ok(url)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_for_endpoint_valid() {
        let config = ClientConfig::for_endpoint("http://127.0.0.1:8000", "/tmp/vitrine").unwrap();
        assert_eq!(config.api_base_url.as_str(), "http://127.0.0.1:8000/");
        assert_eq!(config.data_dir, PathBuf::from("/tmp/vitrine"));
    }

    #[test]
    fn test_rejects_bad_url() {
        assert!(matches!(
            ClientConfig::for_endpoint("not a url", "/tmp"),
            Err(ConfigError::InvalidEnvVar(..))
        ));
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        assert!(matches!(
            ClientConfig::for_endpoint("ftp://example.com", "/tmp"),
            Err(ConfigError::UnsupportedScheme(..))
        ));
    }
}
