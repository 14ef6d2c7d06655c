//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `BACKOFFICE_API_URL` - Backend base URL (default: `http://localhost:8080`)
//! - `BACKOFFICE_STATE_DIR` - Directory holding the stored token and draft
//!   (default: `.backoffice`)
//! - `BACKOFFICE_PAGE_SIZE` - Rows per list page (default: 10)
//! - `BACKOFFICE_CACHE_TTL_SECS` - Freshness window of cached reads (default: 300)
//! - `BACKOFFICE_HTTP_TIMEOUT_SECS` - Request timeout (default: none, transport default)
//! - `BACKOFFICE_LOG_JSON` - Emit JSON logs when set to `1`/`true`
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::time::Duration;

use backoffice_core::DEFAULT_PAGE_SIZE;
use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:8080";
const DEFAULT_STATE_DIR: &str = ".backoffice";
const DEFAULT_CACHE_TTL_SECS: u64 = 300;
const MAX_PAGE_SIZE: u32 = 100;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Back-office client configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// Backend base URL, without the `/api/v1` suffix
    pub api_url: Url,
    /// Directory of the durable client store
    pub state_dir: PathBuf,
    /// Rows per list page
    pub page_size: u32,
    /// Freshness window of cached reads
    pub cache_ttl: Duration,
    /// Explicit request timeout, if any
    pub http_timeout: Option<Duration>,
    /// Emit logs as JSON
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            state_dir: PathBuf::from(DEFAULT_STATE_DIR),
            page_size: DEFAULT_PAGE_SIZE,
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            http_timeout: None,
            log_json: false,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = parse_api_url(
            &lookup("BACKOFFICE_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        )?;
        let state_dir = lookup("BACKOFFICE_STATE_DIR")
            .map_or_else(|| PathBuf::from(DEFAULT_STATE_DIR), PathBuf::from);

        let page_size = lookup("BACKOFFICE_PAGE_SIZE")
            .map(|raw| parse_page_size(&raw))
            .transpose()?
            .unwrap_or(DEFAULT_PAGE_SIZE);

        let cache_ttl = lookup("BACKOFFICE_CACHE_TTL_SECS")
            .map(|raw| parse_secs("BACKOFFICE_CACHE_TTL_SECS", &raw))
            .transpose()?
            .unwrap_or(Duration::from_secs(DEFAULT_CACHE_TTL_SECS));

        let http_timeout = lookup("BACKOFFICE_HTTP_TIMEOUT_SECS")
            .map(|raw| parse_secs("BACKOFFICE_HTTP_TIMEOUT_SECS", &raw))
            .transpose()?;

        let log_json = lookup("BACKOFFICE_LOG_JSON")
            .is_some_and(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"));

        Ok(Self {
            api_url,
            state_dir,
            page_size,
            cache_ttl,
            http_timeout,
            log_json,
            sentry_dsn: lookup("SENTRY_DSN").filter(|v| !v.is_empty()),
            sentry_environment: lookup("SENTRY_ENVIRONMENT").filter(|v| !v.is_empty()),
        })
    }

    /// Full URL of an API path, e.g. `endpoint("/products")`.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/api/v1{path}",
            self.api_url.as_str().trim_end_matches('/')
        )
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

#[allow(clippy::expect_used)] // constant URL
fn default_api_url() -> Url {
    Url::parse(DEFAULT_API_URL).expect("default API URL is valid")
}

fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar("BACKOFFICE_API_URL".to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            "BACKOFFICE_API_URL".to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

fn parse_page_size(raw: &str) -> Result<u32, ConfigError> {
    let size = raw
        .trim()
        .parse::<u32>()
        .map_err(|e| ConfigError::InvalidEnvVar("BACKOFFICE_PAGE_SIZE".to_string(), e.to_string()))?;
    if size == 0 || size > MAX_PAGE_SIZE {
        return Err(ConfigError::InvalidEnvVar(
            "BACKOFFICE_PAGE_SIZE".to_string(),
            format!("must be between 1 and {MAX_PAGE_SIZE} (got {size})"),
        ));
    }
    Ok(size)
}

fn parse_secs(key: &str, raw: &str) -> Result<Duration, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
