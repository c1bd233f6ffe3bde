//! # Client Configuration Module
//!
//! Provides configuration for the Google Drive client.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a
//! [`DriveConfig`] holding the endpoints, default page size and per-request
//! timeouts. Nothing is read from files or the environment: every value is
//! passed in at construction, and anything left unset falls back to the
//! public Google endpoints.
//!
//! ## Usage
//!
//! ```
//! use core_runtime::config::DriveConfig;
//! use std::time::Duration;
//!
//! let config = DriveConfig::builder()
//!     .default_page_size(500)
//!     .request_timeout(Duration::from_secs(15))
//!     .build()
//!     .expect("valid configuration");
//!
//! assert_eq!(config.api_base_url, "https://www.googleapis.com/drive/v2");
//! ```
//!
//! ## Error Handling
//!
//! The builder validates every value and returns an actionable
//! [`Error::Config`] instead of failing later on the first request:
//!
//! ```should_panic
//! use core_runtime::config::DriveConfig;
//!
//! let config = DriveConfig::builder()
//!     .api_base_url("not a url")
//!     .build()
//!     .expect("Should fail - invalid base URL");
//! ```

use crate::error::{Error, Result};
use std::time::Duration;
use url::Url;

/// Drive API v2 base URL
pub const DEFAULT_API_BASE_URL: &str = "https://www.googleapis.com/drive/v2";

/// Google OAuth 2.0 token endpoint
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.google.com/o/oauth2/token";

/// Page size used by the listing operations when the caller gives none
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Largest `maxResults` value the listing endpoints accept
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Configuration for the Google Drive client.
///
/// Use [`DriveConfigBuilder`] to construct validated instances, or
/// [`DriveConfig::default`] for the stock Google endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriveConfig {
    /// Base URL every API path is appended to (no trailing slash)
    pub api_base_url: String,

    /// OAuth token endpoint used for the refresh-token grant
    pub token_url: String,

    /// `maxResults` used by the listing operations
    pub default_page_size: u32,

    /// Timeout applied to metadata, listing and token requests
    pub request_timeout: Duration,

    /// Timeout applied to content downloads
    pub download_timeout: Duration,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            default_page_size: DEFAULT_PAGE_SIZE,
            request_timeout: Duration::from_secs(30),
            download_timeout: Duration::from_secs(300),
        }
    }
}

impl DriveConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> DriveConfigBuilder {
        DriveConfigBuilder::default()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if:
    /// - A URL does not parse or is not `http`/`https`
    /// - The page size is outside `1..=1000`
    /// - A timeout is zero
    pub fn validate(&self) -> Result<()> {
        validate_url("API base URL", &self.api_base_url)?;
        validate_url("Token URL", &self.token_url)?;

        if self.default_page_size == 0 || self.default_page_size > MAX_PAGE_SIZE {
            return Err(Error::Config(format!(
                "Default page size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, self.default_page_size
            )));
        }

        if self.request_timeout.is_zero() {
            return Err(Error::Config(
                "Request timeout must be greater than zero".to_string(),
            ));
        }

        if self.download_timeout.is_zero() {
            return Err(Error::Config(
                "Download timeout must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Joins an API path onto the base URL.
    pub fn api_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

fn validate_url(name: &str, value: &str) -> Result<()> {
    let url = Url::parse(value)
        .map_err(|e| Error::Config(format!("{} '{}' is invalid: {}", name, value, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(Error::Config(format!(
            "{} must use http or https, got '{}'",
            name, other
        ))),
    }
}

/// Builder for constructing [`DriveConfig`] instances.
#[derive(Debug, Default)]
pub struct DriveConfigBuilder {
    api_base_url: Option<String>,
    token_url: Option<String>,
    default_page_size: Option<u32>,
    request_timeout: Option<Duration>,
    download_timeout: Option<Duration>,
}

impl DriveConfigBuilder {
    /// Sets the API base URL. A trailing slash is ignored.
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    /// Sets the OAuth token endpoint.
    pub fn token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = Some(url.into());
        self
    }

    /// Sets the default listing page size.
    pub fn default_page_size(mut self, size: u32) -> Self {
        self.default_page_size = Some(size);
        self
    }

    /// Sets the timeout for API and token requests.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Sets the timeout for content downloads.
    pub fn download_timeout(mut self, timeout: Duration) -> Self {
        self.download_timeout = Some(timeout);
        self
    }

    /// Builds the final `DriveConfig`, validating every value.
    pub fn build(self) -> Result<DriveConfig> {
        let defaults = DriveConfig::default();

        let config = DriveConfig {
            api_base_url: self
                .api_base_url
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base_url),
            token_url: self.token_url.unwrap_or(defaults.token_url),
            default_page_size: self.default_page_size.unwrap_or(defaults.default_page_size),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            download_timeout: self.download_timeout.unwrap_or(defaults.download_timeout),
        };

        config.validate()?;

        Ok(config)
    }
}
