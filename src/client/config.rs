//! Configuration management for the Canvas client

use std::path::PathBuf;

use compact_str::CompactString;
use url::Url;

use super::error::{CanvasError, Result};

/// Environment variable holding the API token
pub const TOKEN_ENV: &str = "CANVAS_TOKEN";
/// Environment variable holding the Canvas instance URL
pub const HOST_ENV: &str = "CANVAS_HOST";

/// Main configuration for the Canvas client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Canvas instance URL, e.g. `https://school.instructure.com/`
    pub base_url: CompactString,
    /// Bearer token
    pub token: CompactString,
    /// Request configuration
    pub request: RequestConfig,
    /// Debug configuration
    pub debug: DebugConfig,
}

/// HTTP request configuration
#[derive(Debug, Clone)]
pub struct RequestConfig {
    /// Page size used by the paginator when the caller does not set one
    pub per_page: u32,
    pub user_agent: CompactString,
}

/// Debug and logging configuration
#[derive(Debug, Clone, Default)]
pub struct DebugConfig {
    /// Dump every API response body to `log_directory`
    pub log_responses: bool,
    pub log_directory: Option<PathBuf>,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            per_page: 100,
            user_agent: concat!("canvas-lms/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

impl ClientConfig {
    /// Create a new client configuration. The base URL gets a trailing slash.
    pub fn new(base_url: impl Into<CompactString>, token: impl Into<CompactString>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.is_empty() && !base_url.ends_with('/') {
            base_url.push('/');
        }

        Self {
            base_url,
            token: token.into(),
            request: RequestConfig::default(),
            debug: DebugConfig::default(),
        }
    }

    /// Build a configuration from explicit values, falling back to the
    /// environment (and a `.env` file) for whichever one is missing.
    pub fn resolve(token: Option<String>, host: Option<String>) -> Result<Self> {
        if token.is_none() || host.is_none() {
            // A missing .env file is not an error
            let _ = dotenv::dotenv();
        }

        let token = token
            .filter(|t| !t.is_empty())
            .or_else(|| std::env::var(TOKEN_ENV).ok())
            .unwrap_or_default();
        let host = host
            .filter(|h| !h.is_empty())
            .or_else(|| std::env::var(HOST_ENV).ok())
            .unwrap_or_default();

        let config = Self::new(host, token);
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.token.is_empty() {
            return Err(CanvasError::config(
                "canvas_token",
                format!(
                    "Canvas API token required. Provide as parameter or set {TOKEN_ENV} \
                     environment variable."
                ),
            ));
        }

        if self.base_url.is_empty() {
            return Err(CanvasError::config(
                "canvas_host",
                format!(
                    "Canvas URL required. Provide as parameter or set {HOST_ENV} \
                     environment variable."
                ),
            ));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(CanvasError::config(
                "canvas_host",
                "Canvas URL must start with http:// or https://",
            ));
        }

        if Url::parse(&self.base_url).is_err() {
            return Err(CanvasError::config(
                "canvas_host",
                "Canvas URL is not a valid URL format",
            ));
        }

        if self.request.per_page == 0 {
            return Err(CanvasError::config("per_page", "per_page must be at least 1"));
        }

        Ok(())
    }

    /// Root of the versioned REST API, `<host>/api/v1/`
    pub fn api_root(&self) -> Result<Url> {
        Url::parse(&self.base_url)
            .and_then(|base| base.join("api/v1/"))
            .map_err(|_| CanvasError::invalid_url(self.base_url.as_str()))
    }

    /// The GraphQL endpoint, `<host>/api/graphql`
    pub fn graphql_url(&self) -> Result<Url> {
        Url::parse(&self.base_url)
            .and_then(|base| base.join("api/graphql"))
            .map_err(|_| CanvasError::invalid_url(self.base_url.as_str()))
    }

    /// Enable response dumps into `canvas-logs/`
    pub fn with_debug_logging(mut self, enabled: bool) -> Self {
        self.debug.log_responses = enabled;
        if enabled && self.debug.log_directory.is_none() {
            self.debug.log_directory = Some(PathBuf::from("canvas-logs"));
        }
        self
    }
}
