//! Error types for the Canvas client

use compact_str::CompactString;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CanvasError>;

#[derive(Debug, Error)]
pub enum CanvasError {
    /// Missing or unusable credentials, or an incomplete upload handshake
    #[error("Configuration error ({field}): {message}")]
    Configuration { field: CompactString, message: String },

    /// The server rejected the call or reported an application-level failure
    #[error("Canvas API Error ({status}): {message}")]
    Api {
        status: u16,
        message: String,
        raw_response: String,
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse JSON from {endpoint}: {message}")]
    JsonParse {
        endpoint: CompactString,
        message: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid URL: {url}")]
    InvalidUrl { url: String },

    /// Caller supplied malformed input
    #[error("{message}")]
    Validation { message: String },
}

/// Coarse classification so callers can decide on retries without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Validation,
    Unauthorized,
    NotFound,
    RateLimited,
    BadRequest,
    Server,
    Transport,
    Protocol,
}

impl CanvasError {
    pub fn config(field: impl Into<CompactString>, message: impl Into<String>) -> Self {
        Self::Configuration { field: field.into(), message: message.into() }
    }

    pub fn api(status: u16, message: impl Into<String>, raw_response: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
            raw_response: raw_response.into(),
        }
    }

    pub fn json_parse(
        endpoint: impl Into<CompactString>,
        message: impl Into<String>,
        source: serde_json::Error,
    ) -> Self {
        Self::JsonParse {
            endpoint: endpoint.into(),
            message: message.into(),
            source,
        }
    }

    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation { message: message.into() }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration { .. } => ErrorKind::Configuration,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Http(_) => ErrorKind::Transport,
            Self::JsonParse { .. } | Self::InvalidUrl { .. } => ErrorKind::Protocol,
            Self::Api { status, .. } => match status {
                401 | 403 => ErrorKind::Unauthorized,
                404 => ErrorKind::NotFound,
                429 => ErrorKind::RateLimited,
                500..=599 => ErrorKind::Server,
                // GraphQL reports failures with a 2xx status
                200..=299 => ErrorKind::Protocol,
                _ => ErrorKind::BadRequest,
            },
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Transport | ErrorKind::RateLimited | ErrorKind::Server
        )
    }

    /// HTTP status for errors that carry one
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
