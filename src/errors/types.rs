//! Error type definitions for the token list resolver

use thiserror::Error;

/// Top-level application error type
///
/// Only failures of the orchestration itself end up here. A document that
/// cannot be fetched is not an `AppError`; see [`FetchError`].
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Registry file could not be loaded
    #[error("Registry error: {path} - {message}")]
    Registry { path: String, message: String },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },

    /// HTTP client construction errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Upstream retrieval errors
///
/// Covers both the transport failures (network, status, timeout) and the
/// validation failures (body is not JSON, or not a token list).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Connection or protocol level failure
    #[error("Transport error: {url} - {message}")]
    Transport { url: String, message: String },

    /// Upstream answered with a non-success status
    #[error("HTTP error: {status} - {url}")]
    Status { url: String, status: u16 },

    /// Upstream did not answer within the configured timeout
    #[error("Request timeout: {url}")]
    Timeout { url: String },

    /// Body could not be parsed as structured data
    #[error("Parse error: {url} - {message}")]
    Parse { url: String, message: String },

    /// Body parsed but does not have the token list shape
    #[error("Validation failed: {url} - {message}")]
    Validation { url: String, message: String },
}

/// Convenience methods for creating common error types
impl AppError {
    /// Create a configuration error with a custom message
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a registry loading error
    pub fn registry<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::Registry {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl FetchError {
    pub fn transport<U: Into<String>, M: Into<String>>(url: U, message: M) -> Self {
        Self::Transport {
            url: url.into(),
            message: message.into(),
        }
    }

    pub fn status<U: Into<String>>(url: U, status: u16) -> Self {
        Self::Status {
            url: url.into(),
            status,
        }
    }

    pub fn timeout<U: Into<String>>(url: U) -> Self {
        Self::Timeout { url: url.into() }
    }

    pub fn parse<U: Into<String>, M: Into<String>>(url: U, message: M) -> Self {
        Self::Parse {
            url: url.into(),
            message: message.into(),
        }
    }

    pub fn validation<U: Into<String>, M: Into<String>>(url: U, message: M) -> Self {
        Self::Validation {
            url: url.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_messages_name_the_url() {
        assert_eq!(
            FetchError::status("http://lists.example/a.json", 404).to_string(),
            "HTTP error: 404 - http://lists.example/a.json"
        );
        assert_eq!(
            FetchError::timeout("http://lists.example/a.json").to_string(),
            "Request timeout: http://lists.example/a.json"
        );
        assert_eq!(
            FetchError::validation("http://lists.example/a.json", "missing field `tokens`").to_string(),
            "Validation failed: http://lists.example/a.json - missing field `tokens`"
        );
    }

    #[test]
    fn test_app_error_helpers() {
        assert_eq!(
            AppError::registry("token-lists.json", "expected a map").to_string(),
            "Registry error: token-lists.json - expected a map"
        );
        assert_eq!(
            AppError::internal("visited set lock poisoned").to_string(),
            "Internal error: visited set lock poisoned"
        );
    }
}
