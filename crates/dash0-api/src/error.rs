//! Error types for API operations

use dash0_core::{AssetKind, CoreError};
use std::fmt;
use thiserror::Error;

/// API operation errors
#[derive(Debug, Error)]
pub enum ApiError {
    // ============ Classified HTTP Errors ============
    #[error("{kind} '{id}' not found")]
    NotFound { kind: AssetKind, id: String },

    #[error("unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("forbidden: {message}")]
    Forbidden { message: String },

    #[error("bad request: {message}")]
    BadRequest { message: String },

    #[error("conflict: {message}")]
    Conflict { message: String },

    #[error("rate limited by server{}", retry_hint(.retry_after))]
    RateLimited { retry_after: Option<u64> },

    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("HTTP error ({status}): {message}")]
    Http { status: u16, message: String },

    // ============ Transport Errors ============
    #[error("network error: {message}")]
    Network { message: String },

    #[error("request timeout after {seconds}s")]
    Timeout { seconds: u64 },

    // ============ Configuration Errors ============
    #[error("profile not found: {name}")]
    ProfileNotFound { name: String },

    #[error("profile already exists: {name}")]
    ProfileAlreadyExists { name: String },

    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    // ============ Other ============
    #[error("{kind} assets cannot be sent to the API")]
    UnsupportedKind { kind: AssetKind },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn retry_hint(retry_after: &Option<u64>) -> String {
    match retry_after {
        Some(seconds) => format!(", retry after {} seconds", seconds),
        None => String::new(),
    }
}

/// Result type for API operations
pub type Result<T> = std::result::Result<T, ApiError>;

/// Coarse classification of API failures, used for user-facing messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    NotFound,
    Unauthorized,
    Forbidden,
    BadRequest,
    Conflict,
    RateLimited,
    ServerError,
    Unknown,
}

impl ErrorCategory {
    pub fn describe(&self) -> &'static str {
        match self {
            ErrorCategory::NotFound => "not found",
            ErrorCategory::Unauthorized => "unauthorized (check the auth token)",
            ErrorCategory::Forbidden => "forbidden (the auth token lacks permission)",
            ErrorCategory::BadRequest => "rejected as invalid",
            ErrorCategory::Conflict => "conflicts with the current server state",
            ErrorCategory::RateLimited => "rate limited (try again later)",
            ErrorCategory::ServerError => "server error",
            ErrorCategory::Unknown => "unexpected error",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

impl ApiError {
    /// Classify an HTTP status code
    ///
    /// `id` names the asset for 404s; `retry_after` comes from the
    /// `Retry-After` header of 429 responses.
    pub fn from_status(
        status: u16,
        kind: AssetKind,
        id: Option<&str>,
        message: impl Into<String>,
        retry_after: Option<u64>,
    ) -> Self {
        let message = message.into();
        match status {
            400 | 422 => ApiError::BadRequest { message },
            401 => ApiError::Unauthorized { message },
            403 => ApiError::Forbidden { message },
            404 => ApiError::NotFound {
                kind,
                id: id.unwrap_or_default().to_string(),
            },
            409 => ApiError::Conflict { message },
            429 => ApiError::RateLimited { retry_after },
            500..=599 => ApiError::Server { status, message },
            _ => ApiError::Http { status, message },
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ApiError::NotFound { .. } => ErrorCategory::NotFound,
            ApiError::Unauthorized { .. } => ErrorCategory::Unauthorized,
            ApiError::Forbidden { .. } => ErrorCategory::Forbidden,
            ApiError::BadRequest { .. } => ErrorCategory::BadRequest,
            ApiError::Conflict { .. } => ErrorCategory::Conflict,
            ApiError::RateLimited { .. } => ErrorCategory::RateLimited,
            ApiError::Server { .. } => ErrorCategory::ServerError,
            _ => ErrorCategory::Unknown,
        }
    }

    /// Check if this is a 404 Not Found
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }

    /// Detail worth showing next to the category, if any
    pub fn detail(&self) -> Option<String> {
        match self {
            ApiError::Unauthorized { message }
            | ApiError::Forbidden { message }
            | ApiError::BadRequest { message }
            | ApiError::Conflict { message }
            | ApiError::Server { message, .. } => {
                Some(message.clone()).filter(|m| !m.is_empty())
            }
            ApiError::NotFound { .. } => None,
            ApiError::RateLimited { retry_after } => {
                retry_after.map(|seconds| format!("retry after {} seconds", seconds))
            }
            other => Some(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::Timeout { seconds: 30 }
        } else if e.is_connect() {
            ApiError::Network {
                message: format!("Connection failed: {}", e),
            }
        } else if e.is_decode() {
            ApiError::Serialization(e.to_string())
        } else {
            ApiError::Network {
                message: e.to_string(),
            }
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Serialization(e.to_string())
    }
}

impl From<serde_yaml::Error> for ApiError {
    fn from(e: serde_yaml::Error) -> Self {
        ApiError::Serialization(e.to_string())
    }
}

impl From<CoreError> for ApiError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::NotNative { kind } => ApiError::UnsupportedKind { kind },
            other => ApiError::Serialization(other.to_string()),
        }
    }
}

impl From<url::ParseError> for ApiError {
    fn from(e: url::ParseError) -> Self {
        ApiError::InvalidConfig {
            message: format!("invalid API URL: {}", e),
        }
    }
}
