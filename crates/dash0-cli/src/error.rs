//! CLI error types with exit code handling
//!
//! Errors from the library crates are folded into [`CliError`], which knows
//! its exit code and carries a help line for miette's report.

use dash0_api::{ApiError, ErrorCategory};
use dash0_apply::ApplyError;
use miette::Diagnostic;
use thiserror::Error;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum CliError {
    /// Input documents rejected before any write
    #[error("{message}")]
    #[diagnostic(code(dash0::cli::validation))]
    Validation {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Missing or inconsistent connection settings or profiles
    #[error("Configuration error: {message}")]
    #[diagnostic(code(dash0::cli::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// The API rejected a request
    #[error("{message}")]
    #[diagnostic(code(dash0::cli::api))]
    Api {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// A batch failed after some documents were applied
    #[error("{message}")]
    #[diagnostic(code(dash0::cli::partial_apply))]
    PartialApply {
        message: String,
        #[help]
        help: String,
    },

    /// IO error (file not found, permissions, etc.)
    #[error("IO error: {message}")]
    #[diagnostic(code(dash0::cli::io))]
    Io { message: String },

    /// Invalid arguments
    #[error("{message}")]
    #[diagnostic(code(dash0::cli::usage))]
    Usage { message: String },

    /// Internal error (runtime, unexpected failure)
    #[error("Internal error: {message}")]
    #[diagnostic(code(dash0::cli::internal))]
    Internal { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Validation { .. } => exit_codes::VALIDATION_ERROR,
            CliError::Config { .. } => exit_codes::ERROR,
            CliError::Api { .. } => exit_codes::API_ERROR,
            CliError::PartialApply { .. } => exit_codes::PARTIAL_APPLY,
            CliError::Io { .. } => exit_codes::IO_ERROR,
            CliError::Usage { .. } => exit_codes::USAGE_ERROR,
            CliError::Internal { .. } => exit_codes::ERROR,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create a usage error
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }

    /// Create a validation error with help text
    pub fn validation_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// A batch failure after `applied` documents went through
    pub fn partial(source: ApplyError, applied: usize) -> Self {
        Self::PartialApply {
            message: source.to_string(),
            help: format!(
                "{} document(s) listed above were applied and were not rolled back",
                applied
            ),
        }
    }
}

/// Help line for an API failure category
fn api_help(category: ErrorCategory) -> Option<String> {
    let help = match category {
        ErrorCategory::Unauthorized => {
            "Check the auth token, or select another profile with 'dash0 config profiles select'"
        }
        ErrorCategory::Forbidden => "The auth token needs write access to the target dataset",
        ErrorCategory::BadRequest => "Compare the document with one exported by 'dash0 <kind> get'",
        ErrorCategory::RateLimited => "Wait a moment and run the command again",
        ErrorCategory::NotFound => "List the available assets with 'dash0 <kind> list'",
        _ => return None,
    };
    Some(help.to_string())
}

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        match &err {
            ApiError::ProfileNotFound { .. } => CliError::Config {
                message: err.to_string(),
                help: Some("List profiles with 'dash0 config profiles list'".to_string()),
            },
            ApiError::ProfileAlreadyExists { .. } => CliError::Config {
                message: err.to_string(),
                help: Some("Delete it first with 'dash0 config profiles delete'".to_string()),
            },
            ApiError::InvalidConfig { .. } => CliError::Config {
                message: err.to_string(),
                help: Some(
                    "Create a profile with 'dash0 config profiles create <name> --api-url <url> --auth-token <token>'"
                        .to_string(),
                ),
            },
            ApiError::Io(e) => CliError::Io {
                message: e.to_string(),
            },
            _ => CliError::Api {
                help: api_help(err.category()),
                message: err.to_string(),
            },
        }
    }
}

impl From<ApplyError> for CliError {
    fn from(err: ApplyError) -> Self {
        match &err {
            ApplyError::Io { .. } | ApplyError::NoYamlFiles { .. } => CliError::Io {
                message: err.to_string(),
            },
            ApplyError::Api { source, .. } => CliError::Api {
                help: api_help(source.category()),
                message: err.to_string(),
            },
            ApplyError::UnsupportedKind { .. } => CliError::internal(err.to_string()),
            ApplyError::Validation { .. } | ApplyError::Yaml { .. } | ApplyError::EmptyInput { .. } => {
                CliError::validation_with_help(
                    err.to_string(),
                    "Nothing was applied; fix the documents and run the command again",
                )
            }
            ApplyError::Decode { .. } | ApplyError::Conversion { .. } => CliError::Validation {
                message: err.to_string(),
                help: None,
            },
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::internal(err.to_string())
    }
}

impl From<serde_yaml::Error> for CliError {
    fn from(err: serde_yaml::Error) -> Self {
        CliError::internal(err.to_string())
    }
}

impl From<dash0_core::CoreError> for CliError {
    fn from(err: dash0_core::CoreError) -> Self {
        CliError::internal(err.to_string())
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
