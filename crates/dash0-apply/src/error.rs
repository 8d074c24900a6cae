//! Error types for dash0-apply

use dash0_api::ApiError;
use dash0_core::AssetKind;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for apply operations
pub type Result<T> = std::result::Result<T, ApplyError>;

/// Where a document came from: its file (none for stdin) and 1-based position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef {
    pub source_file: Option<PathBuf>,
    pub index: usize,
}

impl DocumentRef {
    pub fn new(source_file: Option<PathBuf>, index: usize) -> Self {
        Self { source_file, index }
    }
}

impl fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source_file {
            Some(path) => write!(f, "{} (document {})", path.display(), self.index),
            None => write!(f, "document {}", self.index),
        }
    }
}

/// A single problem found while validating a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub location: DocumentRef,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

/// What the engine was doing when an API call failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Read,
    Create,
    Update,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Read => "read",
            Operation::Create => "create",
            Operation::Update => "update",
        })
    }
}

/// Errors that can occur while loading, validating or applying documents
#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no documents found in {source_name}")]
    EmptyInput { source_name: String },

    #[error("no .yaml or .yml files found in {}", .path.display())]
    NoYamlFiles { path: PathBuf },

    #[error("invalid YAML in {location}: {message}")]
    Yaml {
        location: DocumentRef,
        message: String,
    },

    #[error("validation failed with {}:{}", count_errors(.issues.len()), list_issues(.issues))]
    Validation { issues: Vec<ValidationIssue> },

    #[error("cannot decode {kind} in {location}: {message}")]
    Decode {
        kind: AssetKind,
        location: DocumentRef,
        message: String,
    },

    #[error("cannot convert {location}: {message}")]
    Conversion {
        location: DocumentRef,
        message: String,
    },

    #[error("no handler registered for {kind}")]
    UnsupportedKind { kind: AssetKind },

    #[error("failed to {operation} {} \"{asset}\": {}", .kind.display_name(), describe_api_error(.source))]
    Api {
        operation: Operation,
        kind: AssetKind,
        asset: String,
        #[source]
        source: ApiError,
    },
}

fn count_errors(n: usize) -> String {
    if n == 1 {
        "1 error".to_string()
    } else {
        format!("{} errors", n)
    }
}

fn list_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(|issue| format!("\n  - {}", issue))
        .collect()
}

fn describe_api_error(error: &ApiError) -> String {
    match error.detail() {
        Some(detail) => format!("{} - {}", error.category(), detail),
        None => error.category().to_string(),
    }
}

impl ApplyError {
    /// Failure reading a path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ApplyError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ApplyError::Validation { .. } | ApplyError::Yaml { .. } | ApplyError::EmptyInput { .. }
        )
    }

    /// The API error behind this failure, if any
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            ApplyError::Api { source, .. } => Some(source),
            _ => None,
        }
    }
}
