//! Core error types

use thiserror::Error;

use crate::kind::AssetKind;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("unsupported asset kind: {kind}")]
    UnsupportedKind { kind: String },

    #[error("{kind} is not a native asset kind and cannot be stored")]
    NotNative { kind: AssetKind },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
