//! Error types.
//!
//! Request-time header problems are not errors; they are reported as
//! [`ValidationResult`](crate::validation::ValidationResult) data. Everything
//! here is a startup or configuration failure.

use thiserror::Error;

use crate::config::validation::ValidationError;

/// A schema that cannot be frozen.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("invalid header name: {0:?}")]
    InvalidHeaderName(String),

    #[error("header {header}: min_length {min} exceeds max_length {max}")]
    InvertedBounds { header: String, min: usize, max: usize },

    #[error("header {header}: unrecognized kind {kind:?}")]
    UnrecognizedKind { header: String, kind: String },

    #[error("header {header}: invalid pattern: {message}")]
    InvalidPattern { header: String, message: String },

    #[error("header {header}: {field} must not be negative, got {value}")]
    NegativeBound {
        header: String,
        field: &'static str,
        value: i64,
    },

    #[error("header {header}: length bounds only apply to string headers, not {kind}")]
    BoundsOnNonText { header: String, kind: String },

    #[error("header {header}: pattern and allowed cannot be combined")]
    ConflictingChecks { header: String },
}

/// Error loading configuration from disk.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),
}

/// A `-H "Name: value"` argument that cannot become a header.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HeaderArgError {
    #[error("header {0:?} is not in \"Name: value\" form")]
    Malformed(String),

    #[error("invalid header name {0:?}")]
    InvalidName(String),

    #[error("invalid value for header {0:?}")]
    InvalidValue(String),
}

/// Error running the server.
#[derive(Error, Debug)]
pub enum ServeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config watcher: {0}")]
    Watch(#[from] notify::Error),

    #[error("metrics exporter: {0}")]
    Metrics(String),

    #[error("invalid address {0:?}")]
    Address(String),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
