//! Error types for the envmgr system

use crate::value::PrimitiveKind;
use std::num::{ParseFloatError, ParseIntError};
use thiserror::Error;

/// Main error type returned by parsing, substitution, binding and loading
#[derive(Error, Debug)]
pub enum EnvError {
    /// Malformed env file syntax
    #[error("Invalid env file syntax in {file}:{line}:{column}: {reason}")]
    Parser {
        file: String,
        line: usize,
        column: usize,
        reason: String,
    },

    /// File access, substitution or export failures
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A value could not be converted to the field's declared type
    #[error("Invalid value for field {field} ({key}): {source}")]
    TypeCast {
        field: String,
        key: String,
        #[source]
        source: CastError,
    },

    /// A required field has neither a value nor a default
    #[error("Key not found: {key} is not set for field {field}")]
    KeyNotFound { field: String, key: String },

    /// Structural misuse of the binder or of a field's annotations
    #[error("Invalid usage for field {field}: {reason}")]
    InvalidUsage { field: String, reason: String },

    /// The field's declared type has no binding rule
    #[error("Unsupported type {type_name} in field {field}")]
    UnsupportedType { field: String, type_name: String },
}

/// Result type alias for envmgr operations
pub type Result<T> = std::result::Result<T, EnvError>;

/// Configuration specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read
    #[error("error reading file {path}: {source}")]
    FileUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A `${NAME}` reference names an unknown variable
    #[error("variable {name} not found")]
    VariableNotFound { name: String },

    /// A `${NAME}` reference eventually refers back to itself
    #[error("circular reference detected for variable {name}")]
    CircularReference { name: String },

    /// Non-cyclic reference chain that is too deep
    #[error("maximum substitution depth {max} exceeded")]
    DepthExceeded { max: usize },

    /// Setting an external variable failed
    #[error("error setting env variable {name}: {reason}")]
    ExportFailed { name: String, reason: String },
}

/// Failure to convert a string into a scalar value
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{value:?} cannot be cast to type {target}: {source}")]
pub struct CastError {
    pub value: String,
    pub target: PrimitiveKind,
    #[source]
    pub source: CastFailure,
}

impl CastError {
    pub fn new(value: &str, target: PrimitiveKind, source: impl Into<CastFailure>) -> Self {
        Self {
            value: value.to_string(),
            target,
            source: source.into(),
        }
    }
}

/// Underlying reason of a [`CastError`]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CastFailure {
    #[error(transparent)]
    Int(#[from] ParseIntError),

    #[error(transparent)]
    Float(#[from] ParseFloatError),

    #[error(transparent)]
    Duration(#[from] humantime::DurationError),

    #[error("invalid boolean literal")]
    InvalidBool,

    #[error("invalid complex literal")]
    InvalidComplex,
}

impl EnvError {
    pub fn parser(file: &str, line: usize, column: usize, reason: impl Into<String>) -> Self {
        EnvError::Parser {
            file: file.to_string(),
            line,
            column,
            reason: reason.into(),
        }
    }

    pub fn invalid_usage(field: &str, reason: impl Into<String>) -> Self {
        EnvError::InvalidUsage {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub fn key_not_found(field: &str, key: &str) -> Self {
        EnvError::KeyNotFound {
            field: field.to_string(),
            key: key.to_string(),
        }
    }

    pub fn type_cast(field: &str, key: &str, source: CastError) -> Self {
        EnvError::TypeCast {
            field: field.to_string(),
            key: key.to_string(),
            source,
        }
    }

    /// Whether the error is a circular `${NAME}` reference
    pub fn is_circular_reference(&self) -> bool {
        matches!(self, EnvError::Config(ConfigError::CircularReference { .. }))
    }
}
