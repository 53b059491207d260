//! Conversion errors.

use crate::format::SchemaFormat;
use thiserror::Error;

/// Top-level shape problems detected before any decoding happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("the schema is not a JSON object")]
    NotAnObject,

    #[error("a BigQuery schema must be a JSON array of fields")]
    NotAnArray,

    #[error("an Avro schema must not be a JSON array")]
    UnexpectedArray,
}

/// Errors that can occur while converting a schema.
///
/// Every failure aborts the whole conversion; no partial schema is returned.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Schema is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid schema shape: {0}")]
    InvalidShape(#[from] ShapeError),

    #[error("Missing required key '{field}' at {location}")]
    MissingField { location: String, field: String },

    #[error("Invalid value at {location}: {reason}")]
    InvalidField { location: String, reason: String },

    #[error("Schema nesting exceeds the maximum depth of {max_depth} at {location}")]
    DepthExceeded { location: String, max_depth: usize },

    #[error("Field '{path}' has type '{type_name}' which has no {target} equivalent")]
    UnsupportedType {
        path: String,
        type_name: String,
        target: SchemaFormat,
    },

    #[error("Conversion from {from} to {to} is not supported")]
    UnsupportedDirection { from: SchemaFormat, to: SchemaFormat },
}

impl ConvertError {
    /// True when the error comes from the input text rather than from a
    /// type that cannot be expressed in the destination format.
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            ConvertError::Parse(_)
                | ConvertError::InvalidShape(_)
                | ConvertError::MissingField { .. }
                | ConvertError::InvalidField { .. }
                | ConvertError::DepthExceeded { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
