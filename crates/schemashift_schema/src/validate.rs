//! Shallow top-level shape check run before decoding.

use crate::error::ShapeError;
use crate::format::SchemaFormat;
use serde_json::Value;

/// Check that `value` has the top-level shape of `format`.
///
/// Only the outermost value is inspected. Problems inside fields surface
/// later, while decoding, as located `MissingField`/`InvalidField` errors.
pub fn validate_shape(value: &Value, format: SchemaFormat) -> Result<(), ShapeError> {
    if !(value.is_object() || value.is_array()) {
        return Err(ShapeError::NotAnObject);
    }
    match format {
        SchemaFormat::BigQuery if !value.is_array() => Err(ShapeError::NotAnArray),
        SchemaFormat::Avro if value.is_array() => Err(ShapeError::UnexpectedArray),
        _ => Ok(()),
    }
}
