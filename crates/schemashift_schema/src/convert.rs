//! Conversion entry point.
//!
//! text -> parse -> validate(source) -> decode -> convert -> typed schema

use crate::avro::AvroRecord;
use crate::bigquery::BigQuerySchema;
use crate::config::ConvertOptions;
use crate::error::{ConvertError, Result};
use crate::format::SchemaFormat;
use crate::to_avro::bigquery_to_avro;
use crate::to_bigquery::avro_to_bigquery;
use crate::validate::validate_shape;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// A decoded or converted schema in either format.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Schema {
    BigQuery(BigQuerySchema),
    Avro(AvroRecord),
}

impl Schema {
    pub fn format(&self) -> SchemaFormat {
        match self {
            Schema::BigQuery(_) => SchemaFormat::BigQuery,
            Schema::Avro(_) => SchemaFormat::Avro,
        }
    }

    /// Number of top-level fields
    pub fn field_count(&self) -> usize {
        match self {
            Schema::BigQuery(schema) => schema.fields.len(),
            Schema::Avro(record) => record.fields.len(),
        }
    }

    /// Deepest level of record nesting
    pub fn nesting_depth(&self) -> usize {
        match self {
            Schema::BigQuery(schema) => schema.nesting_depth(),
            Schema::Avro(record) => record.nesting_depth(),
        }
    }

    pub fn as_bigquery(&self) -> Option<&BigQuerySchema> {
        match self {
            Schema::BigQuery(schema) => Some(schema),
            Schema::Avro(_) => None,
        }
    }

    pub fn as_avro(&self) -> Option<&AvroRecord> {
        match self {
            Schema::Avro(record) => Some(record),
            Schema::BigQuery(_) => None,
        }
    }

    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Convert schema text from `source` to `destination` with default options.
pub fn convert(raw: &str, source: SchemaFormat, destination: SchemaFormat) -> Result<Schema> {
    convert_with(raw, source, destination, &ConvertOptions::default())
}

/// Convert schema text from `source` to `destination`.
pub fn convert_with(
    raw: &str,
    source: SchemaFormat,
    destination: SchemaFormat,
    options: &ConvertOptions,
) -> Result<Schema> {
    if source == destination {
        return Err(ConvertError::UnsupportedDirection {
            from: source,
            to: destination,
        });
    }
    let value: Value = serde_json::from_str(raw)?;
    convert_value(&value, source, options)
}

/// Convert already-parsed JSON in `source` format into its counterpart format.
pub fn convert_value(value: &Value, source: SchemaFormat, options: &ConvertOptions) -> Result<Schema> {
    debug!(from = %source, to = %source.counterpart(), "Converting schema");
    match decode_value(value, source, options)? {
        Schema::BigQuery(schema) => bigquery_to_avro(&schema, options).map(Schema::Avro),
        Schema::Avro(record) => avro_to_bigquery(&record.fields, options).map(Schema::BigQuery),
    }
}

/// Parse, validate and decode schema text without converting it.
pub fn parse_schema(raw: &str, format: SchemaFormat, options: &ConvertOptions) -> Result<Schema> {
    let value: Value = serde_json::from_str(raw)?;
    decode_value(&value, format, options)
}

fn decode_value(value: &Value, format: SchemaFormat, options: &ConvertOptions) -> Result<Schema> {
    validate_shape(value, format)?;
    match format {
        SchemaFormat::BigQuery => BigQuerySchema::from_value(value, options.max_depth).map(Schema::BigQuery),
        SchemaFormat::Avro => AvroRecord::from_value(value, options.max_depth).map(Schema::Avro),
    }
}
