//! BigQuery <-> Avro Schema Conversion
//!
//! Converts BigQuery JSON table schemas (a bare array of columns) into Avro
//! record schemas and back. Conversion is a pure function of the input text:
//!
//! 1. **Parse**: the text must be JSON
//! 2. **Validate**: the top-level shape must match the declared source format
//! 3. **Decode**: the JSON becomes a typed model, bounded by a maximum depth
//! 4. **Convert**: recursive descent over the typed model
//!
//! Round trips are many-to-one in places: Avro `int`/`float` collapse into
//! INTEGER/FLOAT, and only the fixed NUMERIC/BIGNUMERIC decimal parameters
//! map back to a BigQuery type.
//!
//! # Modules
//!
//! - [`bigquery`]: BigQuery field model and decoding
//! - [`avro`]: Avro type model, decoding and serialization
//! - [`mapping`]: leaf type mappers in both directions
//! - [`map_shape`]: the key/value record <-> Avro map convention
//! - [`to_avro`] / [`to_bigquery`]: the recursive converters
//! - [`validate`]: top-level shape check
//! - [`convert`]: the entry point

pub mod avro;
pub mod bigquery;
pub mod config;
pub mod convert;
mod decode;
pub mod defaults;
pub mod error;
pub mod format;
pub mod map_shape;
pub mod mapping;
pub mod to_avro;
pub mod to_bigquery;
pub mod validate;

pub use avro::{AvroField, AvroRecord, AvroType, LogicalType, Primitive};
pub use bigquery::{BigQueryField, BigQuerySchema, FieldType, Mode};
pub use config::{ConvertOptions, UnsupportedTypePolicy};
pub use convert::{convert, convert_value, convert_with, parse_schema, Schema};
pub use error::{ConvertError, ShapeError};
pub use format::SchemaFormat;
pub use to_avro::bigquery_to_avro;
pub use to_bigquery::avro_to_bigquery;
pub use validate::validate_shape;
