//! Map-shape detection.
//!
//! BigQuery has no map type. By convention a map is written as a REPEATED
//! RECORD holding exactly a STRING `key` and a `value` column, and that shape
//! is read back as an Avro `map`. This is a best-effort convention, not a
//! format guarantee: a genuine two-column record that happens to use these
//! names is reinterpreted too.

use crate::avro::AvroType;
use crate::bigquery::{BigQueryField, FieldType, Mode};

pub const MAP_KEY_FIELD: &str = "key";
pub const MAP_VALUE_FIELD: &str = "value";
pub const MAP_KEY_DESCRIPTION: &str = "Map key";
pub const MAP_VALUE_DESCRIPTION: &str = "Map value";

/// True if `field` is a REPEATED RECORD of exactly `key` (STRING) and `value`.
pub fn is_map_shaped(field: &BigQueryField) -> bool {
    field.field_type == FieldType::Record
        && field.mode == Mode::Repeated
        && field.fields.len() == 2
        && field
            .fields
            .iter()
            .any(|f| f.name == MAP_KEY_FIELD && f.field_type == FieldType::String)
        && field.fields.iter().any(|f| f.name == MAP_VALUE_FIELD)
}

/// The `value` column of a map-shaped field.
pub fn map_value_field(field: &BigQueryField) -> Option<&BigQueryField> {
    if !is_map_shaped(field) {
        return None;
    }
    field.fields.iter().find(|f| f.name == MAP_VALUE_FIELD)
}

/// True if `ty` is an Avro map.
pub fn is_avro_map(ty: &AvroType) -> bool {
    avro_map_values(ty).is_some()
}

/// The value type of an Avro map.
pub fn avro_map_values(ty: &AvroType) -> Option<&AvroType> {
    match ty {
        AvroType::Map { values, .. } => Some(values.as_ref()),
        _ => None,
    }
}

/// The key/value column pair that stands in for an Avro map in BigQuery.
pub fn map_columns(value: BigQueryField) -> Vec<BigQueryField> {
    vec![
        BigQueryField::new(MAP_KEY_FIELD, FieldType::String).with_description(MAP_KEY_DESCRIPTION),
        value,
    ]
}
