//! BigQuery -> Avro conversion.

use crate::avro::{AvroField, AvroRecord, AvroType};
use crate::bigquery::{BigQueryField, BigQuerySchema, FieldType, Mode};
use crate::config::ConvertOptions;
use crate::decode::field_path;
use crate::error::Result;
use crate::format::SchemaFormat;
use crate::map_shape::{is_map_shaped, map_value_field, MAP_VALUE_FIELD};
use crate::mapping::avro_type_for;
use tracing::{debug, trace};

/// Convert a BigQuery schema into a top-level Avro record.
///
/// The record is named after [`ConvertOptions::record_name`]; nested records
/// are named after the field that holds them.
pub fn bigquery_to_avro(schema: &BigQuerySchema, options: &ConvertOptions) -> Result<AvroRecord> {
    debug!(
        fields = schema.fields.len(),
        record = %options.record_name,
        "Converting BigQuery schema to Avro"
    );
    let mut record = record_from_fields(&schema.fields, &options.record_name, "", options)?;
    record.namespace = options.namespace.clone();
    Ok(record)
}

fn record_from_fields(
    fields: &[BigQueryField],
    name: &str,
    parent: &str,
    options: &ConvertOptions,
) -> Result<AvroRecord> {
    let fields = fields
        .iter()
        .map(|field| {
            let path = field_path(parent, &field.name);
            Ok(AvroField {
                name: field.name.clone(),
                doc: field.documentation().map(str::to_string),
                schema: field_type(field, &path, options)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(AvroRecord::new(name, fields))
}

/// Avro type of a field with its mode applied.
pub(crate) fn field_type(field: &BigQueryField, path: &str, options: &ConvertOptions) -> Result<AvroType> {
    let base = physical_type(field, path, options)?;
    Ok(match field.mode {
        Mode::Nullable => AvroType::nullable(base),
        Mode::Repeated if !is_map_shaped(field) => AvroType::array(base),
        _ => base,
    })
}

fn physical_type(field: &BigQueryField, path: &str, options: &ConvertOptions) -> Result<AvroType> {
    if field.field_type == FieldType::Record {
        if let Some(value) = map_value_field(field) {
            trace!(field = path, "Map-shaped record becomes an Avro map");
            let values = field_type(value, &field_path(path, MAP_VALUE_FIELD), options)?;
            return Ok(AvroType::map(values));
        }
        return record_from_fields(&field.fields, &field.name, path, options).map(AvroType::Record);
    }

    match avro_type_for(&field.field_type) {
        Some(ty) => Ok(ty),
        None => {
            options
                .unsupported
                .apply(path, field.field_type.as_str(), SchemaFormat::Avro)?;
            Ok(AvroType::Unmapped)
        }
    }
}
