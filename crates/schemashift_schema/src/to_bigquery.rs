//! Avro -> BigQuery conversion.

use crate::avro::{AvroField, AvroType, Primitive};
use crate::bigquery::{BigQueryField, BigQuerySchema, FieldType, Mode};
use crate::config::ConvertOptions;
use crate::decode::field_path;
use crate::error::Result;
use crate::format::SchemaFormat;
use crate::map_shape::{avro_map_values, map_columns, MAP_VALUE_DESCRIPTION, MAP_VALUE_FIELD};
use crate::mapping::bigquery_type_for;
use tracing::debug;

/// Convert the field list of an Avro record into a BigQuery schema.
pub fn avro_to_bigquery(fields: &[AvroField], options: &ConvertOptions) -> Result<BigQuerySchema> {
    debug!(fields = fields.len(), "Converting Avro fields to BigQuery");
    fields_from_record(fields, "", options).map(BigQuerySchema::new)
}

fn fields_from_record(
    fields: &[AvroField],
    parent: &str,
    options: &ConvertOptions,
) -> Result<Vec<BigQueryField>> {
    fields
        .iter()
        .map(|field| {
            field_from_type(
                &field.name,
                &field.schema,
                field.documentation(),
                &field_path(parent, &field.name),
                options,
            )
        })
        .collect()
}

fn field_from_type(
    name: &str,
    ty: &AvroType,
    doc: Option<&str>,
    path: &str,
    options: &ConvertOptions,
) -> Result<BigQueryField> {
    let mut mode = Mode::Required;
    let mut ty = ty;

    if let AvroType::Union(members) = ty {
        let null = AvroType::Primitive(Primitive::Null);
        if members.contains(&null) {
            mode = Mode::Nullable;
        }
        let mut non_null = members.iter().filter(|member| **member != null);
        match (non_null.next(), non_null.next()) {
            (Some(inner), None) => ty = inner,
            _ => {
                return unsupported(name, ty, doc, path, options).map(|field| field.with_mode(mode))
            }
        }
    }

    if let AvroType::Array { items, .. } = ty {
        mode = Mode::Repeated;
        ty = items.as_ref();
    }

    let field_type = match bigquery_type_for(ty) {
        Some(field_type) => field_type,
        None => return unsupported(name, ty, doc, path, options).map(|field| field.with_mode(mode)),
    };

    let mut field = BigQueryField::new(name, field_type).with_mode(mode);
    if let Some(doc) = doc.filter(|d| !d.is_empty()) {
        field.description = Some(doc.to_string());
    }

    if let Some(values) = avro_map_values(ty) {
        let value = field_from_type(
            MAP_VALUE_FIELD,
            values,
            Some(MAP_VALUE_DESCRIPTION),
            &field_path(path, MAP_VALUE_FIELD),
            options,
        )?;
        field.mode = Mode::Repeated;
        field.fields = map_columns(value);
    } else if let AvroType::Record(record) = ty {
        field.fields = fields_from_record(&record.fields, path, options)?;
    }

    Ok(field)
}

/// Apply the unsupported-type policy; on `Placeholder`, yield a field with an empty type.
fn unsupported(
    name: &str,
    ty: &AvroType,
    doc: Option<&str>,
    path: &str,
    options: &ConvertOptions,
) -> Result<BigQueryField> {
    options
        .unsupported
        .apply(path, &ty.describe(), SchemaFormat::BigQuery)?;
    let mut field = BigQueryField::new(name, FieldType::unmapped());
    if let Some(doc) = doc.filter(|d| !d.is_empty()) {
        field.description = Some(doc.to_string());
    }
    Ok(field)
}
