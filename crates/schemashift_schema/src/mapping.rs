//! Leaf type mappers between BigQuery type tags and Avro type expressions.
//!
//! Both directions are exhaustive matches. `None` means "no equivalent"; the
//! converters turn it into an error or a placeholder depending on
//! [`UnsupportedTypePolicy`](crate::config::UnsupportedTypePolicy).

use crate::avro::{AvroType, LogicalType, Primitive};
use crate::bigquery::FieldType;
use crate::defaults::{BIGNUMERIC_PRECISION, BIGNUMERIC_SCALE, NUMERIC_PRECISION, NUMERIC_SCALE};

/// Avro type for a scalar BigQuery type.
///
/// RECORD is structural and handled by the converter, so it maps to `None`
/// here along with unknown tags.
pub fn avro_type_for(field_type: &FieldType) -> Option<AvroType> {
    let ty = match field_type {
        FieldType::String | FieldType::Geography | FieldType::Json | FieldType::Range => {
            AvroType::Primitive(Primitive::String)
        }
        FieldType::Bytes => AvroType::Primitive(Primitive::Bytes),
        FieldType::Integer => AvroType::Primitive(Primitive::Long),
        FieldType::Float => AvroType::Primitive(Primitive::Double),
        FieldType::Boolean => AvroType::Primitive(Primitive::Boolean),
        FieldType::Numeric => AvroType::decimal(NUMERIC_PRECISION, NUMERIC_SCALE),
        FieldType::BigNumeric => AvroType::decimal(BIGNUMERIC_PRECISION, BIGNUMERIC_SCALE),
        FieldType::Timestamp => AvroType::logical(Primitive::Long, LogicalType::TimestampMillis),
        FieldType::Date => AvroType::logical(Primitive::Int, LogicalType::Date),
        FieldType::Time => AvroType::logical(Primitive::Int, LogicalType::TimeMillis),
        FieldType::DateTime => AvroType::logical(Primitive::Long, LogicalType::LocalTimestampMillis),
        FieldType::Record | FieldType::Unsupported(_) => return None,
    };
    Some(ty)
}

/// BigQuery type tag for an Avro type, after union and array unwrapping.
///
/// `int`/`long` both become INTEGER and `float`/`double` both become FLOAT.
pub fn bigquery_type_for(ty: &AvroType) -> Option<FieldType> {
    match ty {
        AvroType::Primitive(primitive) => primitive_type(*primitive),
        AvroType::Record(_) | AvroType::Map { .. } => Some(FieldType::Record),
        AvroType::Enum { .. } => Some(FieldType::String),
        AvroType::Fixed {
            logical: Some(LogicalType::Decimal { precision, scale }),
            ..
        } => decimal_type(*precision, *scale),
        AvroType::Fixed { .. } => Some(FieldType::Bytes),
        AvroType::Logical { physical, logical } => match logical {
            LogicalType::Decimal { precision, scale } => decimal_type(*precision, *scale),
            LogicalType::Date => Some(FieldType::Date),
            LogicalType::TimeMillis | LogicalType::TimeMicros => Some(FieldType::Time),
            LogicalType::TimestampMillis | LogicalType::TimestampMicros => Some(FieldType::Timestamp),
            LogicalType::LocalTimestampMillis | LogicalType::LocalTimestampMicros => {
                Some(FieldType::DateTime)
            }
            LogicalType::Other(_) => primitive_type(*physical),
        },
        AvroType::Union(_) | AvroType::Array { .. } | AvroType::Named(_) | AvroType::Unmapped => None,
    }
}

fn primitive_type(primitive: Primitive) -> Option<FieldType> {
    match primitive {
        Primitive::String => Some(FieldType::String),
        Primitive::Bytes => Some(FieldType::Bytes),
        Primitive::Int | Primitive::Long => Some(FieldType::Integer),
        Primitive::Float | Primitive::Double => Some(FieldType::Float),
        Primitive::Boolean => Some(FieldType::Boolean),
        Primitive::Null => None,
    }
}

/// Only the two fixed precision/scale pairs this crate emits have an inverse.
fn decimal_type(precision: u32, scale: u32) -> Option<FieldType> {
    match (precision, scale) {
        (NUMERIC_PRECISION, NUMERIC_SCALE) => Some(FieldType::Numeric),
        (BIGNUMERIC_PRECISION, BIGNUMERIC_SCALE) => Some(FieldType::BigNumeric),
        _ => None,
    }
}
