//! Apache Avro schema model.
//!
//! Avro type expressions are duck-typed JSON: a name string, a union array, or
//! an object whose `type` key selects the constructor. They decode here into
//! the explicit [`AvroType`] variant so the mappers can match exhaustively.

use crate::decode::{check_depth, child, from_value, index, null_as_default, ROOT};
use crate::defaults::DEFAULT_RECORD_NAME;
use crate::error::Result;
use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Value};
use std::fmt;

/// Avro primitive type names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Null,
    Boolean,
    Int,
    Long,
    Float,
    Double,
    Bytes,
    String,
}

impl Primitive {
    pub fn as_str(&self) -> &'static str {
        match self {
            Primitive::Null => "null",
            Primitive::Boolean => "boolean",
            Primitive::Int => "int",
            Primitive::Long => "long",
            Primitive::Float => "float",
            Primitive::Double => "double",
            Primitive::Bytes => "bytes",
            Primitive::String => "string",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "null" => Some(Primitive::Null),
            "boolean" => Some(Primitive::Boolean),
            "int" => Some(Primitive::Int),
            "long" => Some(Primitive::Long),
            "float" => Some(Primitive::Float),
            "double" => Some(Primitive::Double),
            "bytes" => Some(Primitive::Bytes),
            "string" => Some(Primitive::String),
            _ => None,
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for Primitive {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// Avro logical type refinements.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LogicalType {
    Decimal { precision: u32, scale: u32 },
    Date,
    TimeMillis,
    TimeMicros,
    TimestampMillis,
    TimestampMicros,
    LocalTimestampMillis,
    LocalTimestampMicros,
    /// Unknown to this crate; readers fall back to the physical type
    Other(String),
}

impl LogicalType {
    pub fn name(&self) -> &str {
        match self {
            LogicalType::Decimal { .. } => "decimal",
            LogicalType::Date => "date",
            LogicalType::TimeMillis => "time-millis",
            LogicalType::TimeMicros => "time-micros",
            LogicalType::TimestampMillis => "timestamp-millis",
            LogicalType::TimestampMicros => "timestamp-micros",
            LogicalType::LocalTimestampMillis => "local-timestamp-millis",
            LogicalType::LocalTimestampMicros => "local-timestamp-micros",
            LogicalType::Other(name) => name,
        }
    }

    fn write_attributes<M: SerializeMap>(&self, map: &mut M) -> std::result::Result<(), M::Error> {
        map.serialize_entry("logicalType", self.name())?;
        if let LogicalType::Decimal { precision, scale } = self {
            map.serialize_entry("precision", precision)?;
            map.serialize_entry("scale", scale)?;
        }
        Ok(())
    }
}

/// An Avro type expression.
#[derive(Debug, Clone, PartialEq)]
pub enum AvroType {
    Primitive(Primitive),
    /// Reference to a named type defined elsewhere
    Named(String),
    Union(Vec<AvroType>),
    Record(AvroRecord),
    Enum {
        name: String,
        symbols: Vec<String>,
    },
    Array {
        items: Box<AvroType>,
        default: Option<Value>,
    },
    Map {
        values: Box<AvroType>,
        default: Option<Value>,
    },
    Fixed {
        name: String,
        size: u64,
        logical: Option<LogicalType>,
    },
    Logical {
        physical: Primitive,
        logical: LogicalType,
    },
    /// Empty-string placeholder for a BigQuery type with no Avro equivalent
    Unmapped,
}

impl AvroType {
    /// `["null", inner]`
    pub fn nullable(inner: AvroType) -> Self {
        AvroType::Union(vec![AvroType::Primitive(Primitive::Null), inner])
    }

    /// An array with an empty-list default
    pub fn array(items: AvroType) -> Self {
        AvroType::Array {
            items: Box::new(items),
            default: Some(json!([])),
        }
    }

    /// A map with an empty-object default
    pub fn map(values: AvroType) -> Self {
        AvroType::Map {
            values: Box::new(values),
            default: Some(json!({})),
        }
    }

    /// Decimal carried in `bytes`
    pub fn decimal(precision: u32, scale: u32) -> Self {
        AvroType::Logical {
            physical: Primitive::Bytes,
            logical: LogicalType::Decimal { precision, scale },
        }
    }

    pub fn logical(physical: Primitive, logical: LogicalType) -> Self {
        AvroType::Logical { physical, logical }
    }

    /// Interpret a bare type name.
    pub fn from_name(name: &str) -> Self {
        match Primitive::from_name(name) {
            Some(primitive) => AvroType::Primitive(primitive),
            None => AvroType::Named(name.to_string()),
        }
    }

    /// Short human-readable description for error messages.
    pub fn describe(&self) -> String {
        match self {
            AvroType::Primitive(p) => p.as_str().to_string(),
            AvroType::Named(name) => name.clone(),
            AvroType::Union(members) => format!(
                "union [{}]",
                members.iter().map(AvroType::describe).collect::<Vec<_>>().join(", ")
            ),
            AvroType::Record(record) => format!("record {}", record.name),
            AvroType::Enum { name, .. } => format!("enum {}", name),
            AvroType::Array { items, .. } => format!("array<{}>", items.describe()),
            AvroType::Map { values, .. } => format!("map<{}>", values.describe()),
            AvroType::Fixed { name, size, .. } => format!("fixed {}[{}]", name, size),
            AvroType::Logical {
                logical: LogicalType::Decimal { precision, scale },
                ..
            } => format!("decimal({}, {})", precision, scale),
            AvroType::Logical { physical, logical } => {
                format!("{} ({})", logical.name(), physical)
            }
            AvroType::Unmapped => String::new(),
        }
    }

    fn nesting_depth(&self) -> usize {
        match self {
            AvroType::Record(record) => record.nesting_depth(),
            AvroType::Union(members) => members.iter().map(AvroType::nesting_depth).max().unwrap_or(0),
            AvroType::Array { items, .. } => items.nesting_depth(),
            AvroType::Map { values, .. } => values.nesting_depth(),
            _ => 0,
        }
    }
}

impl Serialize for AvroType {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            AvroType::Primitive(p) => p.serialize(serializer),
            AvroType::Named(name) => serializer.serialize_str(name),
            AvroType::Unmapped => serializer.serialize_str(""),
            AvroType::Union(members) => members.serialize(serializer),
            AvroType::Record(record) => record.serialize(serializer),
            AvroType::Enum { name, symbols } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("type", "enum")?;
                map.serialize_entry("name", name)?;
                map.serialize_entry("symbols", symbols)?;
                map.end()
            }
            AvroType::Array { items, default } => {
                let mut map = serializer.serialize_map(None)?;
                map.serialize_entry("type", "array")?;
                map.serialize_entry("items", items)?;
                if let Some(default) = default {
                    map.serialize_entry("default", default)?;
                }
                map.end()
            }
            AvroType::Map { values, default } => {
                let mut map = serializer.serialize_map(None)?;
                map.serialize_entry("type", "map")?;
                map.serialize_entry("values", values)?;
                if let Some(default) = default {
                    map.serialize_entry("default", default)?;
                }
                map.end()
            }
            AvroType::Fixed {
                name,
                size,
                logical,
            } => {
                let mut map = serializer.serialize_map(None)?;
                map.serialize_entry("type", "fixed")?;
                map.serialize_entry("name", name)?;
                map.serialize_entry("size", size)?;
                if let Some(logical) = logical {
                    logical.write_attributes(&mut map)?;
                }
                map.end()
            }
            AvroType::Logical { physical, logical } => {
                let mut map = serializer.serialize_map(None)?;
                map.serialize_entry("type", physical)?;
                logical.write_attributes(&mut map)?;
                map.end()
            }
        }
    }
}

/// One field of an Avro record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvroField {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,

    #[serde(rename = "type")]
    pub schema: AvroType,
}

impl AvroField {
    pub fn new(name: impl Into<String>, schema: AvroType) -> Self {
        Self {
            name: name.into(),
            doc: None,
            schema,
        }
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// The doc string, treating an empty string as absent.
    pub fn documentation(&self) -> Option<&str> {
        self.doc.as_deref().filter(|d| !d.is_empty())
    }
}

/// An Avro record type; also the shape of a top-level Avro schema.
#[derive(Debug, Clone, PartialEq)]
pub struct AvroRecord {
    pub name: String,
    pub namespace: Option<String>,
    pub doc: Option<String>,
    pub fields: Vec<AvroField>,
}

impl AvroRecord {
    pub fn new(name: impl Into<String>, fields: Vec<AvroField>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            doc: None,
            fields,
        }
    }

    /// Decode a top-level Avro schema from parsed JSON.
    ///
    /// Only `fields` is required at the top level; a missing `name` falls back
    /// to the default record name.
    pub fn from_value(value: &Value, max_depth: usize) -> Result<Self> {
        let raw: TopLevelRecord = from_value(value)?;
        let record = Self {
            name: raw.name.unwrap_or_else(|| DEFAULT_RECORD_NAME.to_string()),
            namespace: raw.namespace,
            doc: raw.doc,
            fields: raw.fields,
        };
        check_fields_depth(&record.fields, &child(ROOT, "fields"), 1, max_depth)?;
        Ok(record)
    }

    /// Deepest level of record nesting; a flat record has depth 1.
    pub fn nesting_depth(&self) -> usize {
        self.fields
            .iter()
            .map(|field| field.schema.nesting_depth())
            .max()
            .unwrap_or(0)
            + 1
    }
}

impl Serialize for AvroRecord {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut record = serializer.serialize_struct("record", 5)?;
        record.serialize_field("name", &self.name)?;
        record.serialize_field("type", "record")?;
        if let Some(namespace) = &self.namespace {
            record.serialize_field("namespace", namespace)?;
        } else {
            record.skip_field("namespace")?;
        }
        if let Some(doc) = &self.doc {
            record.serialize_field("doc", doc)?;
        } else {
            record.skip_field("doc")?;
        }
        record.serialize_field("fields", &self.fields)?;
        record.end()
    }
}

#[derive(Debug, Deserialize)]
struct TopLevelRecord {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    namespace: Option<String>,
    #[serde(default)]
    doc: Option<String>,
    fields: Vec<AvroField>,
}

/// Every key a complex Avro type object may carry; `kind` selects which apply.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AvroTypeObject {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    namespace: Option<String>,
    #[serde(default)]
    doc: Option<String>,
    #[serde(default)]
    fields: Option<Vec<AvroField>>,
    #[serde(default)]
    items: Option<Box<AvroType>>,
    #[serde(default)]
    values: Option<Box<AvroType>>,
    #[serde(default, deserialize_with = "null_as_default")]
    symbols: Vec<String>,
    #[serde(default)]
    size: Option<u64>,
    #[serde(default)]
    logical_type: Option<String>,
    #[serde(default)]
    precision: Option<u32>,
    #[serde(default)]
    scale: Option<u32>,
    #[serde(default)]
    default: Option<Value>,
}

impl<'de> Deserialize<'de> for AvroType {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(AvroTypeVisitor)
    }
}

struct AvroTypeVisitor;

impl<'de> Visitor<'de> for AvroTypeVisitor {
    type Value = AvroType;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a type name, a union array, or a type object")
    }

    fn visit_str<E: de::Error>(self, name: &str) -> std::result::Result<AvroType, E> {
        Ok(AvroType::from_name(name))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<AvroType, A::Error> {
        let mut members = Vec::new();
        while let Some(member) = seq.next_element()? {
            members.push(member);
        }
        Ok(AvroType::Union(members))
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> std::result::Result<AvroType, A::Error> {
        let obj = AvroTypeObject::deserialize(de::value::MapAccessDeserializer::new(map))?;
        AvroType::from_object(obj)
    }
}

impl AvroType {
    fn from_object<E: de::Error>(obj: AvroTypeObject) -> std::result::Result<Self, E> {
        let logical = obj
            .logical_type
            .as_deref()
            .map(|name| LogicalType::from_parts(name, obj.precision, obj.scale))
            .transpose()?;

        match obj.kind.as_str() {
            "record" | "error" => Ok(AvroType::Record(AvroRecord {
                name: obj.name.ok_or_else(|| E::missing_field("name"))?,
                namespace: obj.namespace,
                doc: obj.doc,
                fields: obj.fields.ok_or_else(|| E::missing_field("fields"))?,
            })),
            "array" => Ok(AvroType::Array {
                items: obj.items.ok_or_else(|| E::missing_field("items"))?,
                default: obj.default,
            }),
            "map" => Ok(AvroType::Map {
                values: obj.values.ok_or_else(|| E::missing_field("values"))?,
                default: obj.default,
            }),
            "enum" => Ok(AvroType::Enum {
                name: obj.name.ok_or_else(|| E::missing_field("name"))?,
                symbols: obj.symbols,
            }),
            "fixed" => Ok(AvroType::Fixed {
                name: obj.name.ok_or_else(|| E::missing_field("name"))?,
                size: obj.size.ok_or_else(|| E::missing_field("size"))?,
                logical,
            }),
            other => match (Primitive::from_name(other), logical) {
                (Some(physical), Some(logical)) => Ok(AvroType::Logical { physical, logical }),
                // {"type": "string"} is the same as "string"
                (Some(physical), None) => Ok(AvroType::Primitive(physical)),
                (None, _) => Ok(AvroType::Named(other.to_string())),
            },
        }
    }
}

impl LogicalType {
    fn from_parts<E: de::Error>(
        name: &str,
        precision: Option<u32>,
        scale: Option<u32>,
    ) -> std::result::Result<Self, E> {
        Ok(match name {
            "decimal" => LogicalType::Decimal {
                precision: precision.ok_or_else(|| E::missing_field("precision"))?,
                scale: scale.unwrap_or(0),
            },
            "date" => LogicalType::Date,
            "time-millis" => LogicalType::TimeMillis,
            "time-micros" => LogicalType::TimeMicros,
            "timestamp-millis" => LogicalType::TimestampMillis,
            "timestamp-micros" => LogicalType::TimestampMicros,
            "local-timestamp-millis" => LogicalType::LocalTimestampMillis,
            "local-timestamp-micros" => LogicalType::LocalTimestampMicros,
            other => LogicalType::Other(other.to_string()),
        })
    }
}

/// Record levels and type-expression levels both count toward the depth.
fn check_fields_depth(fields: &[AvroField], location: &str, depth: usize, max_depth: usize) -> Result<()> {
    check_depth(depth, max_depth, location)?;
    fields.iter().enumerate().try_for_each(|(idx, field)| {
        check_type_depth(&field.schema, &child(&index(location, idx), "type"), depth, max_depth)
    })
}

fn check_type_depth(ty: &AvroType, location: &str, depth: usize, max_depth: usize) -> Result<()> {
    check_depth(depth, max_depth, location)?;
    match ty {
        AvroType::Union(members) => members.iter().enumerate().try_for_each(|(idx, member)| {
            check_type_depth(member, &index(location, idx), depth + 1, max_depth)
        }),
        AvroType::Array { items, .. } => {
            check_type_depth(items, &child(location, "items"), depth + 1, max_depth)
        }
        AvroType::Map { values, .. } => {
            check_type_depth(values, &child(location, "values"), depth + 1, max_depth)
        }
        AvroType::Record(record) => {
            check_fields_depth(&record.fields, &child(location, "fields"), depth + 1, max_depth)
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConvertError;

    fn decode(value: Value) -> Result<AvroType> {
        from_value(&value)
    }

    #[test]
    fn test_decode_primitives_and_names() {
        assert_eq!(decode(json!("long")).unwrap(), AvroType::Primitive(Primitive::Long));
        assert_eq!(
            decode(json!({"type": "string"})).unwrap(),
            AvroType::Primitive(Primitive::String)
        );
        assert_eq!(
            decode(json!("com.acme.Address")).unwrap(),
            AvroType::Named("com.acme.Address".to_string())
        );
    }

    #[test]
    fn test_decode_union_and_containers() {
        assert_eq!(
            decode(json!(["null", "double"])).unwrap(),
            AvroType::nullable(AvroType::Primitive(Primitive::Double))
        );

        let array = decode(json!({"type": "array", "items": "string"})).unwrap();
        assert_eq!(
            array,
            AvroType::Array {
                items: Box::new(AvroType::Primitive(Primitive::String)),
                default: None,
            }
        );

        let map = decode(json!({"type": "map", "values": "long", "default": {}})).unwrap();
        assert_eq!(map, AvroType::map(AvroType::Primitive(Primitive::Long)));
    }

    #[test]
    fn test_decode_logical_types() {
        assert_eq!(
            decode(json!({"type": "bytes", "logicalType": "decimal", "precision": 10})).unwrap(),
            AvroType::decimal(10, 0)
        );
        assert_eq!(
            decode(json!({"type": "long", "logicalType": "timestamp-micros"})).unwrap(),
            AvroType::logical(Primitive::Long, LogicalType::TimestampMicros)
        );
        assert_eq!(
            decode(json!({"type": "string", "logicalType": "uuid"})).unwrap(),
            AvroType::logical(Primitive::String, LogicalType::Other("uuid".to_string()))
        );
        assert!(matches!(
            decode(json!({"type": "bytes", "logicalType": "decimal"})),
            Err(ConvertError::MissingField { field, .. }) if field == "precision"
        ));
    }

    #[test]
    fn test_decode_enum_and_fixed() {
        assert_eq!(
            decode(json!({"type": "enum", "name": "Suit", "symbols": ["HEARTS", "SPADES"]})).unwrap(),
            AvroType::Enum {
                name: "Suit".to_string(),
                symbols: vec!["HEARTS".to_string(), "SPADES".to_string()],
            }
        );
        assert_eq!(
            decode(json!({"type": "fixed", "name": "md5", "size": 16})).unwrap(),
            AvroType::Fixed {
                name: "md5".to_string(),
                size: 16,
                logical: None,
            }
        );
    }

    #[test]
    fn test_decode_errors_are_located() {
        match decode(json!({"type": "array"})).unwrap_err() {
            ConvertError::MissingField { location, field } => {
                assert_eq!(location, "$");
                assert_eq!(field, "items");
            }
            other => panic!("unexpected error: {:?}", other),
        }

        match decode(json!({"type": "record", "name": "r", "fields": [{"name": "a"}]})).unwrap_err() {
            ConvertError::MissingField { location, field } => {
                assert_eq!(location, "$.fields[0]");
                assert_eq!(field, "type");
            }
            other => panic!("unexpected error: {:?}", other),
        }

        assert!(matches!(
            decode(json!(42)),
            Err(ConvertError::InvalidField { .. })
        ));

        match decode(json!({"type": "fixed", "name": "f", "size": -1})).unwrap_err() {
            ConvertError::InvalidField { location, .. } => assert_eq!(location, "$.size"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_decode_depth_limit() {
        let mut value = json!("string");
        for _ in 0..10 {
            value = json!({"type": "array", "items": value});
        }
        let ty = decode(value).unwrap();
        assert!(check_type_depth(&ty, "$", 1, 11).is_ok());
        match check_type_depth(&ty, "$", 1, 10).unwrap_err() {
            ConvertError::DepthExceeded { location, max_depth } => {
                assert_eq!(max_depth, 10);
                assert_eq!(location, format!("${}", ".items".repeat(10)));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_record_from_value() {
        let value = json!({
            "type": "record",
            "namespace": "com.acme",
            "fields": [
                {"name": "id", "type": "long", "doc": "Primary key"},
                {"name": "owner", "type": {"type": "record", "name": "owner", "fields": [
                    {"name": "email", "type": "string"}
                ]}}
            ]
        });

        let record = AvroRecord::from_value(&value, 16).unwrap();
        assert_eq!(record.name, "schema");
        assert_eq!(record.namespace.as_deref(), Some("com.acme"));
        assert_eq!(record.fields[0].documentation(), Some("Primary key"));
        assert_eq!(record.nesting_depth(), 2);

        assert!(matches!(
            AvroRecord::from_value(&json!({"name": "x"}), 16),
            Err(ConvertError::MissingField { field, .. }) if field == "fields"
        ));
    }

    #[test]
    fn test_serialize_shapes() {
        let record = AvroRecord::new(
            "schema",
            vec![
                AvroField::new("price", AvroType::decimal(38, 9)).with_doc("Unit price"),
                AvroField::new("tags", AvroType::array(AvroType::Primitive(Primitive::String))),
                AvroField::new("attrs", AvroType::map(AvroType::Primitive(Primitive::Long))),
                AvroField::new("note", AvroType::nullable(AvroType::Unmapped)),
            ],
        );

        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({
                "name": "schema",
                "type": "record",
                "fields": [
                    {"name": "price", "doc": "Unit price",
                     "type": {"type": "bytes", "logicalType": "decimal", "precision": 38, "scale": 9}},
                    {"name": "tags", "type": {"type": "array", "items": "string", "default": []}},
                    {"name": "attrs", "type": {"type": "map", "values": "long", "default": {}}},
                    {"name": "note", "type": ["null", ""]}
                ]
            })
        );
    }
}
