//! BigQuery JSON table schema model.
//!
//! A BigQuery schema is a bare JSON array of column definitions:
//!
//! ```text
//! [{"name": "id", "type": "INTEGER", "mode": "REQUIRED", "description": "...", "fields": [...]}]
//! ```

use crate::decode::{check_depth, child, from_value, index, null_as_default, ROOT};
use crate::error::Result;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A BigQuery column type tag.
///
/// Standard SQL aliases (`INT64`, `FLOAT64`, `BOOL`, `STRUCT`, `DECIMAL`,
/// `BIGDECIMAL`) decode into their canonical variant. Output always uses the
/// canonical legacy names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    String,
    Bytes,
    Integer,
    Float,
    Numeric,
    BigNumeric,
    Boolean,
    Timestamp,
    Date,
    Time,
    DateTime,
    Geography,
    Json,
    Range,
    /// Nested record (`RECORD` / `STRUCT`)
    Record,
    /// A tag this crate does not know. The empty tag doubles as the
    /// placeholder emitted for unmapped types.
    Unsupported(String),
}

impl FieldType {
    pub fn as_str(&self) -> &str {
        match self {
            FieldType::String => "STRING",
            FieldType::Bytes => "BYTES",
            FieldType::Integer => "INTEGER",
            FieldType::Float => "FLOAT",
            FieldType::Numeric => "NUMERIC",
            FieldType::BigNumeric => "BIGNUMERIC",
            FieldType::Boolean => "BOOLEAN",
            FieldType::Timestamp => "TIMESTAMP",
            FieldType::Date => "DATE",
            FieldType::Time => "TIME",
            FieldType::DateTime => "DATETIME",
            FieldType::Geography => "GEOGRAPHY",
            FieldType::Json => "JSON",
            FieldType::Range => "RANGE",
            FieldType::Record => "RECORD",
            FieldType::Unsupported(tag) => tag,
        }
    }

    /// Decode a type tag. Never fails: unknown tags become [`FieldType::Unsupported`].
    pub fn from_tag(tag: &str) -> Self {
        match tag.to_uppercase().as_str() {
            "STRING" => FieldType::String,
            "BYTES" => FieldType::Bytes,
            "INTEGER" | "INT64" => FieldType::Integer,
            "FLOAT" | "FLOAT64" => FieldType::Float,
            "NUMERIC" | "DECIMAL" => FieldType::Numeric,
            "BIGNUMERIC" | "BIGDECIMAL" => FieldType::BigNumeric,
            "BOOLEAN" | "BOOL" => FieldType::Boolean,
            "TIMESTAMP" => FieldType::Timestamp,
            "DATE" => FieldType::Date,
            "TIME" => FieldType::Time,
            "DATETIME" => FieldType::DateTime,
            "GEOGRAPHY" => FieldType::Geography,
            "JSON" => FieldType::Json,
            "RANGE" => FieldType::Range,
            "RECORD" | "STRUCT" => FieldType::Record,
            _ => FieldType::Unsupported(tag.to_string()),
        }
    }

    /// The empty-string placeholder used for types with no BigQuery equivalent.
    pub fn unmapped() -> Self {
        FieldType::Unsupported(String::new())
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for FieldType {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FieldType {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let tag = String::deserialize(deserializer)?;
        Ok(FieldType::from_tag(&tag))
    }
}

/// Column cardinality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mode {
    /// Exactly one value (also the meaning of an absent mode)
    #[default]
    Required,
    /// Zero or one value
    Nullable,
    /// Zero or more values
    Repeated,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Required => "REQUIRED",
            Mode::Nullable => "NULLABLE",
            Mode::Repeated => "REPEATED",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl<'de> Deserialize<'de> for Mode {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Mode::from_str(&raw).map_err(de::Error::custom)
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "REQUIRED" => Ok(Mode::Required),
            "NULLABLE" => Ok(Mode::Nullable),
            "REPEATED" => Ok(Mode::Repeated),
            _ => Err(format!(
                "Invalid mode: '{}'. Expected: REQUIRED, NULLABLE, or REPEATED",
                s
            )),
        }
    }
}

/// One BigQuery column definition.
///
/// Keys BigQuery adds that carry no type information (`policyTags`,
/// `maxLength`, ...) are ignored on input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BigQueryField {
    pub name: String,

    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// An absent or null mode means REQUIRED
    #[serde(default, deserialize_with = "null_as_default")]
    pub mode: Mode,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Child columns, only for `RECORD` fields
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub fields: Vec<BigQueryField>,
}

impl BigQueryField {
    /// Create a new REQUIRED field
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            mode: Mode::Required,
            description: None,
            fields: Vec::new(),
        }
    }

    /// Create a new NULLABLE field
    pub fn nullable(name: impl Into<String>, field_type: FieldType) -> Self {
        Self::new(name, field_type).with_mode(Mode::Nullable)
    }

    /// Create a new REPEATED field
    pub fn repeated(name: impl Into<String>, field_type: FieldType) -> Self {
        Self::new(name, field_type).with_mode(Mode::Repeated)
    }

    /// Create a REQUIRED record with the given children
    pub fn record(name: impl Into<String>, fields: Vec<BigQueryField>) -> Self {
        Self::new(name, FieldType::Record).with_fields(fields)
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_fields(mut self, fields: Vec<BigQueryField>) -> Self {
        self.fields = fields;
        self
    }

    /// The description, treating an empty string as absent.
    pub fn documentation(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.is_empty())
    }

    fn nesting_depth(&self) -> usize {
        self.fields.iter().map(BigQueryField::nesting_depth).max().unwrap_or(0) + 1
    }
}

/// A BigQuery table schema: the ordered column list itself.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BigQuerySchema {
    pub fields: Vec<BigQueryField>,
}

impl BigQuerySchema {
    pub fn new(fields: Vec<BigQueryField>) -> Self {
        Self { fields }
    }

    /// Decode a schema from parsed JSON, rejecting nesting deeper than `max_depth`.
    pub fn from_value(value: &serde_json::Value, max_depth: usize) -> Result<Self> {
        let schema: BigQuerySchema = from_value(value)?;
        check_fields_depth(&schema.fields, ROOT, 1, max_depth)?;
        Ok(schema)
    }

    /// Deepest level of record nesting; a flat schema has depth 1.
    pub fn nesting_depth(&self) -> usize {
        self.fields.iter().map(BigQueryField::nesting_depth).max().unwrap_or(0)
    }
}

fn check_fields_depth(
    fields: &[BigQueryField],
    location: &str,
    depth: usize,
    max_depth: usize,
) -> Result<()> {
    check_depth(depth, max_depth, location)?;
    fields
        .iter()
        .enumerate()
        .filter(|(_, field)| !field.fields.is_empty())
        .try_for_each(|(idx, field)| {
            check_fields_depth(
                &field.fields,
                &child(&index(location, idx), "fields"),
                depth + 1,
                max_depth,
            )
        })
}
