//! Schema format selectors.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two schema formats this crate converts between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaFormat {
    /// BigQuery JSON table schema: a bare array of column definitions.
    BigQuery,
    /// Apache Avro schema: a named record.
    Avro,
}

impl SchemaFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaFormat::BigQuery => "bigquery",
            SchemaFormat::Avro => "avro",
        }
    }

    /// The format a schema of this format converts into.
    pub fn counterpart(&self) -> SchemaFormat {
        match self {
            SchemaFormat::BigQuery => SchemaFormat::Avro,
            SchemaFormat::Avro => SchemaFormat::BigQuery,
        }
    }
}

impl fmt::Display for SchemaFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SchemaFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bigquery" | "bq" | "tabular" => Ok(SchemaFormat::BigQuery),
            "avro" | "record" => Ok(SchemaFormat::Avro),
            _ => Err(format!(
                "Invalid schema format: '{}'. Expected: bigquery or avro",
                s
            )),
        }
    }
}
