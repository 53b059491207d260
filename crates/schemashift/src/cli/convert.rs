//! Convert command - translate a schema between BigQuery and Avro

use anyhow::{Context, Result};
use clap::Args;
use schemashift_schema::defaults::{DEFAULT_MAX_DEPTH, DEFAULT_RECORD_NAME};
use schemashift_schema::{convert_with, ConvertOptions, SchemaFormat, UnsupportedTypePolicy};
use std::path::PathBuf;
use tracing::info;

use crate::cli::error::HelpfulError;
use crate::cli::input::{read_input, write_output};

/// Arguments for the convert command
#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// Format of the input schema (bigquery, avro)
    #[arg(long)]
    pub from: SchemaFormat,

    /// Format to produce; defaults to the counterpart of --from
    #[arg(long)]
    pub to: Option<SchemaFormat>,

    /// Schema file to read ('-' or omitted reads stdin)
    pub input: Option<PathBuf>,

    /// Write the converted schema to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Name of the top-level Avro record
    #[arg(long, env = "SCHEMASHIFT_RECORD_NAME", default_value = DEFAULT_RECORD_NAME)]
    pub record_name: String,

    /// Namespace of the top-level Avro record
    #[arg(long, env = "SCHEMASHIFT_NAMESPACE")]
    pub namespace: Option<String>,

    /// Deepest nesting accepted in the input schema
    #[arg(long, env = "SCHEMASHIFT_MAX_DEPTH", default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Emit an empty type for fields with no equivalent instead of failing
    #[arg(long)]
    pub allow_unmapped: bool,

    /// Print compact JSON on a single line
    #[arg(long)]
    pub compact: bool,
}

impl ConvertArgs {
    fn options(&self) -> ConvertOptions {
        let policy = if self.allow_unmapped {
            UnsupportedTypePolicy::Placeholder
        } else {
            UnsupportedTypePolicy::Reject
        };
        ConvertOptions::new()
            .with_record_name(self.record_name.clone())
            .with_namespace(self.namespace.clone())
            .with_max_depth(self.max_depth)
            .with_unsupported(policy)
    }

    fn origin(&self) -> String {
        match &self.input {
            Some(path) if path.as_os_str() != "-" => path.display().to_string(),
            _ => "stdin".to_string(),
        }
    }
}

/// Execute the convert command
pub fn run(args: ConvertArgs) -> Result<()> {
    let destination = args.to.unwrap_or_else(|| args.from.counterpart());
    let raw = read_input(args.input.as_deref())?;
    let options = args.options();

    let schema = convert_with(&raw, args.from, destination, &options)
        .map_err(|err| HelpfulError::conversion_failed(&err, args.from, &args.origin()))?;

    info!(
        from = %args.from,
        to = %destination,
        fields = schema.field_count(),
        "Converted schema"
    );

    let text = if args.compact {
        serde_json::to_string(&schema)
    } else {
        schema.to_json_pretty()
    }
    .context("Failed to serialize converted schema")?;

    write_output(args.output.as_ref(), &text)
}
