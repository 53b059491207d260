//! Check command - decode a schema without converting it

use anyhow::Result;
use clap::Args;
use schemashift_schema::defaults::DEFAULT_MAX_DEPTH;
use schemashift_schema::{parse_schema, ConvertOptions, SchemaFormat};
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::error::HelpfulError;
use crate::cli::input::read_input;

/// Arguments for the check command
#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Format of the schema (bigquery, avro)
    #[arg(long)]
    pub format: SchemaFormat,

    /// Schema file to read ('-' or omitted reads stdin)
    pub input: Option<PathBuf>,

    /// Deepest nesting accepted in the schema
    #[arg(long, env = "SCHEMASHIFT_MAX_DEPTH", default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Summary of a decoded schema
#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub format: SchemaFormat,
    pub fields: usize,
    pub depth: usize,
}

/// Execute the check command
pub fn run(args: CheckArgs) -> Result<()> {
    let raw = read_input(args.input.as_deref())?;
    let options = ConvertOptions::new().with_max_depth(args.max_depth);
    let origin = match &args.input {
        Some(path) if path.as_os_str() != "-" => path.display().to_string(),
        _ => "stdin".to_string(),
    };

    let schema = parse_schema(&raw, args.format, &options)
        .map_err(|err| HelpfulError::conversion_failed(&err, args.format, &origin))?;

    let report = CheckReport {
        format: schema.format(),
        fields: schema.field_count(),
        depth: schema.nesting_depth(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "OK: {} schema with {} top-level field(s), nesting depth {}",
            report.format, report.fields, report.depth
        );
    }
    Ok(())
}
