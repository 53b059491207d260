//! Helpful error types for CLI commands
//!
//! Every error includes:
//! - What went wrong
//! - Context about the situation
//! - Suggestions for how to fix it

use schemashift_schema::{ConvertError, SchemaFormat, ShapeError};
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// An error with helpful context and suggestions
#[derive(Debug, Serialize)]
pub struct HelpfulError {
    /// The main error message
    pub message: String,
    /// Additional context about what was happening
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Suggestions for how to fix the error
    pub suggestions: Vec<String>,
}

impl HelpfulError {
    /// Create a new helpful error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
        }
    }

    /// Add context to the error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Add a suggestion for fixing the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Add multiple suggestions
    pub fn with_suggestions(mut self, suggestions: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.suggestions.extend(suggestions.into_iter().map(|s| s.into()));
        self
    }

    // === Common error constructors ===

    /// File does not exist
    pub fn file_not_found(path: &Path) -> Self {
        Self::new(format!("File not found: {}", path.display()))
            .with_context("The specified schema file does not exist")
            .with_suggestions([
                format!("TRY: Check if the file exists: ls -la {}", path.display()),
                "TRY: Pass '-' to read the schema from stdin".to_string(),
            ])
    }

    /// File cannot be read (permission or encoding error)
    pub fn cannot_read_file(path: &Path, reason: &str) -> Self {
        Self::new(format!("Cannot read file: {}", path.display()))
            .with_context(reason.to_string())
            .with_suggestions([
                format!("TRY: Check file permissions: ls -la {}", path.display()),
                "TRY: Ensure the file is UTF-8 encoded JSON".to_string(),
            ])
    }

    /// The schema could not be decoded or converted
    pub fn conversion_failed(err: &ConvertError, source: SchemaFormat, origin: &str) -> Self {
        let base = Self::new(err.to_string()).with_context(format!(
            "Failed to read {} as a {} schema",
            origin, source
        ));

        match err {
            ConvertError::Parse(_) => base.with_suggestions([
                format!("TRY: Validate the JSON: python -m json.tool {}", origin),
                "TRY: Check for trailing commas and unquoted keys".to_string(),
            ]),
            ConvertError::InvalidShape(ShapeError::NotAnArray) => base.with_suggestions([
                "TRY: A BigQuery schema is a bare array: [{\"name\": ..., \"type\": ...}]".to_string(),
                "TRY: If this is an Avro schema, use --from avro".to_string(),
            ]),
            ConvertError::InvalidShape(ShapeError::UnexpectedArray) => base.with_suggestions([
                "TRY: An Avro schema is a record object: {\"type\": \"record\", \"fields\": [...]}".to_string(),
                "TRY: If this is a BigQuery schema, use --from bigquery".to_string(),
            ]),
            ConvertError::InvalidShape(ShapeError::NotAnObject) => {
                base.with_suggestion("TRY: The schema must be a JSON array or object")
            }
            ConvertError::MissingField { field, .. } => base.with_suggestion(format!(
                "TRY: Add the '{}' key at the reported location",
                field
            )),
            ConvertError::InvalidField { .. } => {
                base.with_suggestion("TRY: Fix the value at the reported location")
            }
            ConvertError::DepthExceeded { max_depth, .. } => base.with_suggestions([
                format!("TRY: Raise the limit: --max-depth {}", max_depth * 2),
                "TRY: Check the schema for accidental self-nesting".to_string(),
            ]),
            ConvertError::UnsupportedType { target, .. } => base.with_suggestions([
                format!("TRY: Change the field to a type that {} supports", target),
                "TRY: Use --allow-unmapped to emit an empty type instead".to_string(),
            ]),
            ConvertError::UnsupportedDirection { .. } => {
                base.with_suggestion("TRY: Convert between bigquery and avro: --from bigquery --to avro")
            }
        }
    }
}

impl fmt::Display for HelpfulError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ERROR: {}", self.message)?;

        if let Some(ctx) = &self.context {
            writeln!(f, "CONTEXT: {}", ctx)?;
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            for suggestion in &self.suggestions {
                writeln!(f, "  {}", suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for HelpfulError {}

/// Print an error as `{"error": {...}}` on stdout for `--json` consumers.
pub fn print_json_error(err: &anyhow::Error) {
    let payload = match err.downcast_ref::<HelpfulError>() {
        Some(helpful) => serde_json::json!({ "error": helpful }),
        None => serde_json::json!({
            "error": {
                "message": format!("{:#}", err),
                "suggestions": [],
            }
        }),
    };
    println!("{}", payload);
}
