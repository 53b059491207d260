//! CLI module for schemashift
//!
//! - `convert`: convert a schema between BigQuery and Avro
//! - `check`: decode a schema without converting it

pub mod check;
pub mod convert;
pub mod error;
pub mod input;
