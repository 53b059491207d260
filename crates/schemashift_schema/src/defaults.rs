//! Canonical default values shared by the converters and the CLI.

/// Name given to the top-level Avro record when none is configured.
pub const DEFAULT_RECORD_NAME: &str = "schema";

/// Maximum nesting of field lists and type constructors accepted while decoding.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Fixed decimal parameters emitted for BigQuery NUMERIC.
pub const NUMERIC_PRECISION: u32 = 38;
pub const NUMERIC_SCALE: u32 = 9;

/// Fixed decimal parameters emitted for BigQuery BIGNUMERIC.
pub const BIGNUMERIC_PRECISION: u32 = 76;
pub const BIGNUMERIC_SCALE: u32 = 38;
