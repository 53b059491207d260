//! Reading schema text and writing results.

use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use crate::cli::error::HelpfulError;

/// Read schema text from `path`, or from stdin when `path` is absent or `-`.
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => {
            if !path.exists() {
                return Err(HelpfulError::file_not_found(path).into());
            }
            fs::read_to_string(path).map_err(|e| HelpfulError::cannot_read_file(path, &e.to_string()).into())
        }
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read schema from stdin")?;
            Ok(buf)
        }
    }
}

/// Write `text` to `path`, or to stdout when `path` is absent.
pub fn write_output(path: Option<&PathBuf>, text: &str) -> Result<()> {
    match path {
        Some(path) => fs::write(path, format!("{}\n", text))
            .with_context(|| format!("Failed to write output: {}", path.display())),
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", text).context("Failed to write to stdout")?;
            stdout.flush().context("Failed to flush stdout")
        }
    }
}
