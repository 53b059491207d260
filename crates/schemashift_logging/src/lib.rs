//! Shared logging utilities for schemashift binaries.
//!
//! Console output always goes to stderr so that converted schemas written to
//! stdout stay machine-readable. A size-rotated log file can be added on top.

use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub const DEFAULT_LOG_FILTER: &str = "schemashift=warn,schemashift_schema=warn";
const VERBOSE_LOG_FILTER: &str = "schemashift=debug,schemashift_schema=debug";
const MAX_LOG_FILES: usize = 5;
const MAX_LOG_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Logging configuration shared by schemashift binaries.
pub struct LogConfig<'a> {
    pub app_name: &'a str,
    /// Lower the default filter to debug (RUST_LOG still wins)
    pub verbose: bool,
    /// Also write logs to a rotating file in [`logs_dir`]
    pub log_to_file: bool,
}

/// Initialize tracing with stderr output and an optional rolling file writer.
///
/// If the log file cannot be opened, the stderr subscriber is still installed
/// and the file error is returned afterwards.
pub fn init_logging(config: LogConfig<'_>) -> Result<()> {
    let default_filter = if config.verbose {
        VERBOSE_LOG_FILTER
    } else {
        DEFAULT_LOG_FILTER
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let (file_writer, file_error) = if config.log_to_file {
        match open_log_file(config.app_name) {
            Ok(writer) => (Some(writer), None),
            Err(err) => (None, Some(err)),
        }
    } else {
        (None, None)
    };
    let file_layer = file_writer.map(|writer| {
        tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_filter(filter.clone())
    });

    tracing_subscriber::registry()
        .with(file_layer)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(filter),
        )
        .try_init()
        .context("Failed to install tracing subscriber")?;

    match file_error {
        Some(err) => Err(err.context("File logging disabled, logging to stderr only")),
        None => Ok(()),
    }
}

fn open_log_file(app_name: &str) -> Result<SharedRollingWriter> {
    let log_dir = ensure_logs_dir().context("Failed to ensure log directory")?;
    SharedRollingWriter::new(log_dir, app_name).context("Failed to initialize rolling log writer")
}

/// The schemashift home directory: ~/.schemashift (or $SCHEMASHIFT_HOME)
pub fn schemashift_home() -> Result<PathBuf> {
    if let Ok(override_path) = std::env::var("SCHEMASHIFT_HOME") {
        return Ok(PathBuf::from(override_path));
    }
    dirs::home_dir()
        .map(|home| home.join(".schemashift"))
        .context("Could not determine home directory; set SCHEMASHIFT_HOME")
}

/// The logs directory: ~/.schemashift/logs
pub fn logs_dir() -> Result<PathBuf> {
    Ok(schemashift_home()?.join("logs"))
}

/// Ensure the logs directory exists.
pub fn ensure_logs_dir() -> Result<PathBuf> {
    let logs = logs_dir()?;
    fs::create_dir_all(&logs)
        .with_context(|| format!("Failed to create logs directory: {}", logs.display()))?;
    Ok(logs)
}

struct RollingFileAppender {
    dir: PathBuf,
    base_name: String,
    max_files: usize,
    max_size: u64,
    file: Option<File>,
    current_size: u64,
}

impl RollingFileAppender {
    fn new(dir: PathBuf, base_name: &str, max_files: usize, max_size: u64) -> io::Result<Self> {
        fs::create_dir_all(&dir)?;
        let mut appender = Self {
            dir,
            base_name: sanitize_name(base_name),
            max_files: max_files.max(1),
            max_size,
            file: None,
            current_size: 0,
        };
        let (file, size) = appender.open_current_file()?;
        appender.file = Some(file);
        appender.current_size = size;
        if appender.current_size > appender.max_size {
            appender.rotate()?;
        }
        Ok(appender)
    }

    fn open_current_file(&self) -> io::Result<(File, u64)> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.current_path())?;
        let size = file.metadata()?.len();
        Ok((file, size))
    }

    fn current_path(&self) -> PathBuf {
        self.dir.join(format!("{}.log", self.base_name))
    }

    fn rotated_path(&self, index: usize) -> PathBuf {
        self.dir.join(format!("{}.log.{}", self.base_name, index))
    }

    fn rotate(&mut self) -> io::Result<()> {
        if let Some(mut file) = self.file.take() {
            let _ = file.flush();
        }

        self.shift_rotated_files()?;

        let (file, size) = self.open_current_file()?;
        self.file = Some(file);
        self.current_size = size;
        Ok(())
    }

    /// name.log -> name.log.1 -> ... -> name.log.{max_files - 1}, dropping the oldest.
    fn shift_rotated_files(&self) -> io::Result<()> {
        let max_index = self.max_files.saturating_sub(1);
        if max_index == 0 {
            // Single file: truncate in place
            return File::create(self.current_path()).map(|_| ());
        }

        let oldest = self.rotated_path(max_index);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }

        for idx in (1..max_index).rev() {
            let src = self.rotated_path(idx);
            if src.exists() {
                fs::rename(&src, self.rotated_path(idx + 1))?;
            }
        }

        let current = self.current_path();
        if current.exists() {
            fs::rename(current, self.rotated_path(1))?;
        }

        Ok(())
    }
}

impl Write for RollingFileAppender {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.current_size + buf.len() as u64 > self.max_size {
            self.rotate()?;
        }

        let file = self
            .file
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "log file unavailable"))?;
        let bytes = file.write(buf)?;
        self.current_size += bytes as u64;
        Ok(bytes)
    }

    fn flush(&mut self) -> io::Result<()> {
        if let Some(file) = self.file.as_mut() {
            file.flush()?;
        }
        Ok(())
    }
}

#[derive(Clone)]
struct SharedRollingWriter {
    inner: Arc<Mutex<RollingFileAppender>>,
}

impl SharedRollingWriter {
    fn new(dir: PathBuf, base_name: &str) -> Result<Self> {
        let appender = RollingFileAppender::new(dir, base_name, MAX_LOG_FILES, MAX_LOG_FILE_SIZE)
            .with_context(|| format!("Failed to open log file for {}", base_name))?;
        Ok(Self {
            inner: Arc::new(Mutex::new(appender)),
        })
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for SharedRollingWriter {
    type Writer = SharedRollingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

impl Write for SharedRollingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log writer lock poisoned"))?
            .write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log writer lock poisoned"))?
            .flush()
    }
}

fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|ch| if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' { ch } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_stderr_logging_survives_file_failure() {
        let dir = TempDir::new().unwrap();
        let not_a_dir = dir.path().join("home");
        fs::write(&not_a_dir, "occupied").unwrap();
        std::env::set_var("SCHEMASHIFT_HOME", &not_a_dir);

        let err = init_logging(LogConfig {
            app_name: "schemashift-test",
            verbose: false,
            log_to_file: true,
        })
        .unwrap_err();
        assert!(format!("{:#}", err).contains("File logging disabled"));

        // The stderr subscriber is already the global default
        assert!(tracing_subscriber::registry().try_init().is_err());
    }

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("schemashift"), "schemashift");
        assert_eq!(sanitize_name("my app/v1"), "my_app_v1");
    }

    #[test]
    fn test_rotation_keeps_bounded_files() {
        let dir = TempDir::new().unwrap();
        let mut appender = RollingFileAppender::new(dir.path().to_path_buf(), "test", 3, 16).unwrap();

        for _ in 0..10 {
            appender.write_all(b"0123456789abcdef").unwrap();
        }
        appender.flush().unwrap();

        assert!(dir.path().join("test.log").exists());
        assert!(dir.path().join("test.log.1").exists());
        assert!(dir.path().join("test.log.2").exists());
        assert!(!dir.path().join("test.log.3").exists());
    }

    #[test]
    fn test_single_file_truncates() {
        let dir = TempDir::new().unwrap();
        let mut appender = RollingFileAppender::new(dir.path().to_path_buf(), "solo", 1, 8).unwrap();

        appender.write_all(b"12345678").unwrap();
        appender.write_all(b"abcd").unwrap();
        appender.flush().unwrap();

        let contents = fs::read_to_string(dir.path().join("solo.log")).unwrap();
        assert_eq!(contents, "abcd");
        assert!(!dir.path().join("solo.log.1").exists());
    }
}
