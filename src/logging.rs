//! Logging setup.
//!
//! `RUST_LOG` wins when it is set and parses. Otherwise the configured
//! `LOG_LEVEL` is the only directive.

use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::{RelayError, Result};

/// Build the filter from an optional `RUST_LOG` value and the fallback level.
fn filter_from(rust_log: Option<&str>, level: &str) -> EnvFilter {
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(level.to_ascii_lowercase()))
}

fn env_filter(level: &str) -> EnvFilter {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    filter_from(rust_log.as_deref(), level)
}

/// Open `path` for appending, creating missing parent directories.
fn open_log_file(path: &str) -> Result<File> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(File::options().create(true).append(true).open(path)?)
}

/// Install the global subscriber.
///
/// Events go to stdout, and are also appended to `config.file` when set.
/// ANSI colours are only used when logging to the console alone.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let (writer, ansi) = match config.file.as_deref() {
        Some(path) => {
            let file = Arc::new(open_log_file(path)?);
            (BoxMakeWriter::new(std::io::stdout.and(file)), false)
        }
        None => (BoxMakeWriter::new(std::io::stdout), true),
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(&config.level))
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(true)
        .try_init()
        .map_err(|e| RelayError::Config(format!("cannot install logger: {e}")))
}

/// Console-only logging, used when the configured file cannot be opened.
pub fn init_console_only(level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .with_target(true)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rust_log_takes_precedence() {
        let filter = filter_from(Some("debug"), "info");
        assert_eq!(filter.to_string(), "debug");
    }

    #[test]
    fn test_level_used_without_rust_log() {
        assert_eq!(filter_from(None, "warn").to_string(), "warn");
        assert_eq!(filter_from(Some("  "), "ERROR").to_string(), "error");
    }

    #[test]
    fn test_open_log_file_creates_parent() {
        let dir = std::env::temp_dir().join(format!("contact-relay-log-{}", std::process::id()));
        let path = dir.join("nested").join("relay.log");

        open_log_file(path.to_str().unwrap()).unwrap();
        assert!(path.exists());

        fs::remove_dir_all(&dir).unwrap();
    }
}
