//! Structured logging built on the tracing crate.
//!
//! Supports compact, pretty, and JSON output, to stdout or a non-blocking
//! file writer.

use crate::config::{LogFormat, LogLevel, LoggingConfig};
use std::path::Path;
use tracing::Level;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};

/// Error type for logging operations
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing log level
    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),

    /// Error in subscriber setup
    #[error("Subscriber error: {0}")]
    Subscriber(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Result type for logging operations
pub type Result<T> = std::result::Result<T, LogError>;

/// Initialize the logging system with the given configuration.
///
/// Returns the appender worker guard when logging to a file; the caller
/// must hold it for the program's lifetime or buffered log lines are lost.
/// Calling this twice is a no-op, not an error.
pub fn init(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let level = match config.level {
        LogLevel::Trace => Level::TRACE,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Info => Level::INFO,
        LogLevel::Warn => Level::WARN,
        LogLevel::Error => Level::ERROR,
    };

    let result = match config.format {
        LogFormat::Json => init_json_logging(level, config),
        LogFormat::Compact => init_compact_logging(level, config),
        LogFormat::Pretty => init_pretty_logging(level, config),
    };

    // A second init in the same process keeps the first subscriber.
    if let Err(LogError::Subscriber(ref e)) = result {
        let message = e.to_string();
        if message.contains("SetGlobalDefaultError") || message.contains("already been set") {
            return Ok(None);
        }
    }

    result
}

/// Initialize logging with JSON formatting
fn init_json_logging(level: Level, config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let subscriber = tracing_subscriber::fmt()
        .json()
        .with_max_level(level)
        .with_level(true)
        .with_target(true)
        .with_line_number(true)
        .with_thread_ids(true);

    if let Some(file_path) = &config.file {
        if config.stdout {
            subscriber.with_writer(std::io::stdout).try_init()?;
            tracing::warn!("Configured for stdout only; file logging ignored");
            Ok(None)
        } else {
            let (writer, guard) = create_non_blocking_file(file_path)?;
            subscriber.with_writer(writer).try_init()?;
            Ok(Some(guard))
        }
    } else {
        if config.stdout {
            subscriber.try_init()?;
        }
        Ok(None)
    }
}

/// Initialize logging with compact formatting
fn init_compact_logging(level: Level, config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_max_level(level)
        .with_level(true)
        .with_target(true)
        .with_line_number(true)
        .with_thread_ids(true);

    if let Some(file_path) = &config.file {
        if config.stdout {
            subscriber.with_writer(std::io::stdout).try_init()?;
            tracing::warn!("Configured for stdout only; file logging ignored");
            Ok(None)
        } else {
            let (writer, guard) = create_non_blocking_file(file_path)?;
            subscriber.with_writer(writer).try_init()?;
            Ok(Some(guard))
        }
    } else {
        if config.stdout {
            subscriber.try_init()?;
        }
        Ok(None)
    }
}

/// Initialize logging with pretty formatting
fn init_pretty_logging(level: Level, config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let subscriber = tracing_subscriber::fmt()
        .pretty()
        .with_max_level(level)
        .with_level(true)
        .with_target(true)
        .with_line_number(true)
        .with_thread_ids(true);

    if let Some(file_path) = &config.file {
        if config.stdout {
            subscriber.with_writer(std::io::stdout).try_init()?;
            tracing::warn!("Configured for stdout only; file logging ignored");
            Ok(None)
        } else {
            let (writer, guard) = create_non_blocking_file(file_path)?;
            subscriber.with_writer(writer).try_init()?;
            Ok(Some(guard))
        }
    } else {
        if config.stdout {
            subscriber.try_init()?;
        }
        Ok(None)
    }
}

/// Create a non-blocking file writer.
fn create_non_blocking_file(path: impl AsRef<Path>) -> Result<(NonBlocking, WorkerGuard)> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file_appender = tracing_appender::rolling::never(
        path.parent().unwrap_or_else(|| Path::new(".")),
        path.file_name().unwrap_or_default(),
    );

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    Ok((non_blocking, guard))
}

/// Parse a log level string into a LogLevel enum.
pub fn parse_log_level(level: &str) -> Result<LogLevel> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(LogLevel::Trace),
        "debug" => Ok(LogLevel::Debug),
        "info" => Ok(LogLevel::Info),
        "warn" => Ok(LogLevel::Warn),
        "error" => Ok(LogLevel::Error),
        _ => Err(LogError::InvalidLogLevel(level.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log_level() {
        assert_eq!(parse_log_level("DEBUG").unwrap(), LogLevel::Debug);
        assert_eq!(parse_log_level("warn").unwrap(), LogLevel::Warn);
        assert!(parse_log_level("verbose").is_err());
    }

    #[test]
    fn test_double_init_is_ok() {
        let config = LoggingConfig {
            level: LogLevel::Warn,
            ..Default::default()
        };
        assert!(init(&config).is_ok());
        assert!(init(&config).is_ok());
    }
}
