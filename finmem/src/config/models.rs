//! Configuration model definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Main configuration structure for finmem.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FinmemConfig {
    /// Extraction configuration
    pub extraction: ExtractionConfig,

    /// Relevance scoring configuration
    pub relevance: RelevanceConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Configuration for the extraction pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Minimum confidence a parsed entry must reach to be kept. The
    /// extractors already drop candidates under 0.5; raising this tightens
    /// the pipeline further, lowering it has no effect.
    pub min_confidence: f32,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.5,
        }
    }
}

/// Configuration for relevance-based memory selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelevanceConfig {
    /// How many memories the context builder injects per turn
    pub context_limit: usize,
}

impl Default for RelevanceConfig {
    fn default() -> Self {
        Self { context_limit: 5 }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level
    pub level: LogLevel,

    /// Log format
    pub format: LogFormat,

    /// File to log to (if any)
    pub file: Option<PathBuf>,

    /// Whether to log to stdout
    pub stdout: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Compact,
            file: None,
            stdout: true,
        }
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level
    Trace,

    /// Debug level
    Debug,

    /// Info level
    Info,

    /// Warn level
    Warn,

    /// Error level
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(format!("Invalid log level: {}", s)),
        }
    }
}

/// Log format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Single-line human-readable format
    Compact,

    /// Multi-line human-readable format
    Pretty,

    /// JSON format
    Json,
}

impl Default for LogFormat {
    fn default() -> Self {
        Self::Compact
    }
}
