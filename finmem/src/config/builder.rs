//! Configuration builder.
//!
//! Builder pattern API for creating configurations in code.

use super::{models::*, validation, Result};
use std::path::Path;

/// Builder for creating FinmemConfig instances.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: FinmemConfig,
}

impl ConfigBuilder {
    /// Create a new configuration builder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum confidence kept entries must reach.
    pub fn with_min_confidence(mut self, min_confidence: f32) -> Self {
        self.config.extraction.min_confidence = min_confidence;
        self
    }

    /// Set how many memories the context builder injects per turn.
    pub fn with_context_limit(mut self, limit: usize) -> Self {
        self.config.relevance.context_limit = limit;
        self
    }

    /// Set the log level.
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.config.logging.level = level;
        self
    }

    /// Set the log format.
    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.config.logging.format = format;
        self
    }

    /// Configure logging to a file.
    pub fn with_log_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.logging.file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Create a configuration for development: debug logging, defaults
    /// everywhere else.
    pub fn development() -> Self {
        Self::new().with_log_level(LogLevel::Debug)
    }

    /// Create a configuration for automated testing: quiet logs, small
    /// context.
    pub fn testing() -> Self {
        Self::new()
            .with_log_level(LogLevel::Warn)
            .with_context_limit(3)
    }

    /// Build the configuration, validating it in the process.
    pub fn build(self) -> Result<FinmemConfig> {
        validation::validate_config(&self.config)?;
        Ok(self.config)
    }
}
