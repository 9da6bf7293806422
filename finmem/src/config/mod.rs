//! Configuration system for finmem.
//!
//! Configuration loads from multiple sources (files, environment variables)
//! with defaults and validation.

mod builder;
mod loader;
mod models;
mod validation;

pub use builder::ConfigBuilder;
pub use loader::ConfigLoader;
pub use models::*;

/// Default configuration file names that the system will look for
pub const DEFAULT_CONFIG_FILES: &[&str] = &[
    "finmem.toml",
    "finmem.yaml",
    "finmem.yml",
    "finmem.json",
    ".finmem/config.toml",
    ".finmem/config.yaml",
    ".finmem/config.yml",
    ".finmem/config.json",
];

/// Environment variable prefix for finmem configuration
pub const ENV_PREFIX: &str = "FINMEM_";

/// Configuration error type
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Error occurred during file loading
    #[error("Failed to load configuration file: {0}")]
    FileLoadError(String),

    /// Error occurred during validation
    #[error("Configuration validation error: {0}")]
    ValidationError(String),

    /// Error occurred during parsing
    #[error("Configuration parsing error: {0}")]
    ParseError(String),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
