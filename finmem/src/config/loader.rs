//! Configuration loader.
//!
//! Loads configuration from defaults, files, and environment variables, in
//! that precedence order.

use super::{models::*, validation, ConfigError, Result, DEFAULT_CONFIG_FILES, ENV_PREFIX};
use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use std::path::{Path, PathBuf};

/// Configuration loader that handles loading from multiple sources.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    figment: Figment,
}

impl ConfigLoader {
    /// Create a new configuration loader with default values.
    pub fn new() -> Self {
        let figment = Figment::new().merge(Serialized::defaults(FinmemConfig::default()));
        Self { figment }
    }

    /// Load configuration from a file.
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<&mut Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileLoadError(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => {
                let figment = std::mem::take(&mut self.figment).merge(Toml::file(path));
                self.figment = figment;
            }
            Some("yaml") | Some("yml") => {
                let figment = std::mem::take(&mut self.figment).merge(Yaml::file(path));
                self.figment = figment;
            }
            Some("json") => {
                let figment = std::mem::take(&mut self.figment).merge(Json::file(path));
                self.figment = figment;
            }
            _ => {
                return Err(ConfigError::FileLoadError(format!(
                    "Unsupported file format: {}",
                    path.display()
                )));
            }
        }

        Ok(self)
    }

    /// Attempt to load from default configuration file locations.
    pub fn load_default_files(&mut self) -> &mut Self {
        for file in DEFAULT_CONFIG_FILES {
            let path = PathBuf::from(file);
            if path.exists() && self.load_file(&path).is_ok() {
                break;
            }
        }

        // Also check XDG config directories
        if let Some(proj_dirs) = directories::ProjectDirs::from("org", "finmem", "finmem") {
            let config_dir = proj_dirs.config_dir();

            for ext in &["toml", "yaml", "yml", "json"] {
                let path = config_dir.join(format!("config.{}", ext));
                if path.exists() && self.load_file(&path).is_ok() {
                    break;
                }
            }
        }

        self
    }

    /// Load configuration from environment variables.
    pub fn load_env(&mut self) -> &mut Self {
        let figment =
            std::mem::take(&mut self.figment).merge(Env::prefixed(ENV_PREFIX).split("__"));
        self.figment = figment;
        self
    }

    /// Load configuration from a custom source.
    pub fn merge<T: figment::Provider>(&mut self, provider: T) -> &mut Self {
        let figment = std::mem::take(&mut self.figment).merge(provider);
        self.figment = figment;
        self
    }

    /// Extract and validate the configuration.
    pub fn extract(&self) -> Result<FinmemConfig> {
        let config: FinmemConfig = self
            .figment
            .extract()
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        validation::validate_config(&config)?;

        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_extract() {
        let config = ConfigLoader::new().extract().unwrap();
        assert_eq!(config.relevance.context_limit, 5);
    }

    #[test]
    fn test_toml_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("finmem.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[relevance]\ncontext_limit = 9").unwrap();

        let mut loader = ConfigLoader::new();
        loader.load_file(&path).unwrap();
        let config = loader.extract().unwrap();
        assert_eq!(config.relevance.context_limit, 9);
        // Untouched sections keep their defaults.
        assert!((config.extraction.min_confidence - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_missing_file_errors() {
        let mut loader = ConfigLoader::new();
        assert!(matches!(
            loader.load_file("/nonexistent/finmem.toml"),
            Err(ConfigError::FileLoadError(_))
        ));
    }

    #[test]
    fn test_invalid_values_rejected_on_extract() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("finmem.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[extraction]\nmin_confidence = 3.0").unwrap();

        let mut loader = ConfigLoader::new();
        loader.load_file(&path).unwrap();
        assert!(matches!(
            loader.extract(),
            Err(ConfigError::ValidationError(_))
        ));
    }
}
