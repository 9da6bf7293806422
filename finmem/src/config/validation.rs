//! Configuration validation utilities.

use super::models::*;
use super::ConfigError;

/// Validate the entire configuration.
pub fn validate_config(config: &FinmemConfig) -> Result<(), ConfigError> {
    validate_extraction_config(&config.extraction)?;
    validate_relevance_config(&config.relevance)?;
    Ok(())
}

fn validate_extraction_config(config: &ExtractionConfig) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&config.min_confidence) {
        return Err(ConfigError::ValidationError(format!(
            "min_confidence must be within [0, 1], got {}",
            config.min_confidence
        )));
    }
    Ok(())
}

fn validate_relevance_config(config: &RelevanceConfig) -> Result<(), ConfigError> {
    if config.context_limit == 0 {
        return Err(ConfigError::ValidationError(
            "context_limit must be greater than 0".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&FinmemConfig::default()).is_ok());
    }

    #[test]
    fn test_out_of_range_confidence_rejected() {
        let mut config = FinmemConfig::default();
        config.extraction.min_confidence = 1.5;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_zero_context_limit_rejected() {
        let mut config = FinmemConfig::default();
        config.relevance.context_limit = 0;
        assert!(validate_config(&config).is_err());
    }
}
