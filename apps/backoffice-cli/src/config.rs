//! CLI configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults.

use std::env;

/// Back-office CLI configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Base URL of the back-office REST API
    pub api_url: String,

    /// Tracing filter directive (e.g. "info", "stockbook_import=debug")
    pub log_filter: String,
}

impl CliConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let api_url = env::var("STOCKBOOK_API_URL")
            .unwrap_or_else(|_| "http://localhost:5000".to_string());

        if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue("STOCKBOOK_API_URL".to_string()));
        }

        Ok(CliConfig {
            api_url,
            log_filter: env::var("STOCKBOOK_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply_without_env() {
        let config = CliConfig::load().unwrap();
        assert!(config.api_url.starts_with("http"));
        assert!(!config.log_filter.is_empty());
    }
}
