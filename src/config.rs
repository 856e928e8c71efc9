//! Application configuration loaded from the environment.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Default Gemini model used for all agent stages.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default directory where completed plans are persisted as JSON files.
pub const DEFAULT_PLANS_DIR: &str = "generated_plans";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("GEMINI_API_KEY environment variable not set. Export it or add it to your environment before starting the service.")]
    MissingCredential,

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Runtime configuration for the service.
#[derive(Debug, Clone)]
pub struct Config {
    /// Credential for the Gemini API.
    pub gemini_api_key: String,

    /// Model identifier passed to the provider.
    pub model: String,

    /// Address the HTTP API binds to.
    pub bind_addr: String,

    /// Directory where completed plans are written, one JSON file per plan.
    pub plans_dir: PathBuf,

    /// Maximum workflow attempts before giving up on an over-budget plan.
    pub max_attempts: u32,

    /// Timeout applied to each model call.
    pub llm_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// `GEMINI_API_KEY` is required; everything else has a default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let gemini_api_key =
            std::env::var("GEMINI_API_KEY").map_err(|_| ConfigError::MissingCredential)?;

        let model = std::env::var("ITINERA_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let bind_addr =
            std::env::var("ITINERA_BIND").unwrap_or_else(|_| "0.0.0.0:8000".to_string());

        let plans_dir = std::env::var("ITINERA_PLANS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_PLANS_DIR));

        let max_attempts = match std::env::var("ITINERA_MAX_ATTEMPTS") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "ITINERA_MAX_ATTEMPTS".to_string(),
                value: raw,
            })?,
            Err(_) => crate::workflow::DEFAULT_MAX_ATTEMPTS,
        };

        Ok(Self {
            gemini_api_key,
            model,
            bind_addr,
            plans_dir,
            max_attempts,
            llm_timeout: Duration::from_secs(120),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credential_is_an_error() {
        std::env::remove_var("GEMINI_API_KEY");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::MissingCredential)
        ));
    }
}
