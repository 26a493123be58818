//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub cors_origin: String,
    /// When absent the whole pipeline runs in demo mode.
    pub openai_api_key: Option<String>,
    pub openai_api_base: Option<String>,
    pub question_model: String,
    pub thought_model: String,
    pub analysis_model: String,
    pub demo_delay_min: Duration,
    pub demo_delay_max: Duration,
    pub llm_timeout: Duration,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        // --- Load Server Settings ---
        let bind_address_str = var_or("BIND_ADDRESS", "0.0.0.0:3000");
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = var_or("RUST_LOG", "INFO");
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let cors_origin = var_or("CORS_ORIGIN", "http://localhost:3000");

        // --- Load Backend Credentials (as optional) ---
        let openai_api_key = lookup("OPENAI_API_KEY").filter(|key| !key.trim().is_empty());
        let openai_api_base = lookup("OPENAI_API_BASE").filter(|base| !base.trim().is_empty());

        // --- Load Pipeline Settings ---
        let question_model = var_or("QUESTION_MODEL", "gpt-4o-mini");
        let thought_model = var_or("THOUGHT_MODEL", "gpt-4o-mini");
        let analysis_model = var_or("ANALYSIS_MODEL", "gpt-4o");

        let demo_delay_min = Duration::from_millis(parse_number(&lookup, "DEMO_DELAY_MIN_MS", 800)?);
        let demo_delay_max = Duration::from_millis(parse_number(&lookup, "DEMO_DELAY_MAX_MS", 2500)?);
        if demo_delay_max < demo_delay_min {
            return Err(ConfigError::InvalidValue(
                "DEMO_DELAY_MAX_MS".to_string(),
                "must not be lower than DEMO_DELAY_MIN_MS".to_string(),
            ));
        }

        let llm_timeout = Duration::from_secs(parse_number(&lookup, "LLM_TIMEOUT_SECS", 60)?);
        if llm_timeout.is_zero() {
            return Err(ConfigError::InvalidValue(
                "LLM_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            bind_address,
            log_level,
            cors_origin,
            openai_api_key,
            openai_api_base,
            question_model,
            thought_model,
            analysis_model,
            demo_delay_min,
            demo_delay_max,
            llm_timeout,
        })
    }
}

fn parse_number<F>(lookup: &F, key: &str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidValue(key.to_string(), e.to_string())),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.bind_address.port(), 3000);
        assert_eq!(config.log_level, Level::INFO);
        assert!(config.openai_api_key.is_none());
        assert_eq!(config.question_model, "gpt-4o-mini");
        assert_eq!(config.analysis_model, "gpt-4o");
        assert_eq!(config.demo_delay_min, Duration::from_millis(800));
        assert_eq!(config.demo_delay_max, Duration::from_millis(2500));
        assert_eq!(config.llm_timeout, Duration::from_secs(60));
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let config = config_from(&[("OPENAI_API_KEY", "  ")]).unwrap();
        assert!(config.openai_api_key.is_none());
    }

    #[test]
    fn api_key_and_models_are_read() {
        let config = config_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("QUESTION_MODEL", "gpt-4.1"),
            ("DEMO_DELAY_MIN_MS", "0"),
            ("DEMO_DELAY_MAX_MS", "10"),
        ])
        .unwrap();
        assert_eq!(config.openai_api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.question_model, "gpt-4.1");
        assert_eq!(config.demo_delay_max, Duration::from_millis(10));
    }

    #[test]
    fn invalid_values_are_reported_by_name() {
        let err = config_from(&[("BIND_ADDRESS", "nowhere")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref key, _) if key == "BIND_ADDRESS"));

        let err = config_from(&[("DEMO_DELAY_MIN_MS", "soon")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref key, _) if key == "DEMO_DELAY_MIN_MS"));

        let err = config_from(&[("DEMO_DELAY_MIN_MS", "900"), ("DEMO_DELAY_MAX_MS", "100")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref key, _) if key == "DEMO_DELAY_MAX_MS"));

        let err = config_from(&[("RUST_LOG", "chatty")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref key, _) if key == "RUST_LOG"));
    }
}
