// ⚙️ Configuration - Environment (+ optional .env file), overridable from the CLI

use crate::sync::DEFAULT_BATCH_SIZE;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://connect.squareup.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_BASE_URL: &str = "CATALOG_BASE_URL";
pub const ENV_SOURCE_TOKEN: &str = "SOURCE_ACCESS_TOKEN";
pub const ENV_TARGET_TOKEN: &str = "TARGET_ACCESS_TOKEN";
pub const ENV_TIMEOUT_SECS: &str = "CATALOG_TIMEOUT_SECS";
pub const ENV_BATCH_SIZE: &str = "CATALOG_BATCH_SIZE";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{var} has an invalid value: '{value}'")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub base_url: String,
    pub source_token: Option<String>,
    pub target_token: Option<String>,
    pub timeout: Duration,
    pub batch_size: usize,
}

impl Config {
    /// Read from the process environment, after loading `.env` if there is one
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is fine
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key → value source. Tokens are checked later, so a
    /// command that needs only one account does not require both.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let timeout_secs = match non_empty(ENV_TIMEOUT_SECS) {
            Some(raw) => parse_positive(ENV_TIMEOUT_SECS, &raw)? as u64,
            None => DEFAULT_TIMEOUT_SECS,
        };
        let batch_size = match non_empty(ENV_BATCH_SIZE) {
            Some(raw) => parse_positive(ENV_BATCH_SIZE, &raw)?,
            None => DEFAULT_BATCH_SIZE,
        };

        Ok(Config {
            base_url: non_empty(ENV_BASE_URL).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            source_token: non_empty(ENV_SOURCE_TOKEN),
            target_token: non_empty(ENV_TARGET_TOKEN),
            timeout: Duration::from_secs(timeout_secs),
            batch_size,
        })
    }

    pub fn source_token(&self) -> Result<&str, ConfigError> {
        self.source_token
            .as_deref()
            .ok_or(ConfigError::Missing(ENV_SOURCE_TOKEN))
    }

    pub fn target_token(&self) -> Result<&str, ConfigError> {
        self.target_token
            .as_deref()
            .ok_or(ConfigError::Missing(ENV_TARGET_TOKEN))
    }
}

fn parse_positive(var: &'static str, raw: &str) -> Result<usize, ConfigError> {
    match raw.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::Invalid {
            var,
            value: raw.to_string(),
        }),
    }
}

// ============================================================================
// TESTS
// ============================================================================
