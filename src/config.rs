//! Configuration management for the vote ledger
//!
//! Loads configuration from environment variables with validation.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Ledger operation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Default operation deadline in seconds when the caller supplies none
    pub default_deadline_seconds: u64,

    /// Maximum accepted length of a choice's text
    pub max_choice_length: usize,

    /// Maximum accepted length of an election title
    pub max_title_length: usize,
}

impl LedgerConfig {
    /// Load ledger configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let default_deadline_seconds = std::env::var("LEDGER_DEFAULT_DEADLINE_SECONDS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .map_err(|_| Error::internal("Invalid LEDGER_DEFAULT_DEADLINE_SECONDS"))?;

        let max_choice_length = std::env::var("LEDGER_MAX_CHOICE_LENGTH")
            .unwrap_or_else(|_| "256".to_string())
            .parse()
            .map_err(|_| Error::internal("Invalid LEDGER_MAX_CHOICE_LENGTH"))?;

        let max_title_length = std::env::var("LEDGER_MAX_TITLE_LENGTH")
            .unwrap_or_else(|_| "512".to_string())
            .parse()
            .map_err(|_| Error::internal("Invalid LEDGER_MAX_TITLE_LENGTH"))?;

        let config = Self {
            default_deadline_seconds,
            max_choice_length,
            max_title_length,
        };
        config.validate()?;
        Ok(config)
    }

    /// Create configuration for testing
    pub fn for_testing() -> Self {
        Self {
            default_deadline_seconds: 5,
            max_choice_length: 256,
            max_title_length: 512,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.default_deadline_seconds == 0 {
            return Err(Error::internal(
                "LEDGER_DEFAULT_DEADLINE_SECONDS must be greater than zero",
            ));
        }
        if self.max_choice_length == 0 {
            return Err(Error::internal(
                "LEDGER_MAX_CHOICE_LENGTH must be greater than zero",
            ));
        }
        Ok(())
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            default_deadline_seconds: 30,
            max_choice_length: 256,
            max_title_length: 512,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub ledger: LedgerConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from environment
    pub fn from_env() -> Result<Self> {
        let ledger = LedgerConfig::from_env()?;

        let logging = LoggingConfig {
            level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string()),
        };

        Ok(Self { ledger, logging })
    }

    /// Create configuration for testing
    pub fn for_testing() -> Self {
        Self {
            ledger: LedgerConfig::for_testing(),
            logging: LoggingConfig {
                level: "debug".to_string(),
                format: "pretty".to_string(),
            },
        }
    }
}
