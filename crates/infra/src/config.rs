//! Ledger configuration loading.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use fizzy_core::{AccountId, LedgerId};
use fizzy_observability::LogFormat;
use fizzy_token::TokenMetadata;

pub const ENV_LEDGER_ID: &str = "FIZZY_LEDGER_ID";
pub const ENV_TOKEN_NAME: &str = "FIZZY_TOKEN_NAME";
pub const ENV_TOKEN_SYMBOL: &str = "FIZZY_TOKEN_SYMBOL";
pub const ENV_TOKEN_DECIMALS: &str = "FIZZY_TOKEN_DECIMALS";
pub const ENV_EXECUTOR: &str = "FIZZY_EXECUTOR";
pub const ENV_LOG_FORMAT: &str = "FIZZY_LOG_FORMAT";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Everything needed to stand up one ledger instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    pub ledger_id: LedgerId,
    #[serde(flatten)]
    pub metadata: TokenMetadata,
    pub executor: AccountId,
    #[serde(default)]
    pub log_format: LogFormat,
}

impl LedgerConfig {
    /// Default metadata, fresh ledger id, JSON logs.
    pub fn new(executor: AccountId) -> Self {
        Self {
            ledger_id: LedgerId::new(),
            metadata: TokenMetadata::default(),
            executor,
            log_format: LogFormat::default(),
        }
    }

    /// Load from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary key lookup (environment, map, etc.).
    ///
    /// `FIZZY_EXECUTOR` is required; everything else falls back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &'static str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let executor_raw = get(ENV_EXECUTOR).ok_or(ConfigError::Missing(ENV_EXECUTOR))?;
        let executor: AccountId = executor_raw.parse().map_err(|e| ConfigError::Invalid {
            key: ENV_EXECUTOR,
            reason: format!("{e}"),
        })?;
        if executor.is_null() {
            return Err(ConfigError::Invalid {
                key: ENV_EXECUTOR,
                reason: "executor must not be the null account".to_string(),
            });
        }

        let mut config = Self::new(executor);

        if let Some(raw) = get(ENV_LEDGER_ID) {
            config.ledger_id = raw.parse().map_err(|e| ConfigError::Invalid {
                key: ENV_LEDGER_ID,
                reason: format!("{e}"),
            })?;
        }
        if let Some(name) = get(ENV_TOKEN_NAME) {
            config.metadata.name = name;
        }
        if let Some(symbol) = get(ENV_TOKEN_SYMBOL) {
            config.metadata.symbol = symbol;
        }
        if let Some(raw) = get(ENV_TOKEN_DECIMALS) {
            config.metadata.decimals = raw.parse().map_err(|e| ConfigError::Invalid {
                key: ENV_TOKEN_DECIMALS,
                reason: format!("{e}"),
            })?;
        }
        if let Some(raw) = get(ENV_LOG_FORMAT) {
            config.log_format = raw.parse().map_err(|reason| ConfigError::Invalid {
                key: ENV_LOG_FORMAT,
                reason,
            })?;
        }

        Ok(config)
    }
}
