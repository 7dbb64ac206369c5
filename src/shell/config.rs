// Runtime configuration, read from the process environment.

use crate::modules::hour_ledger::use_cases::reconcile_entry_change::handler::ReconcilePolicy;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

pub const ADDR_VAR: &str = "HOUR_LEDGER_ADDR";
pub const MAX_COMMIT_ATTEMPTS_VAR: &str = "HOUR_LEDGER_MAX_COMMIT_ATTEMPTS";
pub const IDEMPOTENCY_TTL_HOURS_VAR: &str = "HOUR_LEDGER_IDEMPOTENCY_TTL_HOURS";
pub const SEED_FILE_VAR: &str = "HOUR_LEDGER_SEED_FILE";

const DEFAULT_ADDR: ([u8; 4], u16) = ([0, 0, 0, 0], 8080);
const DEFAULT_MAX_COMMIT_ATTEMPTS: u32 = 5;
const DEFAULT_IDEMPOTENCY_TTL_HOURS: i64 = 24;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key}={value:?} is invalid: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub addr: SocketAddr,
    pub max_commit_attempts: u32,
    pub idempotency_ttl_hours: i64,
    /// JSON file with `clients` and `budgetTasks` loaded into the store at startup.
    pub seed_file: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let addr = parse(ADDR_VAR, lookup(ADDR_VAR), SocketAddr::from(DEFAULT_ADDR))?;
        let max_commit_attempts = parse(
            MAX_COMMIT_ATTEMPTS_VAR,
            lookup(MAX_COMMIT_ATTEMPTS_VAR),
            DEFAULT_MAX_COMMIT_ATTEMPTS,
        )?;
        if max_commit_attempts == 0 {
            return Err(ConfigError::Invalid {
                key: MAX_COMMIT_ATTEMPTS_VAR,
                value: "0".into(),
                reason: "at least one attempt is required".into(),
            });
        }
        let idempotency_ttl_hours = parse(
            IDEMPOTENCY_TTL_HOURS_VAR,
            lookup(IDEMPOTENCY_TTL_HOURS_VAR),
            DEFAULT_IDEMPOTENCY_TTL_HOURS,
        )?;
        if idempotency_ttl_hours <= 0 {
            return Err(ConfigError::Invalid {
                key: IDEMPOTENCY_TTL_HOURS_VAR,
                value: idempotency_ttl_hours.to_string(),
                reason: "must be positive".into(),
            });
        }
        let seed_file = lookup(SEED_FILE_VAR)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            addr,
            max_commit_attempts,
            idempotency_ttl_hours,
            seed_file,
        })
    }

    pub fn policy(&self) -> ReconcilePolicy {
        ReconcilePolicy {
            max_commit_attempts: self.max_commit_attempts,
            idempotency_ttl_ms: self.idempotency_ttl_hours * 60 * 60 * 1000,
        }
    }
}

/// Parses `raw` when set, otherwise returns `default`.
fn parse<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    let Some(value) = raw else {
        return Ok(default);
    };
    value.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
        key,
        reason: e.to_string(),
        value,
    })
}
