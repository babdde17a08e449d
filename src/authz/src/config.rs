//! Engine configuration loading

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{AuthzError, Result};

/// Authorization engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthzConfig {
    /// Enable metrics collection
    #[serde(default = "default_true")]
    pub enable_metrics: bool,

    /// Account database used for token and membership reads
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
}

impl Default for AuthzConfig {
    fn default() -> Self {
        Self {
            enable_metrics: true,
            database: None,
        }
    }
}

/// Connection pool settings for the account database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            acquire_timeout_secs: default_acquire_timeout(),
            idle_timeout_secs: default_idle_timeout(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_connections() -> u32 {
    25
}

fn default_min_connections() -> u32 {
    5
}

fn default_acquire_timeout() -> u64 {
    3
}

fn default_idle_timeout() -> u64 {
    600
}

impl AuthzConfig {
    /// Load configuration from the process environment
    ///
    /// - `AUTHZ_ENABLE_METRICS` - `true`/`false` (default: true)
    /// - `DATABASE_URL` - account database; no database config when unset
    /// - `AUTHZ_DB_MAX_CONNECTIONS` (default: 25)
    /// - `AUTHZ_DB_MIN_CONNECTIONS` (default: 5)
    /// - `AUTHZ_DB_ACQUIRE_TIMEOUT_SECS` (default: 3)
    /// - `AUTHZ_DB_IDLE_TIMEOUT_SECS` (default: 600)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(enabled) = parse_var(&lookup, "AUTHZ_ENABLE_METRICS")? {
            config.enable_metrics = enabled;
        }

        if let Some(url) = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()) {
            let mut database = DatabaseConfig::new(url);
            if let Some(max) = parse_var(&lookup, "AUTHZ_DB_MAX_CONNECTIONS")? {
                database.max_connections = max;
            }
            if let Some(min) = parse_var(&lookup, "AUTHZ_DB_MIN_CONNECTIONS")? {
                database.min_connections = min;
            }
            if let Some(secs) = parse_var(&lookup, "AUTHZ_DB_ACQUIRE_TIMEOUT_SECS")? {
                database.acquire_timeout_secs = secs;
            }
            if let Some(secs) = parse_var(&lookup, "AUTHZ_DB_IDLE_TIMEOUT_SECS")? {
                database.idle_timeout_secs = secs;
            }
            config.database = Some(database);
        }

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<()> {
        if let Some(database) = &self.database {
            if database.max_connections == 0 {
                return Err(AuthzError::Configuration(
                    "max_connections must be at least 1".to_string(),
                ));
            }
            if database.min_connections > database.max_connections {
                return Err(AuthzError::Configuration(format!(
                    "min_connections ({}) exceeds max_connections ({})",
                    database.min_connections, database.max_connections
                )));
            }
        }
        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| AuthzError::Configuration(format!("{}={:?}: {}", key, raw, e))),
        None => Ok(None),
    }
}
