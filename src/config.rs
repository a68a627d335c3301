//! Store and autosave configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::time::Duration;

use crate::consts::AUTOSAVE_DELAY_MS;

pub const DEFAULT_TABLE: &str = "projects";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Errors raised while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("missing config: env var {var} not set")]
    Missing { var: String },

    /// A value was present but unusable.
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

/// Where projects live and how to reach them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Base URL of the hosted database, without a trailing slash.
    pub url: String,
    /// Anonymous API key sent with every request.
    pub api_key: String,
    /// Table holding project rows.
    pub table: String,
    pub timeouts: Timeouts,
}

impl StoreConfig {
    /// Build a config for `url` and `api_key` with default table and timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the URL is empty or not http(s).
    pub fn new(url: &str, api_key: impl Into<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            url: normalize_url(url)?,
            api_key: api_key.into(),
            table: DEFAULT_TABLE.to_string(),
            timeouts: Timeouts::default(),
        })
    }

    /// Build typed store config from environment variables.
    ///
    /// Required:
    /// - `ROOMPLAN_STORE_URL`
    /// - `ROOMPLAN_STORE_KEY`
    ///
    /// Optional:
    /// - `ROOMPLAN_STORE_TABLE`: default `projects`
    /// - `ROOMPLAN_REQUEST_TIMEOUT_SECS`: default 30
    /// - `ROOMPLAN_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or the URL is unusable.
    pub fn from_env() -> Result<Self, ConfigError> {
        let url = required_var("ROOMPLAN_STORE_URL")?;
        let api_key = required_var("ROOMPLAN_STORE_KEY")?;
        let mut config = Self::new(&url, api_key)?;
        if let Ok(table) = std::env::var("ROOMPLAN_STORE_TABLE") {
            if !table.trim().is_empty() {
                config.table = table.trim().to_string();
            }
        }
        config.timeouts = Timeouts {
            request_secs: env_parse("ROOMPLAN_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse("ROOMPLAN_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        Ok(config)
    }

    /// REST endpoint for the projects table.
    #[must_use]
    pub fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.url, self.table)
    }
}

/// Quiet period before an autosave, from `ROOMPLAN_AUTOSAVE_MS` (default 2000).
#[must_use]
pub fn autosave_delay_from_env() -> Duration {
    Duration::from_millis(env_parse("ROOMPLAN_AUTOSAVE_MS", AUTOSAVE_DELAY_MS))
}

fn required_var(var: &str) -> Result<String, ConfigError> {
    match std::env::var(var) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::Missing { var: var.to_string() }),
    }
}

fn normalize_url(raw: &str) -> Result<String, ConfigError> {
    let url = raw.trim().trim_end_matches('/');
    if url.is_empty() {
        return Err(ConfigError::Invalid("store URL is empty".into()));
    }
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::Invalid(format!("store URL must be http(s): {url}")));
    }
    Ok(url.to_string())
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    match std::env::var(key) {
        Ok(v) => v.trim().parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}
