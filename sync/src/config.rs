//! Configuration management for the logbook tools.

use crate::transport::Credentials;
use logbook_engine::Timestamp;
use std::env;

const DEFAULT_DATABASE_URL: &str = "sqlite://logbook.db?mode=rwc";

/// Configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite connection URL
    pub database_url: String,
    /// How far apart, in seconds, an imported flight's times may be from a
    /// logged flight and still count as the same flight
    pub import_time_tolerance: Timestamp,
    pub sync_username: Option<String>,
    pub sync_password: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let import_time_tolerance = match env::var("IMPORT_TIME_TOLERANCE_SECS") {
            Ok(value) => parse_tolerance(&value)?,
            Err(_) => 0,
        };

        Ok(Self {
            database_url,
            import_time_tolerance,
            sync_username: env::var("SYNC_USERNAME").ok(),
            sync_password: env::var("SYNC_PASSWORD").ok(),
        })
    }

    /// The database to open: `overridden` when given, else the configured URL.
    pub fn database_url_or<'a>(&'a self, overridden: Option<&'a str>) -> &'a str {
        overridden.unwrap_or(&self.database_url)
    }

    /// Sync credentials, when both username and password are configured.
    pub fn credentials(&self) -> Option<Credentials> {
        match (&self.sync_username, &self.sync_password) {
            (Some(username), Some(password)) => Some(Credentials::new(username, password)),
            _ => None,
        }
    }
}

pub fn parse_tolerance(value: &str) -> Result<Timestamp, ConfigError> {
    value
        .trim()
        .parse::<Timestamp>()
        .ok()
        .filter(|secs| *secs >= 0)
        .ok_or_else(|| ConfigError::InvalidTolerance(value.to_string()))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid IMPORT_TIME_TOLERANCE_SECS value: {0:?}")]
    InvalidTolerance(String),
}
