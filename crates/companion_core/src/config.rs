//! Runtime configuration resolved from the environment.
//!
//! # Invariants
//! - Resolution never reads process state except through the lookup
//!   function, so `from_lookup` is deterministic.
//! - The weather API key has no built-in default.

use crate::fetch::trivia::DEFAULT_TRIVIA_BASE_URL;
use crate::fetch::weather::DEFAULT_WEATHER_BASE_URL;
use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_DB_PATH: &str = "COMPANION_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "COMPANION_LOG_LEVEL";
pub const ENV_WEATHER_API_KEY: &str = "COMPANION_WEATHER_API_KEY";
pub const ENV_TRIVIA_BASE_URL: &str = "COMPANION_TRIVIA_BASE_URL";
pub const ENV_WEATHER_BASE_URL: &str = "COMPANION_WEATHER_BASE_URL";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "COMPANION_HTTP_TIMEOUT_SECS";

pub const DEFAULT_DB_FILE_NAME: &str = "companion.sqlite3";
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue { name: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { name, value } => write!(f, "invalid value for {name}: `{value}`"),
        }
    }
}

impl Error for ConfigError {}

#[derive(Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    pub weather_api_key: Option<String>,
    pub trivia_base_url: String,
    pub weather_base_url: String,
    pub http_timeout: Duration,
}

// Manual impl keeps the API key out of debug output.
impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("db_path", &self.db_path)
            .field("log_level", &self.log_level)
            .field(
                "weather_api_key",
                &self.weather_api_key.as_ref().map(|_| "<redacted>"),
            )
            .field("trivia_base_url", &self.trivia_base_url)
            .field("weather_base_url", &self.weather_base_url)
            .field("http_timeout", &self.http_timeout)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level().to_string(),
            weather_api_key: None,
            trivia_base_url: DEFAULT_TRIVIA_BASE_URL.to_string(),
            weather_base_url: DEFAULT_WEATHER_BASE_URL.to_string(),
            http_timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds config from `lookup(name)`; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        if let Some(path) = get(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(level) = get(ENV_LOG_LEVEL) {
            config.log_level = level;
        }
        config.weather_api_key = get(ENV_WEATHER_API_KEY);
        if let Some(url) = get(ENV_TRIVIA_BASE_URL) {
            config.trivia_base_url = url;
        }
        if let Some(url) = get(ENV_WEATHER_BASE_URL) {
            config.weather_base_url = url;
        }
        if let Some(raw) = get(ENV_HTTP_TIMEOUT_SECS) {
            let secs = raw
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidValue {
                    name: ENV_HTTP_TIMEOUT_SECS,
                    value: raw.clone(),
                })?;
            config.http_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}
