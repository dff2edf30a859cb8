//! services/portal/src/config.rs
//!
//! Defines the client's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

pub const DEFAULT_API_BASE_URL: &str = "https://github-back-alumnos-8.onrender.com";

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub api_base_url: String,
    pub session_path: PathBuf,
    pub download_dir: PathBuf,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
    pub log_level: Level,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            session_path: PathBuf::from("./.portal/session.json"),
            download_dir: PathBuf::from("."),
            poll_interval: Duration::from_secs(5),
            request_timeout: Duration::from_secs(30),
            log_level: Level::INFO,
        }
    }
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
        let defaults = Self::default();

        // --- Remote API ---
        let api_base_url = std::env::var("API_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_base_url);
        if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue(
                "API_BASE_URL".to_string(),
                format!("'{}' is not an http(s) URL", api_base_url),
            ));
        }

        // --- Local Storage ---
        let session_path = std::env::var("SESSION_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.session_path);
        let download_dir = std::env::var("DOWNLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.download_dir);

        // --- Timers ---
        let poll_interval = seconds_var("POLL_INTERVAL_SECS")?.unwrap_or(defaults.poll_interval);
        let request_timeout =
            seconds_var("REQUEST_TIMEOUT_SECS")?.unwrap_or(defaults.request_timeout);

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            api_base_url,
            session_path,
            download_dir,
            poll_interval,
            request_timeout,
            log_level,
        })
    }
}

fn seconds_var(name: &str) -> Result<Option<Duration>, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => {
            let secs = raw.parse::<u64>().ok().filter(|s| *s > 0).ok_or_else(|| {
                ConfigError::InvalidValue(
                    name.to_string(),
                    format!("'{}' is not a positive number of seconds", raw),
                )
            })?;
            Ok(Some(Duration::from_secs(secs)))
        }
        Err(_) => Ok(None),
    }
}
