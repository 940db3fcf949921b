//! Environment-driven configuration for the console binary.

use std::path::PathBuf;

use thiserror::Error;

use counterdesk_observability::{LogFormat, LogSettings};

use crate::storage::{FileStore, StorageError};

pub const API_URL_VAR: &str = "COUNTERDESK_API_URL";
pub const DATA_DIR_VAR: &str = "COUNTERDESK_DATA_DIR";
pub const LOG_FORMAT_VAR: &str = "COUNTERDESK_LOG_FORMAT";

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} is not a valid http(s) URL: '{value}'")]
    InvalidUrl { var: &'static str, value: String },

    #[error("{var} has unknown log format '{value}'")]
    InvalidLogFormat { var: &'static str, value: String },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub api_url: String,
    pub data_dir: PathBuf,
    pub log: LogSettings,
}

impl ConsoleConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable source; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| {
            lookup(var)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let api_url = match get(API_URL_VAR) {
            Some(raw) => parse_api_url(&raw)?,
            None => DEFAULT_API_URL.to_string(),
        };

        let data_dir = match get(DATA_DIR_VAR) {
            Some(dir) => PathBuf::from(dir),
            None => FileStore::default_dir()?,
        };

        let mut log = LogSettings::default();
        if let Some(raw) = get(LOG_FORMAT_VAR) {
            log.format = LogFormat::parse(&raw).ok_or(ConfigError::InvalidLogFormat {
                var: LOG_FORMAT_VAR,
                value: raw,
            })?;
        }

        Ok(Self {
            api_url,
            data_dir,
            log,
        })
    }
}

fn parse_api_url(raw: &str) -> Result<String, ConfigError> {
    let invalid = || ConfigError::InvalidUrl {
        var: API_URL_VAR,
        value: raw.to_string(),
    };
    let url = reqwest::Url::parse(raw).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid());
    }
    Ok(raw.trim_end_matches('/').to_string())
}
