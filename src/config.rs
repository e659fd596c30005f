//! Runtime configuration.
//!
//! Values are layered: built-in defaults, then an optional JSON config file,
//! then environment variables, then CLI flags (applied by the binary):
//! - `BLOCK_SCHEDULE_SOURCE` - Base URL or directory holding the resources (default: `.`)
//! - `BLOCK_SCHEDULE_TIMEOUT_SECS` - Per-request timeout for HTTP sources, `0` disables (default: 30)
//! - `BLOCK_SCHEDULE_INITIAL_DAY` - Day selected before the user picks one (default: `A`)
//! - `BLOCK_SCHEDULE_PORT` - Port for `blocks serve` (default: 3000)

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::DayCode;

const APP_NAME: &str = "block-schedule";
const CONFIG_FILE: &str = "config.json";
const RESOURCE_COUNT: usize = 7;

/// Invalid configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL (`http://`, `https://`) or directory the resource locators are relative to.
    pub source: String,
    /// Resource locators in block order.
    pub resources: Vec<String>,
    /// Per-request timeout for HTTP sources. `0` waits indefinitely.
    pub request_timeout_secs: u64,
    /// Day shown after the first load when none has been selected.
    pub initial_day: DayCode,
    /// Port for the HTTP API.
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: ".".to_string(),
            resources: default_resources(),
            request_timeout_secs: 30,
            initial_day: DayCode::default(),
            port: 3000,
        }
    }
}

/// `data/data1.json` through `data/data7.json`.
pub fn default_resources() -> Vec<String> {
    (1..=RESOURCE_COUNT)
        .map(|n| format!("data/data{}.json", n))
        .collect()
}

impl Config {
    /// Load configuration from `path`, or from the user's config directory when `None`.
    ///
    /// A missing file at the default location yields defaults; an explicit path
    /// must exist. Environment overrides are applied on top.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Apply `BLOCK_SCHEDULE_*` overrides using `lookup` to read variables.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(source) = lookup("BLOCK_SCHEDULE_SOURCE") {
            self.source = source;
        }
        if let Some(value) = lookup("BLOCK_SCHEDULE_TIMEOUT_SECS") {
            self.request_timeout_secs = parse_number("BLOCK_SCHEDULE_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = lookup("BLOCK_SCHEDULE_INITIAL_DAY") {
            self.initial_day = DayCode::parse(&value).ok_or_else(|| ConfigError::InvalidValue {
                key: "BLOCK_SCHEDULE_INITIAL_DAY".to_string(),
                value: value.clone(),
                reason: "expected a day code A-G".to_string(),
            })?;
        }
        if let Some(value) = lookup("BLOCK_SCHEDULE_PORT") {
            self.port = parse_number("BLOCK_SCHEDULE_PORT", &value)?;
        }
        Ok(())
    }

    /// Whether resources are fetched over HTTP rather than read from disk.
    pub fn is_remote(&self) -> bool {
        self.source.starts_with("http://") || self.source.starts_with("https://")
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        match self.request_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

fn parse_number<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: e.to_string(),
        })
}

/// `<config dir>/block-schedule/config.json`, if a config directory can be determined.
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}
