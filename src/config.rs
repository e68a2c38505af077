// src/config.rs

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::ct_log::log_list::DEFAULT_LOG_LIST_URL;
use crate::ct_log::types::CtLog;

#[derive(Debug, Deserialize, Clone)]
pub struct CtLogConfig {
    #[serde(default = "default_log_list_url")]
    pub log_list_url: String,
    /// How long the cached log list stays fresh before a wholesale refresh
    #[serde(default = "default_freshness_days")]
    pub freshness_days: u64,
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,
}

fn default_log_list_url() -> String {
    DEFAULT_LOG_LIST_URL.to_string()
}
fn default_freshness_days() -> u64 { 3 }
fn default_http_timeout() -> u64 { 30 }

impl Default for CtLogConfig {
    fn default() -> Self {
        Self {
            log_list_url: default_log_list_url(),
            freshness_days: default_freshness_days(),
            http_timeout_secs: default_http_timeout(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub ct_logs: CtLogConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Registry entries inserted after initialization, e.g. a local or
    /// private CT log that is not on the public list
    #[serde(default)]
    pub extra_logs: Vec<CtLog>,
}

impl Config {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&contents)?;
        Ok(cfg)
    }
}
