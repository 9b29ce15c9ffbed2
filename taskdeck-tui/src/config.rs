use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

const API_URL_ENV: &str = "TASKDECK_API_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskdeckConfig {
    /// Base URL of the task service, e.g. "http://localhost:8080"
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_user_id")]
    pub user_id: i64,
    /// Seconds a status bar message stays visible.
    #[serde(default = "default_status_ttl_secs")]
    pub status_ttl_secs: u64,
    /// Seconds between background refreshes of the task list.
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
    /// Rows moved by PageUp/PageDown.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Ask before deleting a task.
    #[serde(default = "default_confirm_delete")]
    pub confirm_delete: bool,
    /// Log filter used when TASKDECK_LOG is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_api_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_user_id() -> i64 {
    1
}

fn default_status_ttl_secs() -> u64 {
    4
}

fn default_refresh_interval_secs() -> u64 {
    60
}

fn default_page_size() -> usize {
    10
}

fn default_confirm_delete() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TaskdeckConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            user_id: default_user_id(),
            status_ttl_secs: default_status_ttl_secs(),
            refresh_interval_secs: default_refresh_interval_secs(),
            page_size: default_page_size(),
            confirm_delete: default_confirm_delete(),
            log_level: default_log_level(),
        }
    }
}

impl TaskdeckConfig {
    pub fn config_path() -> Result<PathBuf> {
        Ok(dirs::config_dir()
            .context("Cannot determine config directory")?
            .join("taskdeck")
            .join("config.toml"))
    }

    pub fn log_path() -> Result<PathBuf> {
        Ok(dirs::data_local_dir()
            .context("Cannot determine data directory")?
            .join("taskdeck")
            .join("taskdeck.log"))
    }

    /// Load config from disk. Returns default config if file doesn't exist.
    /// `TASKDECK_API_URL` overrides the configured API URL.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config at {}", path.display()))?;
            Self::parse(&raw)
                .with_context(|| format!("Failed to parse config at {}", path.display()))?
        } else {
            Self::default()
        };
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                config.api_url = url;
            }
        }
        Ok(config)
    }

    pub fn parse(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(self)?;
        std::fs::write(&path, raw)?;
        Ok(())
    }

    pub fn status_ttl(&self) -> Duration {
        Duration::from_secs(self.status_ttl_secs)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }
}
