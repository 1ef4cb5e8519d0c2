//! Configuration management for fleetdesk
//!
//! Config stored at: ~/.config/fleetdesk/config.json

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use fleetdesk_types::{ConfigError, OutputFormat, Result};

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Backend server root, without `/api`
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Page size for interactive listings
    #[serde(default = "default_list_page_size")]
    pub list_page_size: u32,

    /// Page size when walking a whole collection
    #[serde(default = "default_fetch_page_size")]
    pub fetch_page_size: u32,

    /// Default output format (json, table)
    #[serde(default)]
    pub output_format: OutputFormat,

    /// Refresh interval of `idle --watch`, in seconds
    #[serde(default = "default_idle_refresh_secs")]
    pub idle_refresh_secs: u64,

    /// Idle vehicles at or above this many hours raise a notification
    #[serde(default = "default_idle_alert_hours")]
    pub idle_alert_hours: f64,

    /// Directory for the session and notification state
    #[serde(default)]
    pub state_dir: Option<PathBuf>,
}

fn default_api_base_url() -> String {
    "http://localhost:1337".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_list_page_size() -> u32 {
    25
}

fn default_fetch_page_size() -> u32 {
    100
}

fn default_idle_refresh_secs() -> u64 {
    60
}

fn default_idle_alert_hours() -> f64 {
    24.0
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            list_page_size: default_list_page_size(),
            fetch_page_size: default_fetch_page_size(),
            output_format: OutputFormat::default(),
            idle_refresh_secs: default_idle_refresh_secs(),
            idle_alert_hours: default_idle_alert_hours(),
            state_dir: None,
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NotFound)?
            .join("fleetdesk");
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Directory holding session.json and notification read markers
    pub fn state_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.state_dir {
            return Ok(dir.clone());
        }

        let state_dir = dirs::data_local_dir()
            .ok_or(ConfigError::NotFound)?
            .join("fleetdesk");
        Ok(state_dir)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn idle_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.idle_refresh_secs.max(1))
    }

    /// Reject values the client cannot work with
    pub fn validate(&self) -> Result<()> {
        let url = self.api_base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "api_base_url must start with http:// or https:// (got '{}')",
                self.api_base_url
            ))
            .into());
        }
        if self.list_page_size == 0 || self.fetch_page_size == 0 {
            return Err(ConfigError::Invalid("page sizes must be at least 1".to_string()).into());
        }
        if !(self.idle_alert_hours.is_finite() && self.idle_alert_hours >= 0.0) {
            return Err(ConfigError::Invalid("idle_alert_hours must be >= 0".to_string()).into());
        }
        Ok(())
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Fleetdesk Configuration")?;
        writeln!(f, "=======================")?;
        writeln!(f)?;
        writeln!(f, "API base URL:     {}", self.api_base_url)?;
        writeln!(f, "Request timeout:  {}s", self.request_timeout_secs)?;
        writeln!(f, "List page size:   {}", self.list_page_size)?;
        writeln!(f, "Fetch page size:  {}", self.fetch_page_size)?;
        writeln!(f, "Output format:    {}", self.output_format)?;
        writeln!(f, "Idle refresh:     {}s", self.idle_refresh_secs)?;
        writeln!(f, "Idle alert after: {:.1}h", self.idle_alert_hours)?;
        writeln!(
            f,
            "State dir:        {}",
            self.state_dir()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "(error)".to_string())
        )?;

        if let Ok(path) = Self::config_path() {
            writeln!(f)?;
            writeln!(f, "Config file:      {}", path.display())?;
        }

        Ok(())
    }
}
