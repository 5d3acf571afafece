// src/config/mod.rs
//! # Dashboard Configuration
//!
//! Layered settings for the dashboard binary:
//! 1) `$DASHBOARD_CONFIG_PATH` (must exist when set)
//! 2) `config/dashboard.toml`
//! 3) built-in defaults
//!
//! `DASHBOARD_LOCATION` and `DASHBOARD_LOG_DIR` override the file afterwards.

pub mod location;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub use location::{Endpoints, PageLocation};

pub const ENV_CONFIG_PATH: &str = "DASHBOARD_CONFIG_PATH";
pub const ENV_LOCATION: &str = "DASHBOARD_LOCATION";
pub const ENV_LOG_DIR: &str = "DASHBOARD_LOG_DIR";
pub const DEFAULT_CONFIG_PATH: &str = "config/dashboard.toml";

fn default_location() -> String {
    "http://localhost:8000".to_string()
}
fn default_api_prefix() -> String {
    "/api".to_string()
}
fn default_ws_prefix() -> String {
    "/ws".to_string()
}
fn default_dashboard_interval() -> u64 {
    30
}
fn default_mentions_interval() -> u64 {
    15
}
fn default_alerts_interval() -> u64 {
    10
}
fn default_mentions_limit() -> usize {
    100
}
fn default_log_dir() -> String {
    "logs".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// Origin the dashboard is served from, e.g. `https://tracker.example.com`.
    #[serde(default = "default_location")]
    pub location: String,
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
    #[serde(default = "default_ws_prefix")]
    pub ws_prefix: String,
    #[serde(default = "default_dashboard_interval")]
    pub dashboard_interval_secs: u64,
    #[serde(default = "default_mentions_interval")]
    pub mentions_interval_secs: u64,
    #[serde(default = "default_alerts_interval")]
    pub alerts_interval_secs: u64,
    #[serde(default = "default_mentions_limit")]
    pub mentions_limit: usize,
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
    #[serde(default)]
    pub log_format: LogFormat,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            location: default_location(),
            api_prefix: default_api_prefix(),
            ws_prefix: default_ws_prefix(),
            dashboard_interval_secs: default_dashboard_interval(),
            mentions_interval_secs: default_mentions_interval(),
            alerts_interval_secs: default_alerts_interval(),
            mentions_limit: default_mentions_limit(),
            log_dir: default_log_dir(),
            log_format: LogFormat::default(),
        }
    }
}

impl DashboardConfig {
    /// Load from an explicit TOML file. Missing keys fall back to defaults.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading dashboard config from {}", path.display()))?;
        let cfg: DashboardConfig = toml::from_str(&content)
            .with_context(|| format!("parsing dashboard config {}", path.display()))?;
        Ok(cfg.sanitized())
    }

    /// Env var + fallbacks, then env overrides.
    pub fn load_default() -> Result<Self> {
        let mut cfg = if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
            }
            Self::load_from_file(&pb)?
        } else {
            let default_path = PathBuf::from(DEFAULT_CONFIG_PATH);
            if default_path.exists() {
                Self::load_from_file(&default_path)?
            } else {
                Self::default()
            }
        };

        if let Ok(loc) = std::env::var(ENV_LOCATION) {
            if !loc.trim().is_empty() {
                cfg.location = loc.trim().to_string();
            }
        }
        if let Ok(dir) = std::env::var(ENV_LOG_DIR) {
            if !dir.trim().is_empty() {
                cfg.log_dir = dir.trim().to_string();
            }
        }
        Ok(cfg)
    }

    /// Zero intervals or a zero limit would stall or empty the views; reset them.
    fn sanitized(mut self) -> Self {
        if self.dashboard_interval_secs == 0 {
            self.dashboard_interval_secs = default_dashboard_interval();
        }
        if self.mentions_interval_secs == 0 {
            self.mentions_interval_secs = default_mentions_interval();
        }
        if self.alerts_interval_secs == 0 {
            self.alerts_interval_secs = default_alerts_interval();
        }
        if self.mentions_limit == 0 {
            self.mentions_limit = default_mentions_limit();
        }
        self
    }

    /// Resolve the API base and WebSocket origin from `location`.
    pub fn endpoints(&self) -> Result<Endpoints> {
        let loc = PageLocation::parse(&self.location)?;
        Ok(Endpoints::resolve(&loc, &self.api_prefix, &self.ws_prefix))
    }

    pub fn refresh(&self) -> RefreshIntervals {
        RefreshIntervals {
            dashboard: Duration::from_secs(self.dashboard_interval_secs),
            mentions: Duration::from_secs(self.mentions_interval_secs),
            alerts: Duration::from_secs(self.alerts_interval_secs),
        }
    }
}

/// Per-view polling cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshIntervals {
    pub dashboard: Duration,
    pub mentions: Duration,
    pub alerts: Duration,
}

impl Default for RefreshIntervals {
    fn default() -> Self {
        DashboardConfig::default().refresh()
    }
}
