//! TaskPlanner configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main TaskPlanner configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Planning service location
    pub service: ServiceConfig,

    /// Terminal UI settings
    pub tui: TuiConfig,
}

impl Config {
    /// Validate configuration before use
    ///
    /// Call this early in startup to fail fast with clear error messages.
    pub fn validate(&self) -> Result<()> {
        let url = reqwest::Url::parse(&self.service.base_url)
            .context(format!("Invalid service base-url: {}", self.service.base_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(eyre::eyre!(
                "Service base-url must use http or https, got {}",
                url.scheme()
            ));
        }
        for (name, path) in [
            ("plan-path", &self.service.plan_path),
            ("health-path", &self.service.health_path),
        ] {
            if !path.starts_with('/') {
                return Err(eyre::eyre!("Service {} must start with '/', got {:?}", name, path));
            }
        }
        if self.tui.tick_rate_ms == 0 {
            return Err(eyre::eyre!("tui tick-rate-ms must be greater than zero"));
        }
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .taskplanner.yml
        let local_config = PathBuf::from(".taskplanner.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/taskplanner/taskplanner.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("taskplanner").join("taskplanner.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Replace the service base URL (from `--url`)
    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        if let Some(url) = base_url {
            self.service.base_url = url;
        }
        self
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Planning service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Scheme, host and port of the service
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Path of the planning endpoint
    #[serde(rename = "plan-path")]
    pub plan_path: String,

    /// Path of the health probe
    #[serde(rename = "health-path")]
    pub health_path: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            plan_path: "/api/plan-tasks".to_string(),
            health_path: "/".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Full URL of the planning endpoint
    pub fn plan_url(&self) -> String {
        join_url(&self.base_url, &self.plan_path)
    }

    /// Full URL of the health probe
    pub fn health_url(&self) -> String {
        join_url(&self.base_url, &self.health_path)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

/// Terminal UI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TuiConfig {
    /// Event poll / redraw interval in milliseconds
    #[serde(rename = "tick-rate-ms")]
    pub tick_rate_ms: u64,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self { tick_rate_ms: 100 }
    }
}
