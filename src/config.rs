use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_connectivity_check_secs")]
    pub connectivity_check_secs: u64,
}

fn default_page_size() -> usize {
    25
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_connectivity_check_secs() -> u64 {
    5
}

impl Config {
    pub fn from_yaml(text: &str) -> Result<Self> {
        let mut config: Config = serde_yaml::from_str(text).context("Failed to parse config")?;
        if config.page_size == 0 {
            anyhow::bail!("page_size must be greater than 0");
        }
        config.base_url = config.base_url.trim_end_matches('/').to_string();
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_yaml(&text)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connectivity_check_interval(&self) -> Duration {
        Duration::from_secs(self.connectivity_check_secs.max(1))
    }
}

/// Determine the config file path with fallback logic
pub fn get_config_path(cli_path: Option<String>) -> Result<PathBuf> {
    if let Some(path) = cli_path {
        let path_buf = PathBuf::from(&path);
        if path_buf.exists() {
            return Ok(path_buf);
        } else {
            anyhow::bail!("Config file not found at specified path: {}", path);
        }
    }

    // Try ~/.config/libris/config.yaml
    if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join("libris").join("config.yaml");
        if config_path.exists() {
            return Ok(config_path);
        }
    }

    // Fallback to ./config.yaml
    let local_config = PathBuf::from("config.yaml");
    if local_config.exists() {
        return Ok(local_config);
    }

    let expected_path = if let Some(config_dir) = dirs::config_dir() {
        config_dir
            .join("libris")
            .join("config.yaml")
            .display()
            .to_string()
    } else {
        "~/.config/libris/config.yaml".to_string()
    };

    anyhow::bail!(
        "Config file not found. Expected locations:\n\
         1. {}\n\
         2. ./config.yaml (fallback)\n\
         \n\
         Use --config <path> to specify a custom location.",
        expected_path
    )
}
