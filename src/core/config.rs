use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::core::constants::{
    DEFAULT_LISTEN_PORT, DEFAULT_PROXY_URL, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_REVEAL_INTERVAL_MS,
};

/// Optional settings loaded from `config.toml` in the platform config
/// directory. Every field has a default, so a missing file is a valid
/// configuration. The upstream model endpoint is deliberately not
/// configurable here.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Config {
    /// Base URL of the proxy the chat client talks to.
    pub proxy_url: Option<String>,
    /// Port `mason serve` binds to.
    pub listen_port: Option<u16>,
    /// Deadline for a single generate round-trip, in seconds.
    pub request_timeout_secs: Option<u64>,
    /// Tick period of the reveal animation, in milliseconds.
    pub reveal_interval_ms: Option<u64>,
}

impl Config {
    pub fn load() -> Result<Config, Box<dyn std::error::Error>> {
        let config_path = Self::get_config_path();
        Self::load_from_path(&config_path)
    }

    pub fn load_from_path(config_path: &PathBuf) -> Result<Config, Box<dyn std::error::Error>> {
        if config_path.exists() {
            let contents = fs::read_to_string(config_path)?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let config_path = Self::get_config_path();
        self.save_to_path(&config_path)
    }

    pub fn save_to_path(&self, config_path: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        fs::write(config_path, contents)?;
        Ok(())
    }

    fn get_config_path() -> PathBuf {
        let proj_dirs = ProjectDirs::from("org", "permacommons", "mason")
            .expect("Failed to determine config directory");
        proj_dirs.config_dir().join("config.toml")
    }

    pub fn proxy_url(&self) -> &str {
        self.proxy_url.as_deref().unwrap_or(DEFAULT_PROXY_URL)
    }

    pub fn listen_port(&self) -> u16 {
        self.listen_port.unwrap_or(DEFAULT_LISTEN_PORT)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    pub fn reveal_interval(&self) -> Duration {
        Duration::from_millis(
            self.reveal_interval_ms
                .unwrap_or(DEFAULT_REVEAL_INTERVAL_MS),
        )
    }
}
