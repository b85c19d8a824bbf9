//! Configuration management for the HopCache client
//!
//! The service host is always an explicit construction parameter of the
//! client; nothing here is process-global. The CLI layers a TOML config
//! file and command-line flags on top of these defaults.

use crate::error::{ClientError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub mod defaults;

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the HopCache service
    #[serde(default = "defaults::default_host")]
    pub host: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::default_timeout")]
    pub timeout_secs: u64,

    /// Connect timeout in seconds
    #[serde(default = "defaults::default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,
}

impl Config {
    /// Load configuration from the default location, falling back to
    /// defaults when no config file exists
    ///
    /// Looks for `$XDG_CONFIG_HOME/hopcache/config.toml`, then
    /// `~/.config/hopcache/config.toml`.
    pub fn load_or_default() -> Self {
        match Self::config_path() {
            Ok(path) if path.exists() => Self::load_from(&path).unwrap_or_default(),
            _ => Self::default(),
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|err| ClientError::ConfigRead {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;

        toml::from_str(&contents).map_err(|err| ClientError::InvalidConfig(err.to_string()))
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        self.save_to(&path)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| ClientError::ConfigWrite {
                path: parent.to_path_buf(),
                reason: err.to_string(),
            })?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|err| ClientError::Encode(err.to_string()))?;

        fs::write(path, contents).map_err(|err| ClientError::ConfigWrite {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })
    }

    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let config_home = std::env::var("XDG_CONFIG_HOME")
            .ok()
            .and_then(|path| if path.is_empty() { None } else { Some(path) })
            .or_else(|| {
                dirs::home_dir().map(|home| home.join(".config").to_string_lossy().to_string())
            });

        config_home
            .ok_or_else(|| {
                ClientError::Internal(
                    "Could not determine config directory: XDG_CONFIG_HOME not set and no home directory found"
                        .to_string(),
                )
            })
            .map(|path| PathBuf::from(path).join("hopcache").join("config.toml"))
    }

    /// Merge another config into this one, with other taking precedence
    pub fn merge(&mut self, other: &Self) {
        if other.host != defaults::default_host() {
            self.host.clone_from(&other.host);
        }
        if other.timeout_secs != defaults::default_timeout() {
            self.timeout_secs = other.timeout_secs;
        }
        if other.connect_timeout_secs != defaults::default_connect_timeout() {
            self.connect_timeout_secs = other.connect_timeout_secs;
        }
        if other.verbose {
            self.verbose = true;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            return Err(ClientError::InvalidConfig(
                "host cannot be empty".to_string(),
            ));
        }

        if !self.host.starts_with("http://") && !self.host.starts_with("https://") {
            return Err(ClientError::InvalidConfig(format!(
                "host must be an http(s) URL, got '{}'",
                self.host
            )));
        }

        if self.timeout_secs == 0 {
            return Err(ClientError::InvalidConfig(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.connect_timeout_secs == 0 {
            return Err(ClientError::InvalidConfig(
                "connect_timeout_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: defaults::default_host(),
            timeout_secs: defaults::default_timeout(),
            connect_timeout_secs: defaults::default_connect_timeout(),
            verbose: false,
        }
    }
}
