//! Configuration management for the GLB transfer client
//!
//! Handles loading, validating, and persisting the server URL and request
//! timeout. Command-line flags and the environment override the file.

use crate::client::ClientConfig;
use crate::error::{Result, TransferError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub mod defaults;

pub use defaults::*;

/// Persisted client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// GLB file server URL
    #[serde(default = "defaults::default_server_url")]
    pub server_url: String,

    /// Request timeout in seconds, covering connection and transfer
    #[serde(default = "defaults::default_timeout")]
    pub timeout_secs: u64,
}

impl Config {
    /// Load configuration from the default location
    ///
    /// A missing file is not an error; defaults are used instead.
    ///
    /// # Errors
    ///
    /// [`TransferError::ConfigRead`] or [`TransferError::InvalidConfig`] if
    /// the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load configuration from a specific path
    ///
    /// # Errors
    ///
    /// [`TransferError::ConfigRead`] if the file cannot be read,
    /// [`TransferError::InvalidConfig`] if it is not valid TOML.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| TransferError::ConfigRead {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        toml::from_str(&contents).map_err(|e| TransferError::InvalidConfig(e.to_string()))
    }

    /// Save configuration to a specific path
    ///
    /// # Errors
    ///
    /// [`TransferError::ConfigWrite`] if the directory or file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| TransferError::ConfigWrite {
                path: parent.to_path_buf(),
                reason: e.to_string(),
            })?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| TransferError::InvalidConfig(e.to_string()))?;

        fs::write(path, contents).map_err(|e| TransferError::ConfigWrite {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Get the path to the config file
    ///
    /// # Errors
    ///
    /// [`TransferError::Internal`] if neither `XDG_CONFIG_HOME` nor a home
    /// directory is available.
    pub fn config_path() -> Result<PathBuf> {
        let config_home = std::env::var("XDG_CONFIG_HOME")
            .ok()
            .filter(|path| !path.is_empty())
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")));

        config_home
            .ok_or_else(|| {
                TransferError::Internal(
                    "Could not determine config directory: XDG_CONFIG_HOME not set and no home directory found"
                        .to_string(),
                )
            })
            .map(|path| path.join("glb-transfer").join("config.toml"))
    }

    /// Apply command-line or environment overrides
    pub fn apply_overrides(&mut self, server_url: Option<String>, timeout_secs: Option<u64>) {
        if let Some(url) = server_url {
            self.server_url = url;
        }
        if let Some(secs) = timeout_secs {
            self.timeout_secs = secs;
        }
    }

    /// Connection settings for [`crate::TransferClient::new`]
    #[must_use]
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(
            self.server_url.clone(),
            Duration::from_secs(self.timeout_secs),
        )
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// [`TransferError::InvalidConfig`] for an unusable URL or a zero timeout.
    pub fn validate(&self) -> Result<()> {
        self.client_config().validate()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            timeout_secs: default_timeout(),
        }
    }
}
