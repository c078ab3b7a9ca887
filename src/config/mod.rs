//
//  moysklad-cli
//  config/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration Module
//!
//! This module provides configuration management for the `msk` CLI. Settings
//! live in a TOML file in a platform-specific directory.
//!
//! ## Configuration File Location
//!
//! - **Linux**: `~/.config/msk/config.toml`
//! - **macOS**: `~/Library/Application Support/msk/config.toml`
//! - **Windows**: `C:\Users\<User>\AppData\Roaming\msk\config\config.toml`
//!
//! Setting `MSK_CONFIG_DIR` replaces the directory, which is how the test
//! suite keeps away from the real file.
//!
//! ## Example Configuration File
//!
//! ```toml
//! [core]
//! host = "api.moysklad.ru"
//! timeout = 30
//! output = "table"
//!
//! [hosts."api.moysklad.ru"]
//! host = "api.moysklad.ru"
//! login = "admin@shop"
//! api_version = "1.2"
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use moysklad::config::Config;
//!
//! let mut config = Config::load()?;
//! if let Some(timeout) = config.get("timeout") {
//!     println!("Timeout: {}s", timeout);
//! }
//!
//! config.set("output", "json".to_string())?;
//! config.save()?;
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Submodules
//!
//! - [`file`]: Low-level configuration file I/O operations
//! - [`hosts`]: Host normalization and API URL construction

mod file;
mod hosts;

pub use file::*;
pub use hosts::*;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Environment variable overriding the configuration directory.
pub const CONFIG_DIR_ENV: &str = "MSK_CONFIG_DIR";

/// Keys accepted by [`Config::get`] and [`Config::set`].
pub const CONFIG_KEYS: &[&str] = &["host", "timeout", "output"];

/// Global configuration container.
///
/// # Notes
///
/// - All fields use `#[serde(default)]` so partial files load cleanly
/// - The file is created on first save
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Core CLI configuration options.
    #[serde(default)]
    pub core: CoreConfig,

    /// Host-specific configuration, keyed by normalized host.
    #[serde(default)]
    pub hosts: BTreeMap<String, HostConfig>,
}

/// Core configuration options.
///
/// # Default Values
///
/// | Field | Default |
/// |-------|---------|
/// | `host` | `None` (uses [`DEFAULT_HOST`]) |
/// | `timeout` | `None` (no client-wide timeout) |
/// | `output` | `"table"` |
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Default API host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// Client-wide request timeout, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    /// Default output format: `table` or `json`.
    #[serde(default = "default_output")]
    pub output: String,
}

fn default_output() -> String {
    "table".to_string()
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            host: None,
            timeout: None,
            output: default_output(),
        }
    }
}

/// Per-host settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HostConfig {
    /// The host, as given to `--host` (normalized).
    #[serde(default)]
    pub host: String,

    /// Login used for Basic credentials on this host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,

    /// API version; [`DEFAULT_API_VERSION`] when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
}

impl HostConfig {
    /// A configuration for `host` with defaults for everything else.
    pub fn new(host: &str) -> Self {
        Self {
            host: normalize_host(host),
            ..Default::default()
        }
    }

    /// Root URL of the JSON API on this host.
    ///
    /// ```rust
    /// use moysklad::config::HostConfig;
    ///
    /// let config = HostConfig::new("api.moysklad.ru");
    /// assert_eq!(config.base_url(), "https://api.moysklad.ru/api/remap/1.2");
    /// ```
    pub fn base_url(&self) -> String {
        let host = if self.host.is_empty() {
            DEFAULT_HOST
        } else {
            &self.host
        };
        api_base_url(
            host,
            self.api_version.as_deref().unwrap_or(DEFAULT_API_VERSION),
        )
    }
}

impl Config {
    /// Loads the configuration from [`Config::config_path`], or defaults if
    /// the file does not exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Loads the configuration from `path`, or defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !config_exists(path) {
            return Ok(Self::default());
        }
        let content = read_config_file(path)?;
        toml::from_str(&content).with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Saves the configuration to [`Config::config_path`].
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Saves the configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        write_config_file(path, &content)
    }

    /// Path of the configuration file.
    pub fn config_path() -> Result<PathBuf> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|d| !d.is_empty()) {
            return Ok(PathBuf::from(dir).join("config.toml"));
        }
        let dirs = ProjectDirs::from("", "", crate::APP_NAME)
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// The host to talk to: `explicit` if given, then `core.host`, then
    /// [`DEFAULT_HOST`]. Always normalized.
    pub fn active_host(&self, explicit: Option<&str>) -> String {
        let host = explicit
            .filter(|h| !h.trim().is_empty())
            .or(self.core.host.as_deref())
            .unwrap_or(DEFAULT_HOST);
        normalize_host(host)
    }

    /// Settings of `host`, if configured.
    pub fn host_config(&self, host: &str) -> Option<&HostConfig> {
        self.hosts.get(&normalize_host(host))
    }

    /// Settings of `host`, falling back to defaults.
    pub fn host_config_or_default(&self, host: &str) -> HostConfig {
        self.host_config(host)
            .cloned()
            .unwrap_or_else(|| HostConfig::new(host))
    }

    /// Stores `config` under its normalized host.
    pub fn upsert_host(&mut self, config: HostConfig) {
        let key = normalize_host(&config.host);
        self.hosts.insert(
            key.clone(),
            HostConfig {
                host: key,
                ..config
            },
        );
    }

    /// Client-wide timeout, if configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.core.timeout.map(Duration::from_secs)
    }

    /// Returns a core setting by key.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "host" => self.core.host.clone(),
            "timeout" => self.core.timeout.map(|t| t.to_string()),
            "output" => Some(self.core.output.clone()),
            _ => None,
        }
    }

    /// Sets a core setting by key.
    ///
    /// Returns `Ok(false)` for unknown keys and an error for invalid values.
    pub fn set(&mut self, key: &str, value: String) -> Result<bool> {
        match key {
            "host" => {
                self.core.host = Some(normalize_host(&value));
            }
            "timeout" => {
                let seconds: u64 = value
                    .trim()
                    .parse()
                    .with_context(|| format!("Invalid timeout '{}': expected seconds", value))?;
                self.core.timeout = Some(seconds);
            }
            "output" => {
                if value != "table" && value != "json" {
                    anyhow::bail!("Invalid output '{}': expected 'table' or 'json'", value);
                }
                self.core.output = value;
            }
            _ => return Ok(false),
        }
        Ok(true)
    }
}
