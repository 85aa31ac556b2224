// SPDX-License-Identifier: MPL-2.0

//! User configuration, persisted as JSON in the platform config directory.

use crate::engine::classify::ChannelColors;
use crate::engine::units::Unit;
use crate::error::ConfigError;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE_NAME: &str = "config.json";

/// Refresh intervals offered to the user, in seconds.
pub const REFRESH_INTERVALS: [u64; 7] = [1, 2, 5, 10, 15, 30, 60];

pub const DEFAULT_REFRESH_SECS: u64 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub use_celsius: bool,
    pub refresh_interval_secs: u64,
    pub cpu: ChannelColors,
    pub gpu: ChannelColors,
    /// Directory receiving `temp.log` and `summary.log`.
    pub log_dir: PathBuf,
    /// Name of the GPU to monitor; `None` picks one at startup.
    pub selected_gpu: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            use_celsius: true,
            refresh_interval_secs: DEFAULT_REFRESH_SECS,
            cpu: ChannelColors::default(),
            gpu: ChannelColors::default(),
            log_dir: PathBuf::from("."),
            selected_gpu: None,
        }
    }
}

impl Config {
    pub fn unit(&self) -> Unit {
        Unit::from_celsius_flag(self.use_celsius)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    /// Replace values the engine cannot use with defaults.
    ///
    /// Colors are not touched here; they fall back at classification time.
    pub fn sanitize(&mut self) {
        if !REFRESH_INTERVALS.contains(&self.refresh_interval_secs) {
            log::warn!(
                "refresh interval {}s not supported, using {}s",
                self.refresh_interval_secs,
                DEFAULT_REFRESH_SECS
            );
            self.refresh_interval_secs = DEFAULT_REFRESH_SECS;
        }
    }
}

/// Loads and saves [`Config`] at a fixed path.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Store at `<config dir>/tray-temperature/config.json`.
    pub fn new() -> Result<Self, ConfigError> {
        let dirs = ProjectDirs::from("", "", "tray-temperature").ok_or(ConfigError::NoConfigDir)?;
        Ok(Self::with_path(dirs.config_dir().join(CONFIG_FILE_NAME)))
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the config, writing defaults on first run.
    ///
    /// Never fails: unreadable or malformed files are logged and replaced by
    /// defaults in memory (the file itself is left alone for the user to fix).
    pub fn load(&self) -> Config {
        if !self.path.exists() {
            let config = Config::default();
            match self.save(&config) {
                Ok(()) => log::info!("created default config at {}", self.path.display()),
                Err(e) => log::warn!("could not write default config: {}", e),
            }
            return config;
        }

        let mut config = match self.read() {
            Ok(config) => config,
            Err(e) => {
                log::error!("invalid config {}: {}; using defaults", self.path.display(), e);
                Config::default()
            }
        };
        config.sanitize();
        config
    }

    fn read(&self) -> Result<Config, ConfigError> {
        let text = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(config)?)?;
        Ok(())
    }
}
