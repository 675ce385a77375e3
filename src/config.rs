//! Persistent gres configuration.
//!
//! Defaults for the CLI live in `<config_dir>/gres/config.toml`. The
//! `GRES_CONFIG` environment variable points at an alternative file.

use crate::error::{Error, Result};
use gres_pack::{ExtractPolicy, ZSTD_LEVEL};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Application name for config file storage.
const APP_NAME: &str = "gres";

/// Config file name inside the application directory.
const CONFIG_FILE: &str = "config.toml";

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "GRES_CONFIG";

/// Valid zstd compression levels.
const LEVEL_RANGE: std::ops::RangeInclusive<i32> = 1..=22;

/// Global gres configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GresConfig {
    /// Configuration format version.
    pub version: u8,

    /// Policy used by `extract` when `--policy` is not given.
    pub default_policy: ExtractPolicy,

    /// zstd level used by `pack` when `--level` is not given.
    pub compression_level: i32,

    /// Path substrings always excluded on extraction.
    pub exclude: Vec<String>,
}

impl Default for GresConfig {
    fn default() -> Self {
        Self {
            version: 1,
            default_policy: ExtractPolicy::NoOverwrite,
            compression_level: ZSTD_LEVEL,
            exclude: Vec::new(),
        }
    }
}

impl GresConfig {
    /// Location of the configuration file.
    pub fn path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Ok(PathBuf::from(path));
        }
        let base = dirs::config_dir()
            .ok_or_else(|| Error::ConfigLoad("no config directory".to_string()))?;
        Ok(base.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Load configuration from disk.
    ///
    /// If the configuration file doesn't exist, returns the default configuration.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let text = fs::read_to_string(path)
            .map_err(|e| Error::ConfigLoad(format!("{}: {}", path.display(), e)))?;
        let config: Self = toml::from_str(&text)
            .map_err(|e| Error::ConfigLoad(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Save configuration to a specific file.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::ConfigSave(e.to_string()))?;
        }
        let text = toml::to_string_pretty(self).map_err(|e| Error::ConfigSave(e.to_string()))?;
        fs::write(path, text).map_err(|e| Error::ConfigSave(format!("{}: {}", path.display(), e)))
    }

    /// Check values that the type system cannot.
    pub fn validate(&self) -> Result<()> {
        if !LEVEL_RANGE.contains(&self.compression_level) {
            return Err(Error::config(format!(
                "compression_level must be between {} and {}, got {}",
                LEVEL_RANGE.start(),
                LEVEL_RANGE.end(),
                self.compression_level
            )));
        }
        Ok(())
    }
}
