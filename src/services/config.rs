//! User configuration (`~/.partnerdash/config.json`)
//!
//! Holds preferences only: where the default CSV pair lives, the delimiter,
//! and the color theme. Every field has a default, so a missing file or a
//! partial file is fine.

use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use serde::{Deserialize, Serialize};

use crate::types::{DashboardError, Result};

/// Theme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Auto,
    Dark,
    Light,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the default provider/services pair
    pub data_dir: PathBuf,
    pub providers_file: String,
    pub services_file: String,
    /// Use the default pair when both files exist
    pub use_defaults: bool,
    /// Single-byte field delimiter
    pub delimiter: char,
    pub theme: ThemeMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("/mnt/data"),
            providers_file: "provider.csv".to_string(),
            services_file: "services.csv".to_string(),
            use_defaults: true,
            delimiter: ',',
            theme: ThemeMode::Auto,
        }
    }
}

impl Config {
    /// Default config file location
    pub fn default_path() -> Option<PathBuf> {
        BaseDirs::new().map(|dirs| dirs.home_dir().join(".partnerdash").join("config.json"))
    }

    /// Load from the default location, falling back to defaults if absent
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load from a specific file; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| DashboardError::Config(format!("{}: {}", path.display(), e)))?;
        config.delimiter_byte()?;
        Ok(config)
    }

    pub fn default_providers_path(&self) -> PathBuf {
        self.data_dir.join(&self.providers_file)
    }

    pub fn default_services_path(&self) -> PathBuf {
        self.data_dir.join(&self.services_file)
    }

    /// Delimiter as the byte the csv reader expects
    pub fn delimiter_byte(&self) -> Result<u8> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| {
                DashboardError::Config(format!(
                    "delimiter must be a single ASCII character, got {:?}",
                    self.delimiter
                ))
            })
    }
}
