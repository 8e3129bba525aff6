//! Configuration management for fastfs.
//!
//! This module provides configuration loading, saving, and defaults.
//! Configuration is stored in TOML format in a platform-appropriate location.

use crate::backend::RetrieveMode;
use crate::error::{FastFsError, Result};
use crate::types::VolumeKey;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Main configuration structure for fastfs.
///
/// ## Example Configuration File (fastfs.toml)
///
/// ```toml
/// [general]
/// log_level = "info"
///
/// [scan]
/// enabled = true
/// retrieve_mode = "standard_information"
/// formats = ["NTFS"]
///
/// [volumes]
/// include = []
/// exclude = ["E:"]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Volume scanning
    pub scan: ScanConfig,

    /// Volumes to index (empty = all eligible volumes)
    pub volumes: VolumesConfig,
}

/// General configuration options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            log_level: "info".to_string(),
        }
    }
}

/// Scan configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Build the index at all; when false every query goes to the OS
    pub enabled: bool,

    /// Metadata detail requested from the scanner
    pub retrieve_mode: RetrieveMode,

    /// Filesystem formats the scanner can read (compared case-insensitively)
    pub formats: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            enabled: true,
            retrieve_mode: RetrieveMode::StandardInformation,
            formats: vec!["NTFS".to_string()],
        }
    }
}

/// Volume selection configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct VolumesConfig {
    /// Specific volumes to index (empty = all eligible volumes)
    pub include: Vec<String>,

    /// Volumes to exclude
    pub exclude: Vec<String>,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default config if no config file exists.
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Config::default());
        }

        info!(path = %path.display(), "Loading configuration");
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents).map_err(|e| FastFsError::ConfigError {
            reason: format!("Failed to parse config: {}", e),
        })?;

        Ok(config)
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path()?;
        self.save_to(&config_path)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        info!(path = %path.display(), "Saving configuration");
        let contents = toml::to_string_pretty(self).map_err(|e| FastFsError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
        })?;

        fs::write(path, contents)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", "fastfs").ok_or_else(|| FastFsError::ConfigError {
            reason: "Could not determine config directory".to_string(),
        })?;

        Ok(dirs.config_dir().join("fastfs.toml"))
    }

    /// Check if a volume should be indexed.
    ///
    /// Entries may be written as `C`, `C:` or `C:\`.
    pub fn should_index_volume(&self, mount_point: &str) -> bool {
        let key = VolumeKey::new(mount_point);
        let listed = |entries: &[String]| entries.iter().any(|v| VolumeKey::new(v) == key);

        // If explicit includes are specified, check them
        if !self.volumes.include.is_empty() {
            return listed(&self.volumes.include);
        }

        !listed(&self.volumes.exclude)
    }

    /// Check if the scanner should be used for a filesystem format.
    pub fn accepts_format(&self, filesystem: &str) -> bool {
        self.scan
            .formats
            .iter()
            .any(|f| f.eq_ignore_ascii_case(filesystem))
    }
}
