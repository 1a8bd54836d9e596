//! Configuration management for shelfscan
//!
//! Provides configuration loading, saving, and management for decoder
//! settings and the consent gate.

use crate::errors::ScanError;
use crate::types::DecoderConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShelfscanConfig {
    pub decoder: DecoderConfig,
    pub permissions: PermissionConfig,
}

/// Consent gate configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionConfig {
    /// Require the two-button consent dialog before the first scanner open
    pub require_consent: bool,
}

impl Default for ShelfscanConfig {
    fn default() -> Self {
        Self {
            decoder: DecoderConfig::default(),
            permissions: PermissionConfig {
                require_consent: false,
            },
        }
    }
}

impl ShelfscanConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ScanError> {
        let path = path.as_ref();

        if !path.exists() {
            log::info!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| ScanError::ConfigError(format!("Failed to read config file: {}", e)))?;

        let config: ShelfscanConfig = toml::from_str(&contents)
            .map_err(|e| ScanError::ConfigError(format!("Failed to parse config file: {}", e)))?;

        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ScanError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ScanError::ConfigError(format!("Failed to create config directory: {}", e))
            })?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ScanError::ConfigError(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, toml_string)
            .map_err(|e| ScanError::ConfigError(format!("Failed to write config file: {}", e)))?;

        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Get default config file path
    pub fn default_path() -> PathBuf {
        PathBuf::from("shelfscan.toml")
    }

    /// Load from default location or create with defaults
    pub fn load_or_default() -> Self {
        Self::load_from_file(Self::default_path()).unwrap_or_else(|e| {
            log::warn!("Failed to load config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.decoder.symbologies.is_empty() {
            return Err("At least one symbology must be enabled".to_string());
        }

        let mut seen = Vec::new();
        for symbology in &self.decoder.symbologies {
            if seen.contains(symbology) {
                return Err(format!("Duplicate symbology: {:?}", symbology));
            }
            seen.push(*symbology);
        }

        Ok(())
    }
}
