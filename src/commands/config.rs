use crate::config::ShelfscanConfig;
use std::sync::{Arc, RwLock};
use tauri::command;

lazy_static::lazy_static! {
    static ref GLOBAL_CONFIG: Arc<RwLock<ShelfscanConfig>> = Arc::new(RwLock::new(ShelfscanConfig::load_or_default()));
}

/// Snapshot of the active configuration for other command modules.
pub(crate) fn current_config() -> Result<ShelfscanConfig, String> {
    let config = GLOBAL_CONFIG.read().map_err(|e| e.to_string())?;
    Ok(config.clone())
}

/// Get the current configuration
#[command]
pub async fn get_config() -> Result<ShelfscanConfig, String> {
    current_config()
}

/// Update configuration
#[command]
pub async fn update_config(new_config: ShelfscanConfig) -> Result<(), String> {
    // Validate first
    new_config.validate()?;

    {
        let mut config = GLOBAL_CONFIG.write().map_err(|e| e.to_string())?;
        *config = new_config.clone();
    }

    // Save to file
    new_config
        .save_to_file(ShelfscanConfig::default_path())
        .map_err(|e| e.to_string())?;

    Ok(())
}

/// Reset configuration to defaults
#[command]
pub async fn reset_config() -> Result<ShelfscanConfig, String> {
    let default_config = ShelfscanConfig::default();

    {
        let mut config = GLOBAL_CONFIG
            .write()
            .map_err(|e| format!("Failed to write config: {}", e))?;
        *config = default_config.clone();
    }

    // Save defaults to file
    default_config
        .save_to_file(ShelfscanConfig::default_path())
        .map_err(|e| e.to_string())?;

    Ok(default_config)
}

/// Get decoder configuration
#[command]
pub async fn get_decoder_config() -> Result<crate::types::DecoderConfig, String> {
    let config = GLOBAL_CONFIG.read().map_err(|e| e.to_string())?;
    Ok(config.decoder.clone())
}

/// Update decoder configuration
#[command]
pub async fn update_decoder_config(
    decoder_config: crate::types::DecoderConfig,
) -> Result<(), String> {
    let mut config = GLOBAL_CONFIG.write().map_err(|e| e.to_string())?;
    config.decoder = decoder_config;

    config.validate()?;

    config
        .save_to_file(ShelfscanConfig::default_path())
        .map_err(|e| e.to_string())?;

    Ok(())
}
