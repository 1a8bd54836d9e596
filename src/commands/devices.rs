use crate::catalog::DeviceCatalog;
use crate::platform::PlatformCatalog;
use crate::types::CaptureDevice;
use tauri::command;

/// Get list of available capture devices on the current platform
#[command]
pub async fn list_capture_devices() -> Result<Vec<CaptureDevice>, String> {
    match PlatformCatalog.list_devices().await {
        Ok(devices) => {
            log::info!("Found {} capture devices", devices.len());
            for device in &devices {
                log::debug!(
                    "Device: {} - {} (facing: {})",
                    device.id,
                    device.label,
                    device.facing
                );
            }
            Ok(devices)
        }
        Err(e) => {
            log::error!("Failed to list capture devices: {}", e);
            Err(format!("Failed to list capture devices: {}", e))
        }
    }
}

/// Check if a specific capture device is present
#[command]
pub async fn check_device_availability(device_id: String) -> Result<bool, String> {
    match PlatformCatalog.list_devices().await {
        Ok(devices) => {
            let available = devices.iter().any(|d| d.id == device_id);
            log::debug!("Device {} availability: {}", device_id, available);
            Ok(available)
        }
        Err(e) => {
            log::error!("Failed to check device availability: {}", e);
            Err(format!("Failed to check device availability: {}", e))
        }
    }
}
