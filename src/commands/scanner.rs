use std::sync::{Arc, Mutex as SyncMutex};

use tauri::command;
use tokio::sync::RwLock;

use crate::config::ShelfscanConfig;
use crate::engine::ScanEngine;
use crate::permissions::PermissionStatus;
use crate::platform::{PlatformCatalog, PlatformStreamSource};
use crate::session::{NullObserver, ScanSession, SessionState};
use crate::sink::FieldSink;
use crate::types::CaptureDevice;

// One scanner session per application instance; the sink outlives session
// rebuilds so a decoded value survives until the form polls it.
lazy_static::lazy_static! {
    static ref SCAN_ENGINE: SyncMutex<Option<Arc<dyn ScanEngine>>> = SyncMutex::new(None);
    static ref SESSION: RwLock<Option<ScanSession>> = RwLock::new(None);
    static ref SCAN_SINK: Arc<FieldSink> = Arc::new(FieldSink::new());
}

/// Register the decoder engine scanner sessions will drive.
///
/// Host applications call this once, before invoking any scanner command.
/// Any library with a start/stop/on-detect surface can be adapted in.
pub fn register_engine(engine: Arc<dyn ScanEngine>) {
    *SCAN_ENGINE.lock().expect("lock poisoned") = Some(engine);
    log::info!("scan engine registered");
}

/// Get existing session or create one wired to the platform capabilities
async fn get_or_create_session(config: &ShelfscanConfig) -> Result<ScanSession, String> {
    {
        let session = SESSION.read().await;
        if let Some(session) = session.as_ref() {
            return Ok(session.clone());
        }
    }

    let mut slot = SESSION.write().await;

    // Double-check in case another task created it while we waited
    if let Some(session) = slot.as_ref() {
        return Ok(session.clone());
    }

    let engine = SCAN_ENGINE
        .lock()
        .expect("lock poisoned")
        .clone()
        .ok_or_else(|| "No scan engine registered".to_string())?;

    log::debug!("Creating scanner session");
    let session = ScanSession::new(
        Arc::new(PlatformCatalog),
        Arc::new(PlatformStreamSource::new(config.decoder.resolution_profile)),
        engine,
        SCAN_SINK.clone(),
        Arc::new(NullObserver),
        config.decoder.clone(),
    );
    *slot = Some(session.clone());
    Ok(session)
}

/// Open the barcode scanner
#[command]
pub async fn open_scanner() -> Result<SessionState, String> {
    log::info!("Opening barcode scanner");
    let config = super::config::current_config()?;

    if config.permissions.require_consent {
        match super::permissions::consent_status() {
            PermissionStatus::Granted => {}
            PermissionStatus::Denied => {
                log::info!("Scanner open ignored: camera consent denied");
                return Ok(SessionState::Closed);
            }
            PermissionStatus::NotDetermined => {
                return Err("Camera consent not granted".to_string());
            }
        }
    }

    let session = get_or_create_session(&config).await?;
    match session.open().await {
        Ok(()) => Ok(session.state()),
        Err(e) => {
            log::error!("Failed to open scanner: {}", e);
            Err(format!("Failed to open scanner: {}", e))
        }
    }
}

/// Close the barcode scanner
#[command]
pub async fn close_scanner() -> Result<String, String> {
    let session = SESSION.read().await;
    if let Some(session) = session.as_ref() {
        session.close().await;
        Ok("Scanner closed".to_string())
    } else {
        log::info!("Close requested but scanner was never opened");
        Ok("Scanner not open".to_string())
    }
}

/// Get the current scanner session state
#[command]
pub async fn get_scanner_state() -> Result<SessionState, String> {
    let session = SESSION.read().await;
    Ok(session
        .as_ref()
        .map(|s| s.state())
        .unwrap_or(SessionState::Closed))
}

/// Take the most recently decoded barcode, if one is pending.
///
/// The inventory form polls this after the scanner closes and fills its
/// barcode field with the returned value.
#[command]
pub async fn poll_scan_result() -> Result<Option<String>, String> {
    Ok(SCAN_SINK.take())
}

/// Device the live stream is open against, if the scanner is active
#[command]
pub async fn get_active_device() -> Result<Option<CaptureDevice>, String> {
    let session = SESSION.read().await;
    match session.as_ref() {
        Some(session) => Ok(session.current_device().await),
        None => Ok(None),
    }
}
