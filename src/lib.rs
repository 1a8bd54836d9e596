//! Shelfscan: camera acquisition and barcode-scan session management for
//! Tauri inventory applications.
//!
//! The crate owns the one genuinely stateful part of a form-based inventory
//! tracker: enumerating capture devices, acquiring and releasing the live
//! camera stream, driving an external barcode decoder in lockstep with that
//! stream, and guaranteeing cleanup on every exit path. Form rendering and
//! inventory persistence stay in the host application; decoded barcodes are
//! handed to a result sink the host wires into its form.
//!
//! # Features
//! - Device enumeration with a documented back-camera selection policy
//! - Exclusive stream ownership with a hard release guarantee
//! - Pluggable decoder engines behind a start/stop/on-detect capability
//! - A scan session state machine safe against double-open, cancel-during-
//!   open, and late detection deliveries
//!
//! # Usage
//! Add this to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! shelfscan = "0.6"
//! tauri = { version = "2.0", features = ["protocol-asset"] }
//! ```
//!
//! Then in your Tauri app:
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! fn main() {
//!     shelfscan::register_engine(Arc::new(MyDecoderEngine::new()));
//!     tauri::Builder::default()
//!         .plugin(shelfscan::init())
//!         .run(tauri::generate_context!())
//!         .expect("error while running tauri application");
//! }
//! ```
pub mod catalog;
pub mod commands;
pub mod config;
pub mod engine;
pub mod errors;
pub mod permissions;
pub mod platform;
pub mod session;
pub mod sink;
pub mod stream;

// Testing utilities - deterministic fakes for offline testing
pub mod testing;

pub mod types;

// Re-exports for convenience
pub use catalog::{selection_plan, DeviceCatalog, StreamTarget};
pub use commands::scanner::register_engine;
pub use config::ShelfscanConfig;
pub use engine::{EngineAdapter, ScanEngine};
pub use errors::ScanError;
pub use permissions::{ConsentDecision, ConsentGate, ConsentPrompt, PermissionStatus};
pub use session::{NullObserver, ScanSession, SessionObserver, SessionState};
pub use sink::{FieldSink, ResultSink};
pub use stream::{MediaStream, MediaTrack, StreamHandle, StreamSource};
pub use types::{
    CaptureDevice, DecoderConfig, DetectionResult, Facing, ResolutionProfile, Symbology,
};

use tauri::{
    plugin::{Builder, TauriPlugin},
    Runtime,
};

/// Initialize the shelfscan plugin with all commands
pub fn init<R: Runtime>() -> TauriPlugin<R> {
    Builder::new("shelfscan")
        .invoke_handler(tauri::generate_handler![
            // Scanner session commands
            commands::scanner::open_scanner,
            commands::scanner::close_scanner,
            commands::scanner::get_scanner_state,
            commands::scanner::poll_scan_result,
            commands::scanner::get_active_device,
            // Device commands
            commands::devices::list_capture_devices,
            commands::devices::check_device_availability,
            // Permission commands
            commands::permissions::check_scanner_permission,
            commands::permissions::record_consent,
            commands::permissions::get_permission_status_string,
            // Configuration commands
            commands::config::get_config,
            commands::config::update_config,
            commands::config::reset_config,
            commands::config::get_decoder_config,
            commands::config::update_decoder_config,
        ])
        .build()
}

/// Initialize logging for the scanner
pub fn init_logging() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "shelfscan=info");
    }
    let _ = env_logger::try_init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Get crate information
pub fn get_info() -> CrateInfo {
    CrateInfo {
        name: NAME.to_string(),
        version: VERSION.to_string(),
        description: DESCRIPTION.to_string(),
    }
}

/// Crate information structure
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CrateInfo {
    pub name: String,
    pub version: String,
    pub description: String,
}
