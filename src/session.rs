//! The scan session state machine.
//!
//! One session owns the stream handle and the engine binding for a complete
//! open-to-close lifecycle. All transitions funnel through here so every
//! exit path (manual close, successful scan, device error, permission
//! denial) releases the stream and stops the engine in the same order.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::catalog::{selection_plan, DeviceCatalog};
use crate::engine::{EngineAdapter, ScanEngine};
use crate::errors::ScanError;
use crate::sink::ResultSink;
use crate::stream::{StreamHandle, StreamSource};
use crate::types::{CaptureDevice, DecoderConfig, DetectionResult};

/// Lifecycle states of one scan session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Closed,
    Opening,
    Active,
    Closing,
}

/// Side-effecting observer for UI visibility.
///
/// Kept separate from the transition logic so the state machine stays
/// independently testable. Callbacks run outside the session's locks.
pub trait SessionObserver: Send + Sync {
    fn scanner_shown(&self) {}
    fn scanner_hidden(&self) {}
    fn scan_failed(&self, _error: &ScanError) {}
}

/// Observer that does nothing.
pub struct NullObserver;

impl SessionObserver for NullObserver {}

struct Inner {
    state: Mutex<SessionState>,
    close_requested: AtomicBool,
    epoch: AtomicU64,
    catalog: Arc<dyn DeviceCatalog>,
    source: Arc<dyn StreamSource>,
    engine: EngineAdapter,
    sink: Arc<dyn ResultSink>,
    observer: Arc<dyn SessionObserver>,
    stream: StreamHandle,
    config: DecoderConfig,
}

/// Owner of the scan lifecycle. Cheap to clone; clones share one session.
#[derive(Clone)]
pub struct ScanSession {
    inner: Arc<Inner>,
}

impl ScanSession {
    pub fn new(
        catalog: Arc<dyn DeviceCatalog>,
        source: Arc<dyn StreamSource>,
        engine: Arc<dyn ScanEngine>,
        sink: Arc<dyn ResultSink>,
        observer: Arc<dyn SessionObserver>,
        config: DecoderConfig,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(SessionState::Closed),
                close_requested: AtomicBool::new(false),
                epoch: AtomicU64::new(0),
                catalog,
                source,
                engine: EngineAdapter::new(engine),
                sink,
                observer,
                stream: StreamHandle::new(),
                config,
            }),
        }
    }

    pub fn state(&self) -> SessionState {
        *self.inner.state.lock().expect("lock poisoned")
    }

    /// Device the live stream was opened against, if the session holds one.
    pub async fn current_device(&self) -> Option<CaptureDevice> {
        self.inner.stream.device().await
    }

    /// Open the scanner: enumerate devices, acquire a stream through the
    /// fallback chain, then start the engine.
    ///
    /// A second open while the session is already opening or active is
    /// ignored. On any failure the session ends Closed with the stream
    /// released and the engine stopped.
    pub async fn open(&self) -> Result<(), ScanError> {
        {
            let mut state = self.inner.state.lock().expect("lock poisoned");
            if *state != SessionState::Closed {
                log::debug!("open ignored: session is {:?}", *state);
                return Ok(());
            }
            *state = SessionState::Opening;
        }
        self.inner.close_requested.store(false, Ordering::SeqCst);
        let epoch = self.inner.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.observer.scanner_shown();
        log::info!("scan session opening");

        match self.drive_open(epoch).await {
            Ok(true) => Ok(()),
            Ok(false) => {
                // Close arrived while the open was in flight.
                self.inner.observer.scanner_hidden();
                self.set_state(SessionState::Closed);
                log::info!("scan session closed before activation");
                Ok(())
            }
            Err(e) => {
                self.teardown().await;
                log::error!("scan session failed to open: {}", e);
                self.inner.observer.scan_failed(&e);
                self.inner.observer.scanner_hidden();
                self.set_state(SessionState::Closed);
                Err(e)
            }
        }
    }

    /// Close the scanner from any state.
    ///
    /// Closing while an acquisition is still in flight defers the teardown
    /// until that acquisition settles; the open task then releases whatever
    /// it obtained. Closing an already closed session is a no-op.
    pub async fn close(&self) {
        let prior = {
            let mut state = self.inner.state.lock().expect("lock poisoned");
            match *state {
                SessionState::Closed | SessionState::Closing => {
                    log::debug!("close ignored: session is {:?}", *state);
                    return;
                }
                SessionState::Opening => {
                    self.inner.close_requested.store(true, Ordering::SeqCst);
                    SessionState::Opening
                }
                SessionState::Active => {
                    *state = SessionState::Closing;
                    SessionState::Active
                }
            }
        };

        match prior {
            SessionState::Opening => {
                log::info!("close requested mid-open; teardown deferred until acquisition settles");
            }
            SessionState::Active => {
                self.teardown().await;
                self.inner.observer.scanner_hidden();
                self.set_state(SessionState::Closed);
                log::info!("scan session closed");
            }
            _ => unreachable!(),
        }
    }

    /// Run the open sequence. Returns Ok(true) once active, Ok(false) when a
    /// concurrent close cancelled the open.
    async fn drive_open(&self, epoch: u64) -> Result<bool, ScanError> {
        let devices = self.inner.catalog.list_devices().await?;
        log::info!("found {} capture devices", devices.len());

        let plan = selection_plan(&devices)?;

        let mut acquired = false;
        let mut last_err: Option<ScanError> = None;
        for target in &plan {
            if self.close_pending() {
                break;
            }
            match self.inner.stream.acquire(self.inner.source.as_ref(), target).await {
                Ok(()) => {
                    acquired = true;
                    break;
                }
                Err(e) => {
                    log::warn!("stream acquisition failed on {}: {}", target, e);
                    last_err = Some(e);
                }
            }
        }

        if self.close_pending() {
            self.teardown().await;
            return Ok(false);
        }
        if !acquired {
            return Err(last_err.unwrap_or_else(|| {
                ScanError::AcquisitionError("no acquisition attempted".to_string())
            }));
        }

        let detections = self
            .inner
            .engine
            .start(&self.inner.stream, &self.inner.config)
            .await?;

        // The activation check and transition share the state lock with
        // close(), so a close racing the tail of the open cannot be lost.
        let cancelled = {
            let mut state = self.inner.state.lock().expect("lock poisoned");
            if self.close_pending() {
                true
            } else {
                *state = SessionState::Active;
                false
            }
        };
        if cancelled {
            self.teardown().await;
            return Ok(false);
        }
        self.spawn_detection_pump(detections, epoch);
        log::info!("scan session active");
        Ok(true)
    }

    fn spawn_detection_pump(&self, mut detections: mpsc::Receiver<DetectionResult>, epoch: u64) {
        let session = self.clone();
        tokio::spawn(async move {
            while let Some(result) = detections.recv().await {
                session.handle_detection(result, epoch).await;
            }
        });
    }

    async fn handle_detection(&self, result: DetectionResult, epoch: u64) {
        {
            let mut state = self.inner.state.lock().expect("lock poisoned");
            let current = self.inner.epoch.load(Ordering::SeqCst);
            if *state != SessionState::Active || epoch != current {
                log::debug!(
                    "late detection ignored: session is {:?} (epoch {} vs {})",
                    *state,
                    epoch,
                    current
                );
                return;
            }
            *state = SessionState::Closing;
        }

        log::info!("barcode detected: {} ({})", result.value, result.engine);
        self.inner.sink.accept(&result.value);

        self.teardown().await;
        self.inner.observer.scanner_hidden();
        self.set_state(SessionState::Closed);
        log::info!("scan session closed after detection");
    }

    /// Engine stop strictly precedes stream release so the engine never
    /// reads a torn-down stream. Both halves are idempotent.
    async fn teardown(&self) {
        self.inner.engine.stop().await;
        self.inner.stream.release().await;
    }

    fn close_pending(&self) -> bool {
        self.inner.close_requested.load(Ordering::SeqCst)
    }

    fn set_state(&self, state: SessionState) {
        *self.inner.state.lock().expect("lock poisoned") = state;
    }
}
