//! Testing utilities for shelfscan
//!
//! Deterministic capability fakes for exercising the scan session without
//! camera hardware or a real decoder engine.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::{mpsc, Semaphore};

use crate::catalog::{DeviceCatalog, StreamTarget};
use crate::engine::ScanEngine;
use crate::errors::ScanError;
use crate::session::SessionObserver;
use crate::sink::ResultSink;
use crate::stream::{MediaStream, MediaTrack, StreamSource};
use crate::types::{CaptureDevice, DecoderConfig, DetectionResult};

/// Catalog returning a fixed snapshot (or a fixed failure) on every query.
pub struct ScriptedCatalog {
    outcome: Result<Vec<CaptureDevice>, ScanError>,
    calls: AtomicUsize,
}

impl ScriptedCatalog {
    pub fn with_devices(devices: Vec<CaptureDevice>) -> Arc<Self> {
        Arc::new(Self {
            outcome: Ok(devices),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            outcome: Err(ScanError::EnumerationError(message.to_string())),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DeviceCatalog for ScriptedCatalog {
    async fn list_devices(&self) -> Result<Vec<CaptureDevice>, ScanError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}

/// Stream source with scripted per-attempt outcomes and live-track counters.
///
/// Defaults to succeeding on every open. An optional gate makes each open
/// wait for a permit, so tests can hold an acquisition in flight.
pub struct ScriptedStreamSource {
    outcomes: Mutex<VecDeque<Result<(), ScanError>>>,
    opened_targets: Mutex<Vec<StreamTarget>>,
    live_tracks: Arc<AtomicUsize>,
    stopped_tracks: Arc<AtomicUsize>,
    gate: Option<Arc<Semaphore>>,
}

impl ScriptedStreamSource {
    pub fn always_ok() -> Arc<Self> {
        Arc::new(Self::build(Vec::new(), None))
    }

    /// Outcomes consumed one per open attempt; further attempts succeed.
    pub fn with_outcomes(outcomes: Vec<Result<(), ScanError>>) -> Arc<Self> {
        Arc::new(Self::build(outcomes, None))
    }

    /// Source whose opens block until the returned gate hands out a permit.
    pub fn gated() -> (Arc<Self>, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        let source = Arc::new(Self::build(Vec::new(), Some(gate.clone())));
        (source, gate)
    }

    fn build(outcomes: Vec<Result<(), ScanError>>, gate: Option<Arc<Semaphore>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            opened_targets: Mutex::new(Vec::new()),
            live_tracks: Arc::new(AtomicUsize::new(0)),
            stopped_tracks: Arc::new(AtomicUsize::new(0)),
            gate,
        }
    }

    /// Number of open attempts issued against this source.
    pub fn open_calls(&self) -> usize {
        self.opened_targets.lock().expect("lock poisoned").len()
    }

    pub fn opened_targets(&self) -> Vec<StreamTarget> {
        self.opened_targets.lock().expect("lock poisoned").clone()
    }

    /// Streams opened and not yet stopped.
    pub fn live_streams(&self) -> usize {
        self.live_tracks.load(Ordering::SeqCst)
    }

    pub fn stopped_streams(&self) -> usize {
        self.stopped_tracks.load(Ordering::SeqCst)
    }

    fn device_for(target: &StreamTarget) -> CaptureDevice {
        match target {
            StreamTarget::ById(id) => CaptureDevice::new(id.clone(), "scripted camera"),
            StreamTarget::Facing(_) => CaptureDevice::new("scripted-env", "scripted back camera"),
            StreamTarget::Unconstrained => CaptureDevice::new("scripted-any", "scripted camera"),
        }
    }
}

#[async_trait]
impl StreamSource for ScriptedStreamSource {
    async fn open(&self, target: &StreamTarget) -> Result<MediaStream, ScanError> {
        // Attempts are recorded before the gate so tests can observe an
        // acquisition that has started but not yet settled.
        self.opened_targets
            .lock()
            .expect("lock poisoned")
            .push(target.clone());

        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate closed").forget();
        }

        let outcome = self
            .outcomes
            .lock()
            .expect("lock poisoned")
            .pop_front()
            .unwrap_or(Ok(()));
        outcome?;

        self.live_tracks.fetch_add(1, Ordering::SeqCst);
        let track = ScriptedTrack {
            stopped: false,
            live: self.live_tracks.clone(),
            stops: self.stopped_tracks.clone(),
        };
        Ok(MediaStream::new(
            Self::device_for(target),
            vec![Box::new(track)],
        ))
    }
}

struct ScriptedTrack {
    stopped: bool,
    live: Arc<AtomicUsize>,
    stops: Arc<AtomicUsize>,
}

impl MediaTrack for ScriptedTrack {
    fn stop(&mut self) {
        if !self.stopped {
            self.stopped = true;
            self.live.fetch_sub(1, Ordering::SeqCst);
            self.stops.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Engine driven by hand: tests feed detections through `emit`.
pub struct ManualEngine {
    start_results: Mutex<VecDeque<Result<(), ScanError>>>,
    sender: Mutex<Option<mpsc::Sender<DetectionResult>>>,
    starts: AtomicUsize,
    stops: AtomicUsize,
}

impl ManualEngine {
    pub fn ready() -> Arc<Self> {
        Arc::new(Self::build(Vec::new()))
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self::build(vec![Err(ScanError::EngineError(
            message.to_string(),
        ))]))
    }

    fn build(start_results: Vec<Result<(), ScanError>>) -> Self {
        Self {
            start_results: Mutex::new(start_results.into()),
            sender: Mutex::new(None),
            starts: AtomicUsize::new(0),
            stops: AtomicUsize::new(0),
        }
    }

    /// Deliver a detection to the running session. Returns false when the
    /// engine has no live channel.
    pub fn emit(&self, result: DetectionResult) -> bool {
        self.sender
            .lock()
            .expect("lock poisoned")
            .as_ref()
            .map(|tx| tx.try_send(result).is_ok())
            .unwrap_or(false)
    }

    /// Clone of the live detection channel, for exercising deliveries that
    /// outlast the engine.
    pub fn detection_sender(&self) -> Option<mpsc::Sender<DetectionResult>> {
        self.sender.lock().expect("lock poisoned").clone()
    }

    pub fn start_count(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn stop_count(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScanEngine for ManualEngine {
    fn name(&self) -> &str {
        "manual"
    }

    async fn start(
        &self,
        _device: &CaptureDevice,
        _config: &DecoderConfig,
    ) -> Result<mpsc::Receiver<DetectionResult>, ScanError> {
        let outcome = self
            .start_results
            .lock()
            .expect("lock poisoned")
            .pop_front()
            .unwrap_or(Ok(()));
        outcome?;

        self.starts.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = mpsc::channel(4);
        *self.sender.lock().expect("lock poisoned") = Some(tx);
        Ok(rx)
    }

    async fn stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
        self.sender.lock().expect("lock poisoned").take();
    }
}

/// Sink recording every accepted barcode.
#[derive(Default)]
pub struct CapturingSink {
    values: Mutex<Vec<String>>,
}

impl CapturingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn values(&self) -> Vec<String> {
        self.values.lock().expect("lock poisoned").clone()
    }
}

impl ResultSink for CapturingSink {
    fn accept(&self, barcode: &str) {
        self.values
            .lock()
            .expect("lock poisoned")
            .push(barcode.to_string());
    }
}

/// Events a session surfaces to its observer, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum ObserverEvent {
    Shown,
    Hidden,
    Failed(ScanError),
}

/// Observer recording every notification.
#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<ObserverEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<ObserverEvent> {
        self.events.lock().expect("lock poisoned").clone()
    }
}

impl SessionObserver for RecordingObserver {
    fn scanner_shown(&self) {
        self.events
            .lock()
            .expect("lock poisoned")
            .push(ObserverEvent::Shown);
    }

    fn scanner_hidden(&self) {
        self.events
            .lock()
            .expect("lock poisoned")
            .push(ObserverEvent::Hidden);
    }

    fn scan_failed(&self, error: &ScanError) {
        self.events
            .lock()
            .expect("lock poisoned")
            .push(ObserverEvent::Failed(error.clone()));
    }
}

/// Prompt answering with a fixed decision, counting how often it fires.
pub struct StaticPrompt {
    decision: crate::permissions::ConsentDecision,
    prompts: AtomicUsize,
}

impl StaticPrompt {
    pub fn answering(decision: crate::permissions::ConsentDecision) -> Arc<Self> {
        Arc::new(Self {
            decision,
            prompts: AtomicUsize::new(0),
        })
    }

    pub fn prompt_count(&self) -> usize {
        self.prompts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl crate::permissions::ConsentPrompt for StaticPrompt {
    async fn request(&self) -> crate::permissions::ConsentDecision {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        self.decision
    }
}
