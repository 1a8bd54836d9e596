//! Adapter over the external barcode decoding engine.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::errors::ScanError;
use crate::stream::StreamHandle;
use crate::types::{CaptureDevice, DecoderConfig, DetectionResult};

/// Capability implemented by a concrete decoding library.
///
/// Any engine with a start/stop/on-detect surface fits here; the session
/// never depends on a particular decoder.
#[async_trait]
pub trait ScanEngine: Send + Sync {
    /// Engine name, carried in detection metadata.
    fn name(&self) -> &str;

    /// Bind to the given device and start decoding. Detections are delivered
    /// on the returned channel until the engine stops.
    async fn start(
        &self,
        device: &CaptureDevice,
        config: &DecoderConfig,
    ) -> Result<mpsc::Receiver<DetectionResult>, ScanError>;

    /// Tear down decoding. Must be safe to call repeatedly.
    async fn stop(&self);
}

/// Binds the engine lifecycle to an actively held stream.
///
/// Start is only valid while the stream handle holds a live stream; stop is
/// an idempotent no-op when the engine is not running. Callers must stop the
/// engine before releasing the stream so it never reads a torn-down feed.
pub struct EngineAdapter {
    engine: Arc<dyn ScanEngine>,
    running: AtomicBool,
}

impl EngineAdapter {
    pub fn new(engine: Arc<dyn ScanEngine>) -> Self {
        Self {
            engine,
            running: AtomicBool::new(false),
        }
    }

    pub async fn start(
        &self,
        stream: &StreamHandle,
        config: &DecoderConfig,
    ) -> Result<mpsc::Receiver<DetectionResult>, ScanError> {
        let device = stream.device().await.ok_or_else(|| {
            ScanError::EngineError("engine start requires an acquired stream".to_string())
        })?;

        if self.running.swap(true, Ordering::SeqCst) {
            return Err(ScanError::EngineError(
                "engine is already running".to_string(),
            ));
        }

        match self.engine.start(&device, config).await {
            Ok(detections) => {
                log::info!(
                    "scan engine {} started on device {}",
                    self.engine.name(),
                    device.id
                );
                Ok(detections)
            }
            Err(e) => {
                self.running.store(false, Ordering::SeqCst);
                log::error!("scan engine {} failed to start: {}", self.engine.name(), e);
                Err(e)
            }
        }
    }

    pub async fn stop(&self) {
        if self.running.swap(false, Ordering::SeqCst) {
            self.engine.stop().await;
            log::info!("scan engine {} stopped", self.engine.name());
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn engine_name(&self) -> &str {
        self.engine.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ManualEngine;

    #[test]
    fn test_stop_without_start_is_noop() {
        tokio_test::block_on(async {
            let engine = ManualEngine::ready();
            let adapter = EngineAdapter::new(engine.clone());

            adapter.stop().await;
            adapter.stop().await;

            assert!(!adapter.is_running());
            assert_eq!(engine.stop_count(), 0);
        });
    }

    #[test]
    fn test_start_without_stream_fails() {
        tokio_test::block_on(async {
            let adapter = EngineAdapter::new(ManualEngine::ready());
            let handle = StreamHandle::new();

            let err = adapter
                .start(&handle, &DecoderConfig::default())
                .await
                .unwrap_err();
            assert!(matches!(err, ScanError::EngineError(_)));
        });
    }
}
