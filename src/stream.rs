//! Exclusive ownership of the live hardware video stream.

use std::fmt;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::catalog::StreamTarget;
use crate::errors::ScanError;
use crate::types::CaptureDevice;

/// One live track within an open stream. Stopping it must power down the
/// underlying hardware so the camera indicator turns off.
pub trait MediaTrack: Send {
    fn stop(&mut self);
}

/// A live hardware stream opened against one capture device.
pub struct MediaStream {
    device: CaptureDevice,
    tracks: Vec<Box<dyn MediaTrack>>,
}

impl MediaStream {
    pub fn new(device: CaptureDevice, tracks: Vec<Box<dyn MediaTrack>>) -> Self {
        Self { device, tracks }
    }

    pub fn device(&self) -> &CaptureDevice {
        &self.device
    }

    fn stop_tracks(&mut self) {
        for track in &mut self.tracks {
            track.stop();
        }
    }
}

impl fmt::Debug for MediaStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaStream")
            .field("device", &self.device.id)
            .field("tracks", &self.tracks.len())
            .finish()
    }
}

/// Capability for opening a hardware stream against a target.
#[async_trait]
pub trait StreamSource: Send + Sync {
    async fn open(&self, target: &StreamTarget) -> Result<MediaStream, ScanError>;
}

/// Owner of at most one live stream.
///
/// Acquire always releases the previously held stream before the new open is
/// issued, so two live streams never coexist. Release stops every track and
/// is safe to call at any time, held or not.
pub struct StreamHandle {
    slot: Mutex<Option<MediaStream>>,
}

impl StreamHandle {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    pub async fn acquire(
        &self,
        source: &dyn StreamSource,
        target: &StreamTarget,
    ) -> Result<(), ScanError> {
        self.release().await;

        let stream = source.open(target).await?;
        log::info!(
            "stream acquired on device {} ({})",
            stream.device().id,
            stream.device().label
        );
        *self.slot.lock().await = Some(stream);
        Ok(())
    }

    pub async fn release(&self) {
        let mut slot = self.slot.lock().await;
        if let Some(mut stream) = slot.take() {
            stream.stop_tracks();
            log::info!("stream released on device {}", stream.device().id);
        }
    }

    pub async fn is_held(&self) -> bool {
        self.slot.lock().await.is_some()
    }

    /// Snapshot of the device the held stream was opened against, if any.
    pub async fn device(&self) -> Option<CaptureDevice> {
        self.slot.lock().await.as_ref().map(|s| s.device().clone())
    }
}

impl Default for StreamHandle {
    fn default() -> Self {
        Self::new()
    }
}
