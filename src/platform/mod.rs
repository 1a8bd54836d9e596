//! Platform capture backend built on nokhwa.
//!
//! Implements the device catalog and stream source capabilities against the
//! native camera API for the current platform. All nokhwa calls are
//! blocking and run on the blocking pool.

use async_trait::async_trait;
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    ApiBackend, CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType,
    Resolution,
};
use nokhwa::CallbackCamera;

use crate::catalog::{DeviceCatalog, StreamTarget};
use crate::errors::ScanError;
use crate::stream::{MediaStream, MediaTrack, StreamSource};
use crate::types::{CaptureDevice, ResolutionProfile};

/// Native camera API for the current platform.
pub fn backend() -> ApiBackend {
    #[cfg(target_os = "linux")]
    {
        ApiBackend::Video4Linux
    }

    #[cfg(target_os = "windows")]
    {
        ApiBackend::MediaFoundation
    }

    #[cfg(target_os = "macos")]
    {
        ApiBackend::AVFoundation
    }

    #[cfg(not(any(target_os = "linux", target_os = "windows", target_os = "macos")))]
    {
        ApiBackend::Auto
    }
}

/// List video input devices known to the platform.
pub fn list_devices_blocking() -> Result<Vec<CaptureDevice>, ScanError> {
    let cameras = nokhwa::query(backend())
        .map_err(|e| ScanError::EnumerationError(format!("Failed to query cameras: {}", e)))?;

    Ok(cameras
        .into_iter()
        .map(|info| CaptureDevice::new(info.index().to_string(), info.human_name()))
        .collect())
}

/// Device catalog backed by the platform camera API.
pub struct PlatformCatalog;

#[async_trait]
impl DeviceCatalog for PlatformCatalog {
    async fn list_devices(&self) -> Result<Vec<CaptureDevice>, ScanError> {
        tokio::task::spawn_blocking(list_devices_blocking)
            .await
            .map_err(|e| ScanError::EnumerationError(format!("Task join error: {}", e)))?
    }
}

/// Stream source opening native camera streams at the configured profile.
pub struct PlatformStreamSource {
    profile: ResolutionProfile,
}

impl PlatformStreamSource {
    pub fn new(profile: ResolutionProfile) -> Self {
        Self { profile }
    }
}

#[async_trait]
impl StreamSource for PlatformStreamSource {
    async fn open(&self, target: &StreamTarget) -> Result<MediaStream, ScanError> {
        let target = target.clone();
        let profile = self.profile;
        tokio::task::spawn_blocking(move || open_blocking(&target, profile))
            .await
            .map_err(|e| ScanError::AcquisitionError(format!("Task join error: {}", e)))?
    }
}

/// Resolve an acquisition target to a concrete device snapshot.
fn resolve_device(target: &StreamTarget) -> Result<CaptureDevice, ScanError> {
    let devices =
        list_devices_blocking().map_err(|e| ScanError::AcquisitionError(e.to_string()))?;

    let device = match target {
        StreamTarget::ById(id) => devices.iter().find(|d| &d.id == id).cloned(),
        StreamTarget::Facing(facing) => devices
            .iter()
            .find(|d| d.facing == *facing)
            .or_else(|| devices.first())
            .cloned(),
        StreamTarget::Unconstrained => devices.first().cloned(),
    };

    device.ok_or_else(|| {
        ScanError::AcquisitionError(format!("no device available for {}", target))
    })
}

fn open_blocking(target: &StreamTarget, profile: ResolutionProfile) -> Result<MediaStream, ScanError> {
    let device = resolve_device(target)?;
    let index = device
        .id
        .parse::<u32>()
        .map_err(|_| ScanError::AcquisitionError(format!("Invalid device ID: {}", device.id)))?;

    let (width, height) = profile.dimensions();
    let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(
        CameraFormat::new(Resolution::new(width, height), FrameFormat::MJPEG, 30),
    ));

    let mut camera = CallbackCamera::new(CameraIndex::Index(index), requested, |_| {})
        .map_err(|e| {
            ScanError::AcquisitionError(format!("Failed to initialize camera {}: {}", index, e))
        })?;

    camera.open_stream().map_err(|e| {
        ScanError::AcquisitionError(format!("Failed to open stream on camera {}: {}", index, e))
    })?;

    let track = NokhwaTrack {
        camera: Some(camera),
        device_id: device.id.clone(),
    };

    Ok(MediaStream::new(device, vec![Box::new(track)]))
}

/// Track wrapper stopping the nokhwa stream when the handle releases it.
struct NokhwaTrack {
    camera: Option<CallbackCamera>,
    device_id: String,
}

impl MediaTrack for NokhwaTrack {
    fn stop(&mut self) {
        if let Some(mut camera) = self.camera.take() {
            if let Err(e) = camera.stop_stream() {
                log::warn!("Failed to stop stream on device {}: {}", self.device_id, e);
            }
        }
    }
}
