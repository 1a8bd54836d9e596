//! Capture device enumeration and the acquisition selection policy.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::ScanError;
use crate::types::{CaptureDevice, Facing};

/// Capability for enumerating video input devices.
///
/// Each call produces a fresh snapshot; the catalog holds no state between
/// queries. Enumeration failure propagates, it is never swallowed.
#[async_trait]
pub trait DeviceCatalog: Send + Sync {
    async fn list_devices(&self) -> Result<Vec<CaptureDevice>, ScanError>;
}

/// How the stream source should pick the hardware to open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StreamTarget {
    /// A specific device from a prior enumeration.
    ById(String),
    /// Any device the platform reports with this facing capability. More
    /// portable than device ids on platforms that hide labels until
    /// permission is granted.
    Facing(Facing),
    /// Whatever device is available, no constraint.
    Unconstrained,
}

impl std::fmt::Display for StreamTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StreamTarget::ById(id) => write!(f, "device {}", id),
            StreamTarget::Facing(facing) => write!(f, "{}-facing device", facing),
            StreamTarget::Unconstrained => write!(f, "any device"),
        }
    }
}

/// Build the ordered acquisition plan for a device snapshot.
///
/// Policy: a lone device is accepted regardless of facing; a back-labelled
/// device is requested by id; with several devices and no back hint the
/// request falls back to the environment-facing capability. The final entry
/// is always the single unconstrained retry that runs when the primary
/// acquisition fails.
pub fn selection_plan(devices: &[CaptureDevice]) -> Result<Vec<StreamTarget>, ScanError> {
    if devices.is_empty() {
        return Err(ScanError::EnumerationError(
            "no video input devices found".to_string(),
        ));
    }

    let primary = if devices.len() == 1 {
        StreamTarget::ById(devices[0].id.clone())
    } else if let Some(back) = devices.iter().find(|d| d.facing == Facing::Back) {
        StreamTarget::ById(back.id.clone())
    } else {
        StreamTarget::Facing(Facing::Back)
    };

    log::debug!("acquisition plan: {} then any device", primary);
    Ok(vec![primary, StreamTarget::Unconstrained])
}
