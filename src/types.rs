use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Heuristic front/back classification of a capture device.
///
/// Inferred from free-form device labels, which are platform-dependent and
/// may be empty before camera permission is granted. Never treat this as
/// authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    Front,
    Back,
    Unknown,
}

impl Facing {
    /// Best-effort inference from a device label.
    pub fn from_label(label: &str) -> Self {
        let label = label.to_lowercase();
        if label.contains("back") || label.contains("rear") || label.contains("environment") {
            Facing::Back
        } else if label.contains("front") || label.contains("user facing") {
            Facing::Front
        } else {
            Facing::Unknown
        }
    }
}

impl std::fmt::Display for Facing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Facing::Front => write!(f, "front"),
            Facing::Back => write!(f, "back"),
            Facing::Unknown => write!(f, "unknown"),
        }
    }
}

/// Immutable snapshot of one video input device.
///
/// Snapshots are produced per enumeration call; the catalog is re-queried
/// rather than diffed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureDevice {
    pub id: String,
    pub label: String,
    pub facing: Facing,
}

impl CaptureDevice {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        let label = label.into();
        let facing = Facing::from_label(&label);
        Self {
            id: id.into(),
            label,
            facing,
        }
    }

    pub fn with_facing(mut self, facing: Facing) -> Self {
        self.facing = facing;
        self
    }
}

/// Barcode formats the decoder engine is asked to recognize.
///
/// Each additional format costs decode latency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symbology {
    Code128,
    Ean13,
    Ean8,
    Code39,
    UpcA,
}

/// Decode accuracy versus CPU cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionProfile {
    Low,
    Balanced,
    High,
}

impl ResolutionProfile {
    /// Capture dimensions requested from the platform for this profile.
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            ResolutionProfile::Low => (640, 480),
            ResolutionProfile::Balanced => (1280, 720),
            ResolutionProfile::High => (1920, 1080),
        }
    }
}

/// Configuration handed to the decoder engine on start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecoderConfig {
    pub symbologies: Vec<Symbology>,
    pub resolution_profile: ResolutionProfile,
    /// Ask the engine to stop emitting after the first decode.
    pub single_result: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            symbologies: vec![
                Symbology::Code128,
                Symbology::Ean13,
                Symbology::Ean8,
                Symbology::Code39,
                Symbology::UpcA,
            ],
            resolution_profile: ResolutionProfile::High,
            single_result: true,
        }
    }
}

/// One decoded barcode plus engine-reported metadata.
///
/// Ephemeral: consumed once by the result sink, then discarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionResult {
    pub id: String,
    pub value: String,
    pub symbology: Option<Symbology>,
    pub engine: String,
    pub detected_at: DateTime<Utc>,
}

impl DetectionResult {
    pub fn new(value: impl Into<String>, engine: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            value: value.into(),
            symbology: None,
            engine: engine.into(),
            detected_at: Utc::now(),
        }
    }

    pub fn with_symbology(mut self, symbology: Symbology) -> Self {
        self.symbology = Some(symbology);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facing_from_label() {
        assert_eq!(Facing::from_label("Back Camera"), Facing::Back);
        assert_eq!(Facing::from_label("rear telephoto"), Facing::Back);
        assert_eq!(Facing::from_label("Front Camera"), Facing::Front);
        assert_eq!(Facing::from_label("Integrated Webcam"), Facing::Unknown);
        assert_eq!(Facing::from_label(""), Facing::Unknown);
    }

    #[test]
    fn test_capture_device_infers_facing() {
        let device = CaptureDevice::new("1", "USB Back Camera");
        assert_eq!(device.facing, Facing::Back);

        let overridden = CaptureDevice::new("2", "camera0").with_facing(Facing::Front);
        assert_eq!(overridden.facing, Facing::Front);
    }

    #[test]
    fn test_decoder_config_defaults() {
        let config = DecoderConfig::default();
        assert!(config.symbologies.contains(&Symbology::Code128));
        assert!(config.symbologies.contains(&Symbology::Ean13));
        assert_eq!(config.resolution_profile, ResolutionProfile::High);
        assert!(config.single_result);
    }

    #[test]
    fn test_resolution_profile_dimensions() {
        assert_eq!(ResolutionProfile::High.dimensions(), (1920, 1080));
        assert_eq!(ResolutionProfile::Low.dimensions(), (640, 480));
    }

    #[test]
    fn test_detection_result_metadata() {
        let result = DetectionResult::new("4006381333931", "quagga").with_symbology(Symbology::Ean13);
        assert_eq!(result.value, "4006381333931");
        assert_eq!(result.engine, "quagga");
        assert_eq!(result.symbology, Some(Symbology::Ean13));
        assert!(!result.id.is_empty());
    }
}
