use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    EnumerationError(String),
    AcquisitionError(String),
    EngineError(String),
    PermissionDenied(String),
    ConfigError(String),
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ScanError::EnumerationError(msg) => write!(f, "Device enumeration error: {}", msg),
            ScanError::AcquisitionError(msg) => write!(f, "Stream acquisition error: {}", msg),
            ScanError::EngineError(msg) => write!(f, "Scan engine error: {}", msg),
            ScanError::PermissionDenied(msg) => write!(f, "Permission denied error: {}", msg),
            ScanError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for ScanError {}
