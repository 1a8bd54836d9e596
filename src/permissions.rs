use std::sync::{Arc, Mutex};

use async_trait::async_trait;

/// Permission status enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PermissionStatus {
    /// Permission granted
    Granted,
    /// Permission denied
    Denied,
    /// Permission not determined (user hasn't been asked yet)
    NotDetermined,
}

impl std::fmt::Display for PermissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PermissionStatus::Granted => write!(f, "granted"),
            PermissionStatus::Denied => write!(f, "denied"),
            PermissionStatus::NotDetermined => write!(f, "not_determined"),
        }
    }
}

/// Outcome of the two-button consent dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ConsentDecision {
    Allow,
    Deny,
}

/// Capability that presents the consent dialog to the user.
#[async_trait]
pub trait ConsentPrompt: Send + Sync {
    async fn request(&self) -> ConsentDecision;
}

/// Gates the first camera-open intent behind user consent.
///
/// Allow maps to the open transition; Deny is a no-op that never touches the
/// stream handle. The decision is remembered, so the prompt fires at most
/// once per gate.
pub struct ConsentGate {
    prompt: Option<Arc<dyn ConsentPrompt>>,
    status: Mutex<PermissionStatus>,
}

impl ConsentGate {
    pub fn new(prompt: Arc<dyn ConsentPrompt>) -> Self {
        Self {
            prompt: Some(prompt),
            status: Mutex::new(PermissionStatus::NotDetermined),
        }
    }

    /// Gate without a prompt capability; decisions arrive via `record`,
    /// typically from a frontend dialog.
    pub fn detached() -> Self {
        Self {
            prompt: None,
            status: Mutex::new(PermissionStatus::NotDetermined),
        }
    }

    pub fn status(&self) -> PermissionStatus {
        *self.status.lock().expect("lock poisoned")
    }

    /// Record a decision directly.
    pub fn record(&self, decision: ConsentDecision) {
        let status = match decision {
            ConsentDecision::Allow => PermissionStatus::Granted,
            ConsentDecision::Deny => PermissionStatus::Denied,
        };
        *self.status.lock().expect("lock poisoned") = status;
        log::info!("camera consent recorded: {}", status);
    }

    /// Resolve consent, prompting only when no decision exists yet.
    pub async fn check(&self) -> PermissionStatus {
        let current = self.status();
        if current != PermissionStatus::NotDetermined {
            return current;
        }

        match &self.prompt {
            Some(prompt) => {
                let decision = prompt.request().await;
                self.record(decision);
                self.status()
            }
            None => PermissionStatus::NotDetermined,
        }
    }
}

/// Detailed permission information
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct PermissionInfo {
    pub status: PermissionStatus,
    pub message: String,
    pub can_request: bool,
}

/// Probe camera permission for the current platform.
///
/// Uses device enumeration as a proxy: a platform that refuses to enumerate
/// has not granted access, and an empty list usually means permission has
/// not been requested yet.
pub fn probe_permission() -> PermissionInfo {
    match nokhwa::query(crate::platform::backend()) {
        Ok(devices) if !devices.is_empty() => PermissionInfo {
            status: PermissionStatus::Granted,
            message: "Camera access granted".to_string(),
            can_request: false,
        },
        Ok(_) => PermissionInfo {
            status: PermissionStatus::NotDetermined,
            message: "No cameras found - permission may not be granted".to_string(),
            can_request: true,
        },
        Err(e) => PermissionInfo {
            status: PermissionStatus::Denied,
            message: format!("Camera access denied: {}", e),
            can_request: true,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detached_gate_stays_undetermined() {
        let gate = ConsentGate::detached();
        assert_eq!(gate.status(), PermissionStatus::NotDetermined);
    }

    #[test]
    fn test_record_maps_decisions() {
        let gate = ConsentGate::detached();
        gate.record(ConsentDecision::Allow);
        assert_eq!(gate.status(), PermissionStatus::Granted);
        gate.record(ConsentDecision::Deny);
        assert_eq!(gate.status(), PermissionStatus::Denied);
    }
}
