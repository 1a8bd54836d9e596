use crate::permissions::{
    probe_permission, ConsentDecision, ConsentGate, PermissionInfo, PermissionStatus,
};
use tauri::command;

lazy_static::lazy_static! {
    static ref CONSENT: ConsentGate = ConsentGate::detached();
}

/// Consent state for the scanner commands.
pub(crate) fn consent_status() -> PermissionStatus {
    CONSENT.status()
}

/// Check camera permission status as reported by the platform
#[command]
pub async fn check_scanner_permission() -> Result<PermissionInfo, String> {
    log::debug!("Checking camera permission status");
    tokio::task::spawn_blocking(probe_permission)
        .await
        .map_err(|e| format!("Task join error: {}", e))
}

/// Record the user's answer to the consent dialog
#[command]
pub async fn record_consent(allow: bool) -> Result<PermissionStatus, String> {
    let decision = if allow {
        ConsentDecision::Allow
    } else {
        ConsentDecision::Deny
    };
    CONSENT.record(decision);
    Ok(CONSENT.status())
}

/// Get human-readable permission status string (legacy compatibility)
#[command]
pub fn get_permission_status_string() -> String {
    format!("{:?}", CONSENT.status())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_record_consent_allow() {
        let status = record_consent(true).await.unwrap();
        assert_eq!(status, PermissionStatus::Granted);
        assert_eq!(consent_status(), PermissionStatus::Granted);
    }
}
