//! Consent gate behavior.

use shelfscan::testing::StaticPrompt;
use shelfscan::{ConsentDecision, ConsentGate, PermissionStatus};

#[tokio::test]
async fn gate_prompts_once_and_remembers_allow() {
    let prompt = StaticPrompt::answering(ConsentDecision::Allow);
    let gate = ConsentGate::new(prompt.clone());

    assert_eq!(gate.status(), PermissionStatus::NotDetermined);
    assert_eq!(gate.check().await, PermissionStatus::Granted);
    assert_eq!(gate.check().await, PermissionStatus::Granted);
    assert_eq!(prompt.prompt_count(), 1);
}

#[tokio::test]
async fn gate_remembers_deny() {
    let prompt = StaticPrompt::answering(ConsentDecision::Deny);
    let gate = ConsentGate::new(prompt.clone());

    assert_eq!(gate.check().await, PermissionStatus::Denied);
    assert_eq!(gate.check().await, PermissionStatus::Denied);
    assert_eq!(prompt.prompt_count(), 1);
}

#[tokio::test]
async fn detached_gate_accepts_recorded_decisions() {
    let gate = ConsentGate::detached();

    assert_eq!(gate.check().await, PermissionStatus::NotDetermined);
    gate.record(ConsentDecision::Allow);
    assert_eq!(gate.check().await, PermissionStatus::Granted);

    gate.record(ConsentDecision::Deny);
    assert_eq!(gate.status(), PermissionStatus::Denied);
}
