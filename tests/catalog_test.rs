//! Selection policy tests for the capture device catalog.

use proptest::prelude::*;
use shelfscan::{selection_plan, CaptureDevice, Facing, ScanError, StreamTarget};

#[test]
fn empty_snapshot_is_an_enumeration_error() {
    let err = selection_plan(&[]).unwrap_err();
    assert!(matches!(err, ScanError::EnumerationError(_)));
}

#[test]
fn single_device_is_accepted_regardless_of_facing() {
    let devices = vec![CaptureDevice::new("3", "Front Camera")];
    let plan = selection_plan(&devices).unwrap();
    assert_eq!(plan[0], StreamTarget::ById("3".to_string()));
}

#[test]
fn back_labeled_device_wins_among_many() {
    let devices = vec![
        CaptureDevice::new("0", "Front Camera"),
        CaptureDevice::new("1", "Integrated Webcam"),
        CaptureDevice::new("2", "Back Telephoto Camera"),
    ];
    let plan = selection_plan(&devices).unwrap();
    assert_eq!(plan[0], StreamTarget::ById("2".to_string()));
}

#[test]
fn unlabeled_multi_device_falls_back_to_facing_mode() {
    let devices = vec![
        CaptureDevice::new("0", "camera0"),
        CaptureDevice::new("1", "camera1"),
    ];
    let plan = selection_plan(&devices).unwrap();
    assert_eq!(plan[0], StreamTarget::Facing(Facing::Back));
}

#[test]
fn plan_carries_exactly_one_unconstrained_retry() {
    let devices = vec![
        CaptureDevice::new("0", "Back Camera"),
        CaptureDevice::new("1", "Front Camera"),
    ];
    let plan = selection_plan(&devices).unwrap();
    assert_eq!(plan.len(), 2);
    assert_eq!(plan[1], StreamTarget::Unconstrained);
}

proptest! {
    // Whatever the snapshot looks like, the plan is a primary choice plus
    // exactly one unconstrained retry, and the primary is never itself
    // unconstrained.
    #[test]
    fn plan_shape_holds_for_any_snapshot(labels in proptest::collection::vec("[a-z ]{0,16}", 1..6)) {
        let devices: Vec<CaptureDevice> = labels
            .iter()
            .enumerate()
            .map(|(i, label)| CaptureDevice::new(i.to_string(), label.clone()))
            .collect();

        let plan = selection_plan(&devices).unwrap();
        prop_assert_eq!(plan.len(), 2);
        prop_assert_eq!(&plan[1], &StreamTarget::Unconstrained);
        prop_assert_ne!(&plan[0], &StreamTarget::Unconstrained);

        if devices.len() == 1 {
            prop_assert_eq!(&plan[0], &StreamTarget::ById(devices[0].id.clone()));
        }
        if let StreamTarget::ById(id) = &plan[0] {
            prop_assert!(devices.iter().any(|d| &d.id == id));
        }
    }
}
