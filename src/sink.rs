//! Delivery of decoded barcodes to the surrounding application.

use std::sync::Mutex;

/// Receives each decoded barcode exactly once.
///
/// Implementations populate whatever the host app wires in, typically the
/// form's barcode field. Must not fail.
pub trait ResultSink: Send + Sync {
    fn accept(&self, barcode: &str);
}

/// Holds the most recent decoded value for poll-based consumers.
///
/// The inventory form polls this after a scan completes and fills its
/// barcode input with the taken value.
#[derive(Default)]
pub struct FieldSink {
    value: Mutex<Option<String>>,
}

impl FieldSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the pending value, clearing it.
    pub fn take(&self) -> Option<String> {
        self.value.lock().expect("lock poisoned").take()
    }

    pub fn peek(&self) -> Option<String> {
        self.value.lock().expect("lock poisoned").clone()
    }
}

impl ResultSink for FieldSink {
    fn accept(&self, barcode: &str) {
        *self.value.lock().expect("lock poisoned") = Some(barcode.to_string());
    }
}
