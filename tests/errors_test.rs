#[cfg(test)]
mod error_tests {
    use shelfscan::errors::ScanError;
    use std::error::Error;

    #[test]
    fn test_enumeration_error_display() {
        let error = ScanError::EnumerationError("no platform access".to_string());
        assert!(error.to_string().contains("Device enumeration error"));
        assert!(error.to_string().contains("no platform access"));
    }

    #[test]
    fn test_acquisition_error_display() {
        let error = ScanError::AcquisitionError("device busy".to_string());
        assert!(error.to_string().contains("Stream acquisition error"));
        assert!(error.to_string().contains("device busy"));
    }

    #[test]
    fn test_engine_error_display() {
        let error = ScanError::EngineError("decoder could not bind".to_string());
        assert!(error.to_string().contains("Scan engine error"));
        assert!(error.to_string().contains("decoder could not bind"));
    }

    #[test]
    fn test_error_debug_format() {
        let error = ScanError::EnumerationError("Debug test".to_string());
        let debug_str = format!("{:?}", error);
        assert!(debug_str.contains("EnumerationError"));
        assert!(debug_str.contains("Debug test"));
    }

    #[test]
    fn test_error_display_trait() {
        let error = ScanError::PermissionDenied("Display test".to_string());
        let display_str = format!("{}", error);
        assert_eq!(display_str, "Permission denied error: Display test");
    }

    #[test]
    fn test_error_implements_error_trait() {
        let error = ScanError::ConfigError("Error trait test".to_string());
        let _error_trait: &dyn Error = &error;
        assert!(error.source().is_none()); // ScanError doesn't wrap other errors
    }

    #[test]
    fn test_all_error_variants() {
        let errors = vec![
            ScanError::EnumerationError("Enumeration error".to_string()),
            ScanError::AcquisitionError("Acquisition error".to_string()),
            ScanError::EngineError("Engine error".to_string()),
            ScanError::PermissionDenied("Permission error".to_string()),
            ScanError::ConfigError("Config error".to_string()),
        ];

        for error in errors {
            // Each error should implement Display
            let display_str = error.to_string();
            assert!(!display_str.is_empty());

            // Each error should implement Debug
            let debug_str = format!("{:?}", error);
            assert!(!debug_str.is_empty());
        }
    }

    #[test]
    fn test_error_message_extraction() {
        let test_message = "Detailed error information";

        match ScanError::AcquisitionError(test_message.to_string()) {
            ScanError::AcquisitionError(msg) => assert_eq!(msg, test_message),
            _ => panic!("Wrong error variant"),
        }

        match ScanError::EngineError(test_message.to_string()) {
            ScanError::EngineError(msg) => assert_eq!(msg, test_message),
            _ => panic!("Wrong error variant"),
        }
    }

    #[test]
    fn test_error_clone_and_equality() {
        let original = ScanError::AcquisitionError("Clone test".to_string());
        let cloned = original.clone();
        assert_eq!(original, cloned);

        let different = ScanError::EngineError("Clone test".to_string());
        assert_ne!(original, different);
    }
}
