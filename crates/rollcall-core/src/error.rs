//! Error types for rollcall.

use thiserror::Error;

/// Main error type for rollcall operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Session start requested without a selected course
    #[error("No course selected")]
    NoCourseSelected,

    /// Camera device could not be opened
    #[error("Camera unavailable: {0}")]
    CameraUnavailable(String),

    /// Camera access denied by the platform
    #[error("Camera permission denied: {0}")]
    PermissionDenied(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with custom message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether this error is an acquisition failure the session can
    /// survive (the phase stays in camera with a degraded preview).
    pub fn is_acquisition_failure(&self) -> bool {
        matches!(
            self,
            Error::CameraUnavailable(_) | Error::PermissionDenied(_)
        )
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_course_selected_error() {
        let err = Error::NoCourseSelected;
        assert_eq!(err.to_string(), "No course selected");
    }

    #[test]
    fn test_camera_unavailable_error() {
        let err = Error::CameraUnavailable("device busy".to_string());
        assert_eq!(err.to_string(), "Camera unavailable: device busy");
        assert!(err.is_acquisition_failure());
    }

    #[test]
    fn test_permission_denied_error() {
        let err = Error::PermissionDenied("user dismissed prompt".to_string());
        assert_eq!(
            err.to_string(),
            "Camera permission denied: user dismissed prompt"
        );
        assert!(err.is_acquisition_failure());
    }

    #[test]
    fn test_config_error() {
        let err = Error::Config("step_delay_ms must be > 0".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: step_delay_ms must be > 0"
        );
        assert!(!err.is_acquisition_failure());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_serialization_error_conversion() {
        let json_err = serde_json::from_str::<i32>("invalid json").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn test_result_type() {
        let success: Result<i32> = Ok(42);
        assert!(success.is_ok());

        let failure: Result<i32> = Err(Error::NoCourseSelected);
        assert!(failure.is_err());
    }
}
