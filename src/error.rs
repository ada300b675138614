//! Error types for report generation.
//!
//! This module defines all error types that can occur while assembling
//! and exporting a report document.

/// Result type alias for report generation operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during report generation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The report record is absent or lacks a diagnosis label.
    ///
    /// Raised before anything is drawn; no partial document exists.
    #[error("Missing report input: {0}")]
    MissingInput(String),

    /// The report record carries a value outside its domain.
    #[error("Invalid report input: {0}")]
    InvalidInput(String),

    /// Embedded image could not be decoded
    #[error("Image error: {0}")]
    Image(String),

    /// The platform share dialog failed
    #[error("Share failed: {0}")]
    Share(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<crate::writer::ImageError> for Error {
    fn from(err: crate::writer::ImageError) -> Self {
        Error::Image(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_input_error() {
        let err = Error::MissingInput("predicted label is empty".to_string());
        let msg = format!("{}", err);
        assert!(msg.contains("Missing report input"));
        assert!(msg.contains("predicted label"));
    }

    #[test]
    fn test_invalid_input_error() {
        let err = Error::InvalidInput("confidence 1.5 outside [0, 1]".to_string());
        let msg = format!("{}", err);
        assert!(msg.contains("Invalid report input"));
        assert!(msg.contains("1.5"));
    }

    #[test]
    fn test_image_error_conversion() {
        let err: Error = crate::writer::ImageError::UnsupportedFormat.into();
        assert!(matches!(err, Error::Image(_)));
        assert!(format!("{}", err).contains("Unsupported image format"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
