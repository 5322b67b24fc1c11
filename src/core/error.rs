//! Error types for embedded_chart
//!
//! Only `DirectoryPrep` ever leaves the lifecycle as an `Err`. Every other
//! variant is raised at the smallest scope (one resource, one file) and turned
//! into a log line plus a counter in the phase report.

use std::any::Any;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for embedded_chart
#[derive(Error, Debug)]
pub enum ChartError {
    /// The target directory could not be created
    #[error("Failed to prepare directory '{path}': {message}")]
    DirectoryPrep { path: PathBuf, message: String },

    /// The resource source could not list its resources
    #[error("Failed to enumerate resources: {0}")]
    Enumeration(String),

    /// A resource name was listed but no stream could be opened for it
    #[error("Resource stream unavailable: {0}")]
    ResourceStreamUnavailable(String),

    /// A resource name cannot be used as a flat file name
    #[error("Invalid resource name '{0}': must be a single file name")]
    InvalidResourceName(String),

    /// Creating or copying into the destination file failed
    #[error("Failed to extract resource '{name}': {message}")]
    ResourceWrite { name: String, message: String },

    /// A file in the target directory has no album loader
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// The album loader rejected a file
    #[error("Failed to load album '{file}': {message}")]
    ExternalLoader { file: String, message: String },

    /// Removing the target directory failed
    #[error("Failed to cleanup directory '{path}': {message}")]
    Cleanup { path: PathBuf, message: String },

    /// General I/O error
    #[error("IO error: {0}")]
    Io(String),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, ChartError>;

impl From<std::io::Error> for ChartError {
    fn from(err: std::io::Error) -> Self {
        ChartError::Io(err.to_string())
    }
}

/// Text of a panic payload caught with `catch_unwind`
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_item() {
        let err = ChartError::ResourceWrite {
            name: "a.mdm".to_string(),
            message: "disk full".to_string(),
        };
        assert_eq!(err.to_string(), "Failed to extract resource 'a.mdm': disk full");

        let err = ChartError::ExternalLoader {
            file: "b.mdp".to_string(),
            message: "bad header".to_string(),
        };
        assert!(err.to_string().contains("b.mdp"));
        assert!(err.to_string().contains("bad header"));
    }

    #[test]
    fn test_panic_message() {
        let payload = std::panic::catch_unwind(|| panic!("bad stream")).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "bad stream");

        let payload = std::panic::catch_unwind(|| panic!("{} failed", "a.mdm")).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "a.mdm failed");

        let payload = std::panic::catch_unwind(|| std::panic::panic_any(7u32)).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "unknown panic");
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ChartError = io.into();
        assert!(matches!(err, ChartError::Io(ref m) if m == "denied"));
    }
}
