//! Storage error handling
//!
//! Provides typed errors for key-value store operations with path and key
//! context. Callers recover at the UI boundary; nothing here is fatal.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during key-value store operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to create the data directory
    #[error("Failed to create data directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Permission denied accessing path
    #[error("Permission denied: cannot access '{path}'. Check file permissions.")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Disk is full or quota exceeded
    #[error("Quota exceeded while writing '{path}'. Free up disk space and try again.")]
    QuotaExceeded {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to read the backing file
    #[error("Failed to read '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to write the backing file
    #[error("Failed to write '{path}': {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Payload could not be serialized, or a stored value failed to parse
    #[error("Serialization failure for key '{key}': {source}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    /// Create an error from an I/O error with path context
    ///
    /// Classifies the error based on its kind (permission, quota, etc.).
    pub fn from_io(error: io::Error, path: PathBuf) -> Self {
        match error.kind() {
            io::ErrorKind::PermissionDenied => StoreError::PermissionDenied {
                path,
                source: error,
            },
            // StorageFull is not stable on all platforms, so also check
            // the error message for disk-full indicators
            _ if is_quota_error(&error) => StoreError::QuotaExceeded {
                path,
                source: error,
            },
            _ => StoreError::WriteError {
                path,
                source: error,
            },
        }
    }

    /// Check if this error is recoverable by user action
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            StoreError::QuotaExceeded { .. } | StoreError::PermissionDenied { .. }
        )
    }
}

/// Check if an I/O error indicates a disk-full or quota condition
fn is_quota_error(error: &io::Error) -> bool {
    let msg = error.to_string().to_lowercase();
    msg.contains("no space left")
        || msg.contains("disk full")
        || msg.contains("quota exceeded")
        || msg.contains("not enough space")
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_denied_classification() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let err = StoreError::from_io(io_err, PathBuf::from("/test/path"));

        assert!(matches!(err, StoreError::PermissionDenied { .. }));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_quota_detection() {
        let io_err = io::Error::new(io::ErrorKind::Other, "No space left on device");
        let err = StoreError::from_io(io_err, PathBuf::from("/full/disk"));

        assert!(matches!(err, StoreError::QuotaExceeded { .. }));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_other_io_becomes_write_error() {
        let io_err = io::Error::new(io::ErrorKind::Interrupted, "interrupted");
        let err = StoreError::from_io(io_err, PathBuf::from("/some/file"));

        assert!(matches!(err, StoreError::WriteError { .. }));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_error_display() {
        let err = StoreError::PermissionDenied {
            path: PathBuf::from("/test/file"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };

        let msg = err.to_string();
        assert!(msg.contains("Permission denied"));
        assert!(msg.contains("/test/file"));
    }

    #[test]
    fn test_serialization_error_display() {
        let bad = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = StoreError::Serialization {
            key: "catalogs".to_string(),
            source: bad,
        };
        assert!(err.to_string().contains("catalogs"));
    }
}
