//! Error types for `staffdesk`.

use crate::paths::Resource;
use std::path::PathBuf;

/// Errors that can occur when loading, saving, or mutating office data.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON parsing error occurred.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A YAML parsing error occurred.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A syntactically valid JSON entry that does not form a valid record.
    ///
    /// Reported per offending entry during load; well-formed entries in the
    /// same resource are still loaded.
    #[error("malformed {resource} record at index {index}: {reason}")]
    MalformedRecord {
        /// The resource the entry belongs to.
        resource: Resource,
        /// Position of the entry within its array (or date bucket).
        index: usize,
        /// Why the entry was rejected.
        reason: String,
    },

    /// A referenced employee does not exist.
    #[error("employee not found: {0}")]
    EmployeeNotFound(String),

    /// A referenced task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(u32),

    /// A date string is not in `YYYY-MM-DD` form.
    #[error("invalid date: '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),

    /// A time string is not in `HH:MM` form.
    #[error("invalid time: '{0}' (expected HH:MM)")]
    InvalidTime(String),

    /// A source file for document import was not found.
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),
}

/// A specialized Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_record_display() {
        let err = Error::MalformedRecord {
            resource: Resource::Tasks,
            index: 3,
            reason: "missing field `text`".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("tasks"));
        assert!(msg.contains("index 3"));
        assert!(msg.contains("missing field `text`"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_invalid_date_display() {
        let err = Error::InvalidDate("2024-13-40".to_string());
        assert!(err.to_string().contains("2024-13-40"));
        assert!(err.to_string().contains("YYYY-MM-DD"));
    }
}
