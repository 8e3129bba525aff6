//! Error types for fastfs core operations.
//!
//! This module defines well-structured error types using `thiserror` for
//! library-level errors, while scanner implementations and higher-level code
//! can use `anyhow` for convenient error handling.

use thiserror::Error;

/// Result type alias using FastFsError
pub type Result<T> = std::result::Result<T, FastFsError>;

/// Core error types for fastfs operations.
///
/// Builder integrity errors exclude a volume from the index; the facade never
/// surfaces volume failures to query callers.
#[derive(Error, Debug)]
pub enum FastFsError {
    // === Index Build Errors ===
    /// A record's parent directory is missing from the scan
    #[error("orphaned record on volume {volume}: {path}")]
    OrphanedRecord { volume: String, path: String },

    /// Two records share the same path (case-insensitively)
    #[error("duplicate record on volume {volume}: {path}")]
    DuplicateRecord { volume: String, path: String },

    /// A record does not belong to the volume being built
    #[error("record {path} is outside volume {volume}")]
    ForeignRecord { volume: String, path: String },

    /// The volume root record is not a directory
    #[error("root record of volume {volume} is not a directory: {path}")]
    RootNotDirectory { volume: String, path: String },

    // === Volume Errors ===
    /// The scanner could not open a volume
    #[error("failed to open volume {volume}: {reason}")]
    VolumeOpen { volume: String, reason: String },

    /// The scanner opened a volume but failed to enumerate it
    #[error("failed to scan volume {volume}: {reason}")]
    VolumeScan { volume: String, reason: String },

    // === Query Errors ===
    /// Unknown enumeration scope
    #[error("invalid search scope: {value}")]
    InvalidScope { value: String },

    /// Invalid name pattern
    #[error("invalid name pattern: {pattern}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    // === Configuration Errors ===
    /// Configuration file parsing failed
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    // === I/O Errors ===
    /// Generic I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FastFsError {
    /// Returns true if this error means a scan produced an inconsistent tree
    pub fn is_integrity_failure(&self) -> bool {
        matches!(
            self,
            FastFsError::OrphanedRecord { .. }
                | FastFsError::DuplicateRecord { .. }
                | FastFsError::ForeignRecord { .. }
                | FastFsError::RootNotDirectory { .. }
        )
    }

    /// Returns true if this error came from the volume scanner
    pub fn is_volume_failure(&self) -> bool {
        matches!(
            self,
            FastFsError::VolumeOpen { .. } | FastFsError::VolumeScan { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_integrity_failure() {
        let err = FastFsError::OrphanedRecord {
            volume: "c".to_string(),
            path: "C:\\a\\b".to_string(),
        };
        assert!(err.is_integrity_failure());
        assert!(!err.is_volume_failure());

        let err = FastFsError::VolumeOpen {
            volume: "d".to_string(),
            reason: "access denied".to_string(),
        };
        assert!(!err.is_integrity_failure());
        assert!(err.is_volume_failure());

        let err = FastFsError::RootNotDirectory {
            volume: "c".to_string(),
            path: "C:\\".to_string(),
        };
        assert!(err.is_integrity_failure());
    }

    #[test]
    fn test_display() {
        let err = FastFsError::DuplicateRecord {
            volume: "c".to_string(),
            path: "C:\\Apps".to_string(),
        };
        assert_eq!(err.to_string(), "duplicate record on volume c: C:\\Apps");
    }
}
