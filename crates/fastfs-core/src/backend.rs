//! Volume scanner traits.
//!
//! This module defines the abstract interface that platform-specific volume
//! scanners must implement. The index builder and the facade interact only
//! through these traits, so raw volume access and its unsafe code stay inside
//! the backend crates.
//!
//! ## Implementing a New Backend
//!
//! To add support for a new filesystem or platform:
//!
//! 1. Create a new crate (e.g., `fastfs-backend-refs`)
//! 2. Implement `VolumeScanner` and `VolumeHandle` for your filesystem
//! 3. Encapsulate all unsafe code within that crate
//! 4. Hand the scanner to `FastFilesystemAccess::new`

use crate::types::{NodeRecord, VolumeKey};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of device backing a volume, as reported by the operating system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DriveType {
    Unknown,
    NoRootDirectory,
    Removable,
    Fixed,
    Network,
    CdRom,
    Ram,
}

impl DriveType {
    /// Whether volumes of this type are candidates for indexing.
    ///
    /// Network shares, optical media and unmounted roots are always answered
    /// by the OS.
    pub fn is_indexable(&self) -> bool {
        matches!(
            self,
            DriveType::Fixed | DriveType::Removable | DriveType::Ram | DriveType::Unknown
        )
    }
}

impl fmt::Display for DriveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriveType::Unknown => write!(f, "unknown"),
            DriveType::NoRootDirectory => write!(f, "no_root_directory"),
            DriveType::Removable => write!(f, "removable"),
            DriveType::Fixed => write!(f, "fixed"),
            DriveType::Network => write!(f, "network"),
            DriveType::CdRom => write!(f, "cdrom"),
            DriveType::Ram => write!(f, "ram"),
        }
    }
}

/// Information about a mounted volume.
///
/// This is returned by `VolumeScanner::list_volumes()` and used to decide
/// which volumes are scanned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeInfo {
    /// Index key derived from the drive letter
    pub key: VolumeKey,

    /// Root path of the volume (e.g., "C:\")
    pub mount_point: String,

    /// Human-readable label (e.g., "System", "Data")
    pub label: Option<String>,

    /// Filesystem type (e.g., "NTFS", "FAT32"); empty when not ready
    pub filesystem: String,

    /// Device kind
    pub drive_type: DriveType,

    /// Whether the media is present and the volume can be queried
    pub is_ready: bool,

    /// Total capacity in bytes
    pub total_bytes: Option<u64>,

    /// Free space in bytes
    pub free_bytes: Option<u64>,
}

impl VolumeInfo {
    /// Create a ready, fixed volume with required fields.
    pub fn new(mount_point: impl Into<String>, filesystem: impl Into<String>) -> Self {
        let mount_point = mount_point.into();
        VolumeInfo {
            key: VolumeKey::new(&mount_point),
            mount_point,
            label: None,
            filesystem: filesystem.into(),
            drive_type: DriveType::Fixed,
            is_ready: true,
            total_bytes: None,
            free_bytes: None,
        }
    }

    /// Set the volume label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the device kind
    pub fn with_drive_type(mut self, drive_type: DriveType) -> Self {
        self.drive_type = drive_type;
        self
    }

    /// Set readiness
    pub fn with_ready(mut self, ready: bool) -> Self {
        self.is_ready = ready;
        self
    }

    /// Set capacity information
    pub fn with_capacity(mut self, total: u64, free: u64) -> Self {
        self.total_bytes = Some(total);
        self.free_bytes = Some(free);
        self
    }
}

/// How much metadata a scan retrieves per node.
///
/// Backends may ignore the request. The NTFS backend enumerates the MFT
/// without timestamps in either mode, so creation-time queries on its
/// volumes always go to the OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetrieveMode {
    /// Names, parent links and attributes only
    Minimal,
    /// Also timestamps
    #[default]
    StandardInformation,
}

/// An open, read-only scan session on one volume.
///
/// Handles may hold exclusive low-level volume resources. They are released
/// by dropping them; whoever owns the box decides when that happens.
pub trait VolumeHandle: Send + Sync {
    /// The volume this handle was opened on.
    fn volume(&self) -> &VolumeInfo;

    /// Enumerate every node on the volume.
    ///
    /// `root` is the volume root path used to prefix the returned record
    /// paths (e.g. "C:\"). The result must include every directory that is a
    /// parent of another returned record; the order is unspecified.
    fn nodes(&mut self, root: &str) -> anyhow::Result<Vec<NodeRecord>>;
}

/// Abstract trait for volume scanners.
///
/// Each supported filesystem/platform implements this trait to provide:
/// - Volume enumeration
/// - Opening scan handles on individual volumes
///
/// ## Error Handling
///
/// Failing to open a volume (insufficient privilege, locked volume, device
/// error) must be reported as an `Err`, never a panic: the caller excludes
/// that volume and keeps going.
pub trait VolumeScanner: Send + Sync {
    /// Enumerate all mounted volumes, indexable or not.
    fn list_volumes(&self) -> anyhow::Result<Vec<VolumeInfo>>;

    /// Open a scan handle on a volume.
    fn open(&self, volume: &VolumeInfo, mode: RetrieveMode)
        -> anyhow::Result<Box<dyn VolumeHandle>>;

    /// Get the backend name (e.g., "ntfs", "memory")
    fn name(&self) -> &'static str;
}
