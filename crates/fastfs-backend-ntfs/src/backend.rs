//! NTFS backend implementation.
//!
//! This module implements the `VolumeScanner` trait for Windows volumes,
//! combining volume enumeration with MFT scanning.

use crate::mft::NtfsVolumeHandle;
use crate::volume::enumerate_volumes;
use fastfs_core::backend::{RetrieveMode, VolumeHandle, VolumeInfo, VolumeScanner};
use tracing::info;

/// NTFS volume scanner for Windows.
///
/// ## Permissions
///
/// Opening volumes requires elevated privileges:
/// - Run as Administrator, OR
/// - Have "Perform Volume Maintenance Tasks" privilege
///
/// Without elevation `open` fails for every volume and the caller falls back
/// to ordinary filesystem calls.
#[derive(Debug, Default)]
pub struct NtfsBackend;

impl NtfsBackend {
    /// Create a new NTFS backend.
    pub fn new() -> Self {
        NtfsBackend
    }

    /// Check if we have elevated privileges.
    pub fn has_elevated_privileges() -> bool {
        // Opening C: for reading is a simple heuristic; a real check would use OpenProcessToken
        crate::winapi_utils::open_volume("\\\\.\\C:").is_ok()
    }
}

impl VolumeScanner for NtfsBackend {
    fn list_volumes(&self) -> anyhow::Result<Vec<VolumeInfo>> {
        let volumes = enumerate_volumes()?;

        info!(count = volumes.len(), "Enumerated volumes");
        Ok(volumes)
    }

    fn open(
        &self,
        volume: &VolumeInfo,
        mode: RetrieveMode,
    ) -> anyhow::Result<Box<dyn VolumeHandle>> {
        let handle = NtfsVolumeHandle::open(volume, mode)?;
        Ok(Box::new(handle))
    }

    fn name(&self) -> &'static str {
        "ntfs"
    }
}
