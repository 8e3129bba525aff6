//! Stub implementation for non-Windows platforms.

use fastfs_core::backend::{RetrieveMode, VolumeHandle, VolumeInfo, VolumeScanner};

/// Stub NTFS backend for non-Windows platforms.
///
/// This allows the crate to compile everywhere. Listing volumes fails, so a
/// facade built on it indexes nothing and answers every query through the OS.
#[derive(Debug, Default)]
pub struct NtfsBackend;

impl NtfsBackend {
    /// Create a new stub backend.
    pub fn new() -> Self {
        NtfsBackend
    }

    pub fn has_elevated_privileges() -> bool {
        false
    }
}

impl VolumeScanner for NtfsBackend {
    fn list_volumes(&self) -> anyhow::Result<Vec<VolumeInfo>> {
        anyhow::bail!("NTFS backend is only available on Windows")
    }

    fn open(
        &self,
        _volume: &VolumeInfo,
        _mode: RetrieveMode,
    ) -> anyhow::Result<Box<dyn VolumeHandle>> {
        anyhow::bail!("NTFS backend is only available on Windows")
    }

    fn name(&self) -> &'static str {
        "ntfs-stub"
    }
}
