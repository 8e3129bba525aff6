//! # fastfs Windows NTFS Backend
//!
//! This crate provides the Windows/NTFS implementation of the `VolumeScanner`
//! trait. Volumes are read through **MFT enumeration**
//! (`FSCTL_ENUM_USN_DATA`), which lists every file record on a volume far
//! faster than walking its directories.
//!
//! ## Architecture
//!
//! The backend is structured to isolate all Windows API calls and unsafe code:
//!
//! - `volume.rs`: Volume enumeration and information
//! - `mft.rs`: Volume handles and MFT reading
//! - `winapi_utils.rs`: Low-level Windows API wrappers
//! - `paths.rs`: Platform-independent path reconstruction from MFT entries
//!
//! ## Permissions
//!
//! Opening a volume for MFT enumeration requires elevated privileges:
//! - The process should be run as Administrator, OR
//! - The user should have "Perform Volume Maintenance Tasks" privilege
//!
//! Without them every volume fails to open, which leaves it unindexed; the
//! facade then answers its queries through the OS.

#[cfg(windows)]
mod mft;
#[cfg(windows)]
mod volume;
#[cfg(windows)]
mod winapi_utils;

#[cfg(windows)]
mod backend;

#[cfg(windows)]
pub use backend::NtfsBackend;

#[cfg(not(windows))]
mod stub;

#[cfg(not(windows))]
pub use stub::NtfsBackend;

pub mod paths;

/// Error types specific to the NTFS backend
pub mod error;
pub use error::NtfsError;
