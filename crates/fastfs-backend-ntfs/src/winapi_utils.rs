//! Low-level Windows API utilities.
//!
//! This module contains helper functions for working with Windows APIs.
//! All unsafe code for opening and closing handles is concentrated here.

use crate::error::NtfsError;
use std::ffi::OsStr;
use std::os::windows::ffi::OsStrExt;
use std::ptr;
use windows::core::PCWSTR;
use windows::Win32::Foundation::{CloseHandle, HANDLE, INVALID_HANDLE_VALUE};
use windows::Win32::Storage::FileSystem::{
    CreateFileW, FILE_ATTRIBUTE_NORMAL, FILE_FLAG_BACKUP_SEMANTICS, FILE_GENERIC_READ,
    FILE_SHARE_DELETE, FILE_SHARE_READ, FILE_SHARE_WRITE, OPEN_EXISTING,
};

/// RAII wrapper for Windows HANDLE.
///
/// Automatically closes the handle when dropped.
pub struct SafeHandle(HANDLE);

// SAFETY: a volume handle is a kernel object reference; it may be used and
// closed from any thread, and DeviceIoControl on it is thread-safe.
unsafe impl Send for SafeHandle {}
unsafe impl Sync for SafeHandle {}

impl SafeHandle {
    /// Create a new SafeHandle, returning an error if the handle is invalid.
    pub fn new(handle: HANDLE) -> Result<Self, NtfsError> {
        if handle == INVALID_HANDLE_VALUE || handle.0 == ptr::null_mut() {
            Err(NtfsError::from_win32("CreateFileW"))
        } else {
            Ok(SafeHandle(handle))
        }
    }

    /// Get the raw handle value.
    pub fn as_raw(&self) -> HANDLE {
        self.0
    }

    fn is_valid(&self) -> bool {
        self.0 != INVALID_HANDLE_VALUE && self.0 .0 != ptr::null_mut()
    }
}

impl Drop for SafeHandle {
    fn drop(&mut self) {
        if self.is_valid() {
            unsafe {
                let _ = CloseHandle(self.0);
            }
        }
    }
}

/// Convert a Rust string to a null-terminated wide string (UTF-16).
pub fn to_wide_string(s: &str) -> Vec<u16> {
    OsStr::new(s)
        .encode_wide()
        .chain(std::iter::once(0))
        .collect()
}

/// Read a null-terminated wide string out of a fixed buffer.
pub fn from_wide_buffer(buffer: &[u16]) -> String {
    let len = buffer.iter().position(|&c| c == 0).unwrap_or(buffer.len());
    String::from_utf16_lossy(&buffer[..len])
}

/// Open a volume device (`\\.\C:`) read-only for MFT enumeration.
pub fn open_volume(device_path: &str) -> Result<SafeHandle, NtfsError> {
    let wide_path = to_wide_string(device_path);

    // SAFETY: the path buffer is null-terminated and outlives the call; the
    // returned handle is owned by SafeHandle.
    let handle = unsafe {
        CreateFileW(
            PCWSTR(wide_path.as_ptr()),
            FILE_GENERIC_READ.0,
            FILE_SHARE_READ | FILE_SHARE_WRITE | FILE_SHARE_DELETE,
            None,
            OPEN_EXISTING,
            FILE_ATTRIBUTE_NORMAL | FILE_FLAG_BACKUP_SEMANTICS,
            None,
        )
    };

    match handle {
        Ok(h) => SafeHandle::new(h),
        Err(_) => Err(NtfsError::from_win32("CreateFileW")),
    }
}
