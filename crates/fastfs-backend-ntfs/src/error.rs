//! Error types for the NTFS backend.

use thiserror::Error;

const ERROR_ACCESS_DENIED: u32 = 5;

/// Errors specific to NTFS backend operations.
#[derive(Error, Debug)]
pub enum NtfsError {
    /// Failed to open a volume
    #[error("failed to open volume {volume}: {reason}")]
    VolumeOpen { volume: String, reason: String },

    /// Failed to read MFT
    #[error("failed to read MFT on volume {volume}: {reason}")]
    MftRead { volume: String, reason: String },

    /// Access denied
    #[error("access denied: {operation} (try running as administrator)")]
    AccessDenied { operation: String },

    /// Windows API error
    #[error("Windows API error: {function} failed with code {code}: {message}")]
    WinApi {
        function: String,
        code: u32,
        message: String,
    },

    /// Generic I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl NtfsError {
    /// Create a WinAPI error from the last Windows error
    #[cfg(windows)]
    pub fn from_win32(function: &str) -> Self {
        use windows::Win32::Foundation::GetLastError;

        let code = unsafe { GetLastError().0 };
        Self::from_code(function, code)
    }

    /// Create an error from an explicit Win32 error code.
    pub fn from_code(function: &str, code: u32) -> Self {
        if code == ERROR_ACCESS_DENIED {
            return NtfsError::AccessDenied {
                operation: function.to_string(),
            };
        }

        NtfsError::WinApi {
            function: function.to_string(),
            code,
            message: format_win32_error(code),
        }
    }

    /// Check if this error indicates access was denied
    pub fn is_access_denied(&self) -> bool {
        matches!(self, NtfsError::AccessDenied { .. })
            || matches!(self, NtfsError::WinApi { code: ERROR_ACCESS_DENIED, .. })
    }
}

/// Format a Win32 error code to a human-readable message
#[cfg(windows)]
fn format_win32_error(code: u32) -> String {
    use windows::core::PWSTR;
    use windows::Win32::System::Diagnostics::Debug::{
        FormatMessageW, FORMAT_MESSAGE_FROM_SYSTEM, FORMAT_MESSAGE_IGNORE_INSERTS,
    };

    let mut buffer = [0u16; 512];
    let len = unsafe {
        FormatMessageW(
            FORMAT_MESSAGE_FROM_SYSTEM | FORMAT_MESSAGE_IGNORE_INSERTS,
            None,
            code,
            0,
            PWSTR(buffer.as_mut_ptr()),
            buffer.len() as u32,
            None,
        )
    };

    if len == 0 {
        return format!("Unknown error ({})", code);
    }

    String::from_utf16_lossy(&buffer[..len as usize])
        .trim()
        .to_string()
}

#[cfg(not(windows))]
fn format_win32_error(code: u32) -> String {
    format!("Windows API not available ({})", code)
}
