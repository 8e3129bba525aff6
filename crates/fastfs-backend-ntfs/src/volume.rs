//! Volume enumeration for Windows.
//!
//! Every volume with a drive-letter mount point is reported, whatever its
//! filesystem or device type, so the caller can decide which to index and
//! log why the rest were left out.

use crate::error::NtfsError;
use crate::winapi_utils::{from_wide_buffer, to_wide_string};
use fastfs_core::backend::{DriveType, VolumeInfo};
use std::mem::MaybeUninit;
use tracing::debug;
use windows::core::PCWSTR;
use windows::Win32::Foundation::MAX_PATH;
use windows::Win32::Storage::FileSystem::{
    FindFirstVolumeW, FindNextVolumeW, FindVolumeClose, GetDiskFreeSpaceExW, GetDriveTypeW,
    GetVolumeInformationW, GetVolumePathNamesForVolumeNameW,
};

/// Map a `GetDriveTypeW` result.
fn drive_type_from_raw(raw: u32) -> DriveType {
    match raw {
        1 => DriveType::NoRootDirectory,
        2 => DriveType::Removable,
        3 => DriveType::Fixed,
        4 => DriveType::Network,
        5 => DriveType::CdRom,
        6 => DriveType::Ram,
        _ => DriveType::Unknown,
    }
}

/// Enumerate all mounted volumes on the system.
pub fn enumerate_volumes() -> Result<Vec<VolumeInfo>, NtfsError> {
    let mut volumes = Vec::new();
    let mut volume_name = [0u16; MAX_PATH as usize];

    let find_handle = match unsafe { FindFirstVolumeW(&mut volume_name) } {
        Ok(h) => h,
        Err(_) => return Err(NtfsError::from_win32("FindFirstVolumeW")),
    };

    loop {
        let volume_guid = from_wide_buffer(&volume_name);

        match get_volume_mount_point(&volume_guid) {
            Some(mount_point) => {
                let info = get_volume_details(&mount_point);
                debug!(
                    mount_point = %info.mount_point,
                    label = ?info.label,
                    fs = %info.filesystem,
                    drive_type = %info.drive_type,
                    ready = info.is_ready,
                    "Found volume"
                );
                volumes.push(info);
            }
            None => debug!(guid = %volume_guid, "Volume has no drive letter, ignoring"),
        }

        volume_name = [0u16; MAX_PATH as usize];
        if unsafe { FindNextVolumeW(find_handle, &mut volume_name) }.is_err() {
            break;
        }
    }

    unsafe {
        let _ = FindVolumeClose(find_handle);
    }

    volumes.sort_by(|a, b| a.key.cmp(&b.key));
    Ok(volumes)
}

/// Get the first drive-letter mount point for a volume GUID.
fn get_volume_mount_point(volume_guid: &str) -> Option<String> {
    let wide_guid = to_wide_string(volume_guid);
    let mut path_names = [0u16; MAX_PATH as usize];
    let mut return_length = 0u32;

    let result = unsafe {
        GetVolumePathNamesForVolumeNameW(
            PCWSTR(wide_guid.as_ptr()),
            Some(&mut path_names),
            &mut return_length,
        )
    };

    if result.is_err() {
        return None;
    }

    // Multi-string; the first entry is enough
    let first = from_wide_buffer(&path_names);
    crate::paths::extract_drive_letter(&first).map(|_| first)
}

/// Query type, readiness, label, filesystem and capacity of a mount point.
///
/// A volume whose information cannot be read (e.g. an empty card reader) is
/// reported as not ready with an empty filesystem name.
fn get_volume_details(mount_point: &str) -> VolumeInfo {
    let wide_path = to_wide_string(mount_point);

    let drive_type = drive_type_from_raw(unsafe { GetDriveTypeW(PCWSTR(wide_path.as_ptr())) });

    let mut volume_name = [0u16; MAX_PATH as usize];
    let mut fs_name = [0u16; MAX_PATH as usize];

    let result = unsafe {
        GetVolumeInformationW(
            PCWSTR(wide_path.as_ptr()),
            Some(&mut volume_name),
            None,
            None,
            None,
            Some(&mut fs_name),
        )
    };

    if result.is_err() {
        return VolumeInfo::new(mount_point, "")
            .with_drive_type(drive_type)
            .with_ready(false);
    }

    let mut info = VolumeInfo::new(mount_point, from_wide_buffer(&fs_name))
        .with_drive_type(drive_type);

    let label = from_wide_buffer(&volume_name);
    if !label.is_empty() {
        info = info.with_label(label);
    }

    let mut total_bytes = MaybeUninit::<u64>::uninit();
    let mut free_bytes = MaybeUninit::<u64>::uninit();

    let space_result = unsafe {
        GetDiskFreeSpaceExW(
            PCWSTR(wide_path.as_ptr()),
            None,
            Some(total_bytes.as_mut_ptr()),
            Some(free_bytes.as_mut_ptr()),
        )
    };

    if space_result.is_ok() {
        let (total, free) = unsafe { (total_bytes.assume_init(), free_bytes.assume_init()) };
        info = info.with_capacity(total, free);
    }

    info
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drive_type_mapping() {
        assert_eq!(drive_type_from_raw(3), DriveType::Fixed);
        assert_eq!(drive_type_from_raw(4), DriveType::Network);
        assert_eq!(drive_type_from_raw(6), DriveType::Ram);
        assert_eq!(drive_type_from_raw(0), DriveType::Unknown);
        assert_eq!(drive_type_from_raw(42), DriveType::Unknown);
    }

    #[test]
    fn test_enumerate_volumes() {
        let volumes = enumerate_volumes().unwrap();
        println!("Found {} volumes", volumes.len());

        for vol in &volumes {
            assert!(crate::paths::extract_drive_letter(&vol.mount_point).is_some());
            println!(
                "  {} ({}) {} {}",
                vol.mount_point,
                vol.label.as_deref().unwrap_or("No label"),
                vol.filesystem,
                vol.drive_type
            );
        }
    }
}
