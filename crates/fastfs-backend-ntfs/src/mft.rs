//! MFT (Master File Table) enumeration for NTFS.
//!
//! An `NtfsVolumeHandle` holds a read-only device handle for one volume for
//! as long as that volume stays indexed. Its scan lists every file record on
//! the volume through `FSCTL_ENUM_USN_DATA`, which walks the MFT in record
//! order and returns, per record, the file and parent references, the name
//! and the attribute bits. Paths are then rebuilt by `paths::build_records`.
//!
//! ## Permissions
//!
//! Opening the device requires elevated privileges. The process must be
//! running as Administrator or have the "Perform Volume Maintenance Tasks"
//! privilege.
//!
//! ## Timestamps
//!
//! Enumeration records carry no creation time, so the records produced here
//! never do either; creation-time queries on an NTFS-indexed volume are
//! answered by the OS.

use crate::error::NtfsError;
use crate::paths::{build_records, device_path, MftEntry};
use crate::winapi_utils::{open_volume, SafeHandle};
use fastfs_core::backend::{RetrieveMode, VolumeHandle, VolumeInfo};
use fastfs_core::types::NodeRecord;
use std::mem;
use std::ptr;
use tracing::{debug, info};
use windows::Win32::System::Ioctl::FSCTL_ENUM_USN_DATA;
use windows::Win32::System::IO::DeviceIoControl;

/// Input for FSCTL_ENUM_USN_DATA (MFT_ENUM_DATA_V1)
#[repr(C)]
#[derive(Debug, Clone, Copy)]
struct MftEnumData {
    start_file_reference_number: u64,
    low_usn: i64,
    high_usn: i64,
    min_major_version: u16,
    max_major_version: u16,
}

/// USN record structure (version 2)
#[repr(C)]
#[derive(Debug)]
struct UsnRecordV2 {
    record_length: u32,
    major_version: u16,
    minor_version: u16,
    file_reference_number: u64,
    parent_file_reference_number: u64,
    usn: i64,
    timestamp: i64,
    reason: u32,
    source_info: u32,
    security_id: u32,
    file_attributes: u32,
    file_name_length: u16,
    file_name_offset: u16,
    // file_name follows (variable length UTF-16)
}

/// USN record structure (version 3) - uses 128-bit file IDs
#[repr(C)]
#[derive(Debug)]
struct UsnRecordV3 {
    record_length: u32,
    major_version: u16,
    minor_version: u16,
    file_reference_number: [u8; 16],        // FILE_ID_128
    parent_file_reference_number: [u8; 16], // FILE_ID_128
    usn: i64,
    timestamp: i64,
    reason: u32,
    source_info: u32,
    security_id: u32,
    file_attributes: u32,
    file_name_length: u16,
    file_name_offset: u16,
    // file_name follows (variable length UTF-16)
}

const ERROR_HANDLE_EOF: u32 = 38;
const BUFFER_SIZE: usize = 64 * 1024;

/// An open NTFS volume. Closing happens when the handle is dropped.
pub struct NtfsVolumeHandle {
    info: VolumeInfo,
    handle: SafeHandle,
}

impl NtfsVolumeHandle {
    /// Open the device behind a volume's mount point.
    ///
    /// `mode` only shows up in the log: enumeration records never carry
    /// timestamps.
    pub fn open(info: &VolumeInfo, mode: RetrieveMode) -> Result<Self, NtfsError> {
        let device = device_path(&info.mount_point);
        let handle = open_volume(&device).map_err(|e| match e {
            NtfsError::AccessDenied { .. } => e,
            other => NtfsError::VolumeOpen {
                volume: device.clone(),
                reason: other.to_string(),
            },
        })?;

        debug!(volume = %device, ?mode, "Opened volume");

        Ok(NtfsVolumeHandle {
            info: info.clone(),
            handle,
        })
    }
}

impl VolumeHandle for NtfsVolumeHandle {
    fn volume(&self) -> &VolumeInfo {
        &self.info
    }

    fn nodes(&mut self, root: &str) -> anyhow::Result<Vec<NodeRecord>> {
        info!(volume = %root, "Enumerating MFT records");

        let entries = enumerate_mft(&self.handle, root)?;
        Ok(build_records(entries, &self.info.key))
    }
}

impl Drop for NtfsVolumeHandle {
    fn drop(&mut self) {
        debug!(volume = %self.info.mount_point, "Closing volume");
    }
}

/// List every MFT record of the volume behind `handle`.
fn enumerate_mft(handle: &SafeHandle, volume: &str) -> Result<Vec<MftEntry>, NtfsError> {
    let mut buffer = vec![0u8; BUFFER_SIZE];

    let mut enum_data = MftEnumData {
        start_file_reference_number: 0,
        low_usn: 0,
        high_usn: i64::MAX,
        min_major_version: 2,
        max_major_version: 3,
    };

    let mut entries: Vec<MftEntry> = Vec::with_capacity(100_000);

    loop {
        let mut bytes_returned = 0u32;

        let result = unsafe {
            DeviceIoControl(
                handle.as_raw(),
                FSCTL_ENUM_USN_DATA,
                Some(&enum_data as *const _ as *const _),
                mem::size_of::<MftEnumData>() as u32,
                Some(buffer.as_mut_ptr() as *mut _),
                buffer.len() as u32,
                Some(&mut bytes_returned),
                None,
            )
        };

        if result.is_err() {
            let code = unsafe { windows::Win32::Foundation::GetLastError().0 };
            if code == ERROR_HANDLE_EOF {
                break;
            }
            return Err(match NtfsError::from_code("FSCTL_ENUM_USN_DATA", code) {
                denied @ NtfsError::AccessDenied { .. } => denied,
                other => NtfsError::MftRead {
                    volume: volume.to_string(),
                    reason: other.to_string(),
                },
            });
        }

        let filled = bytes_returned as usize;
        if filled < 8 {
            break;
        }

        // First 8 bytes are the next file reference number
        let next_ref = read_u64(&buffer, 0);
        parse_records(&buffer[..filled], &mut entries);

        enum_data.start_file_reference_number = next_ref;
    }

    info!(volume = %volume, records = entries.len(), "MFT enumeration complete");
    Ok(entries)
}

fn read_u64(buffer: &[u8], offset: usize) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&buffer[offset..offset + 8]);
    u64::from_ne_bytes(bytes)
}

/// Parse the USN records following the 8-byte header of one output buffer.
fn parse_records(buffer: &[u8], entries: &mut Vec<MftEntry>) {
    let end = buffer.len();
    let mut offset = 8usize;

    while offset + 8 <= end {
        let record_length = u32::from_ne_bytes([
            buffer[offset],
            buffer[offset + 1],
            buffer[offset + 2],
            buffer[offset + 3],
        ]) as usize;
        let major_version = u16::from_ne_bytes([buffer[offset + 4], buffer[offset + 5]]);

        if record_length == 0 || offset + record_length > end {
            break;
        }

        let fields = match major_version {
            2 if offset + mem::size_of::<UsnRecordV2>() <= end => {
                // SAFETY: bounds checked above
                let record = unsafe {
                    ptr::read_unaligned(buffer.as_ptr().add(offset) as *const UsnRecordV2)
                };
                Some((
                    record.file_reference_number,
                    record.parent_file_reference_number,
                    record.file_attributes,
                    record.file_name_offset as usize,
                    record.file_name_length as usize,
                ))
            }
            3 if offset + mem::size_of::<UsnRecordV3>() <= end => {
                // SAFETY: bounds checked above
                let record = unsafe {
                    ptr::read_unaligned(buffer.as_ptr().add(offset) as *const UsnRecordV3)
                };
                // FILE_ID_128: the low 64 bits hold the NTFS reference
                let mut file_ref = [0u8; 8];
                let mut parent_ref = [0u8; 8];
                file_ref.copy_from_slice(&record.file_reference_number[..8]);
                parent_ref.copy_from_slice(&record.parent_file_reference_number[..8]);
                Some((
                    u64::from_ne_bytes(file_ref),
                    u64::from_ne_bytes(parent_ref),
                    record.file_attributes,
                    record.file_name_offset as usize,
                    record.file_name_length as usize,
                ))
            }
            _ => None,
        };

        if let Some((file_ref, parent_ref, attributes, name_offset, name_len)) = fields {
            if name_len > 0 && name_offset + name_len <= record_length {
                let name_bytes = &buffer[offset + name_offset..offset + name_offset + name_len];
                let units: Vec<u16> = name_bytes
                    .chunks_exact(2)
                    .map(|pair| u16::from_ne_bytes([pair[0], pair[1]]))
                    .collect();

                entries.push(MftEntry::from_references(
                    file_ref,
                    parent_ref,
                    String::from_utf16_lossy(&units),
                    attributes,
                ));
            }
        }

        offset += record_length;
    }
}
